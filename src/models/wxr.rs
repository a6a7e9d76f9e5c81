use serde::{Deserialize, Serialize};

pub const WXR_VERSION: &str = "1.2";
pub const POST_STATUS_PUBLISH: &str = "publish";
pub const POST_TYPE_POST: &str = "post";
pub const TAG_DOMAIN: &str = "post_tag";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub channel: Channel,
}

impl OutputDocument {
    pub fn item(&self, post_id: u32) -> Option<&Item> {
        self.channel.items.iter().find(|i| i.post_id == post_id)
    }

    pub fn comment_count(&self) -> usize {
        self.channel.items.iter().map(|i| i.comments.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub wxr_version: String,
    pub title: String,
    pub link: String,
    pub authors: Vec<WxrAuthor>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WxrAuthor {
    pub id: u32,
    pub login: String,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub post_id: u32,
    pub post_date: String,
    pub content: String,
    pub status: String,
    pub post_type: String,
    pub tags: Vec<Tag>,
    pub comments: Vec<WxrComment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub domain: String,
    pub nicename: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WxrComment {
    pub id: u32,
    pub post_id: u32,
    pub author: String,
    pub author_email: String,
    pub content: String,
    pub date: String,
    pub approved: bool,
    /// 0 for top-level comments.
    pub parent: u32,
}
