use crate::config::ConverterConfig;
use crate::conversion::remapper::CommentAssignment;
use crate::models::{
    Channel, Item, OutputDocument, SourceEntry, Tag, WxrAuthor, WxrComment, POST_STATUS_PUBLISH,
    POST_TYPE_POST, TAG_DOMAIN, WXR_VERSION,
};
use crate::taxonomy::{author_id, author_login, is_valid_label, split_name, tag_nicename};

/// Append-only assembly of the WXR tree. Items are never revisited except to
/// append comments.
pub struct DocumentBuilder {
    config: ConverterConfig,
    channel: Channel,
    discarded_labels: usize,
}

impl DocumentBuilder {
    pub fn new(config: ConverterConfig) -> Self {
        let channel = Self::build_channel(&config);
        Self {
            config,
            channel,
            discarded_labels: 0,
        }
    }

    fn build_channel(config: &ConverterConfig) -> Channel {
        Channel {
            wxr_version: WXR_VERSION.to_string(),
            title: config.site_title.clone(),
            link: config.site_link.clone(),
            authors: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn build_post_item(&mut self, post: &SourceEntry, post_id: u32) -> &Item {
        let mut tags = Vec::new();
        for label in &post.categories {
            if is_valid_label(label) {
                tags.push(Tag {
                    domain: TAG_DOMAIN.to_string(),
                    nicename: tag_nicename(label),
                    label: label.clone(),
                });
            } else {
                self.discarded_labels += 1;
            }
        }

        let title = post
            .title
            .clone()
            .unwrap_or_else(|| self.config.untitled.clone());

        self.channel.items.push(Item {
            title,
            post_id,
            post_date: post.published.clone(),
            content: post.content.clone().unwrap_or_default(),
            status: POST_STATUS_PUBLISH.to_string(),
            post_type: POST_TYPE_POST.to_string(),
            tags,
            comments: Vec::new(),
        });

        &self.channel.items[self.channel.items.len() - 1]
    }

    /// One author block per post; posts without an author name get none.
    pub fn build_author(&mut self, post: &SourceEntry) -> Option<&WxrAuthor> {
        let name = post.author_name();
        if name.is_empty() {
            return None;
        }

        let (first_name, last_name) = split_name(name);
        let email = self.email_or_placeholder(post);
        self.channel.authors.push(WxrAuthor {
            id: author_id(name),
            login: author_login(name),
            email,
            display_name: name.to_string(),
            first_name,
            last_name,
        });

        self.channel.authors.last()
    }

    /// Append a comment under the item for its target post. Returns false,
    /// leaving the tree untouched, when there is no such item.
    pub fn build_comment(&mut self, comment: &SourceEntry, assignment: &CommentAssignment) -> bool {
        let Some(post_id) = assignment.target_post_id else {
            return false;
        };

        let block = WxrComment {
            id: assignment.comment_id,
            post_id,
            author: comment.author_name().to_string(),
            author_email: self.email_or_placeholder(comment),
            content: comment.content.clone().unwrap_or_default(),
            date: comment.published.clone(),
            approved: true,
            parent: assignment.parent_comment_id,
        };

        match self.channel.items.iter_mut().find(|i| i.post_id == post_id) {
            Some(item) => {
                item.comments.push(block);
                true
            }
            None => false,
        }
    }

    fn email_or_placeholder(&self, entry: &SourceEntry) -> String {
        entry
            .author
            .email
            .clone()
            .unwrap_or_else(|| self.config.placeholder_email.clone())
    }

    pub fn discarded_labels(&self) -> usize {
        self.discarded_labels
    }

    pub fn finish(self) -> OutputDocument {
        OutputDocument {
            channel: self.channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryAuthor;

    fn post(title: Option<&str>, categories: &[&str], author: Option<&str>) -> SourceEntry {
        SourceEntry {
            id: "p".to_string(),
            title: title.map(str::to_string),
            published: "2020-01-01T00:00:00Z".to_string(),
            content: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            author: EntryAuthor {
                name: author.map(str::to_string),
                email: None,
            },
            in_reply_to: None,
        }
    }

    #[test]
    fn test_channel_metadata() {
        let doc = DocumentBuilder::new(ConverterConfig::default()).finish();
        assert_eq!(doc.channel.wxr_version, "1.2");
        assert_eq!(doc.channel.title, "Blogger to WordPress Export");
        assert_eq!(doc.channel.link, "https://example.wordpress.com");
        assert!(doc.channel.items.is_empty());
    }

    #[test]
    fn test_post_item_placeholders_and_tags() {
        let mut builder = DocumentBuilder::new(ConverterConfig::default());
        let item = builder
            .build_post_item(&post(None, &["Travel", "https://example.com/tag/x"], None), 1)
            .clone();

        assert_eq!(item.title, "No Title");
        assert_eq!(item.content, "");
        assert_eq!(item.post_date, "2020-01-01T00:00:00Z");
        assert_eq!(item.status, "publish");
        assert_eq!(item.post_type, "post");
        assert_eq!(
            item.tags,
            vec![Tag {
                domain: "post_tag".to_string(),
                nicename: "travel".to_string(),
                label: "Travel".to_string(),
            }]
        );
        assert_eq!(builder.discarded_labels(), 1);
    }

    #[test]
    fn test_author_block() {
        let mut builder = DocumentBuilder::new(ConverterConfig::default());
        let author = builder
            .build_author(&post(Some("t"), &[], Some("Jane Q Doe")))
            .cloned()
            .unwrap();

        assert_eq!(author.login, "jane_q_doe");
        assert_eq!(author.email, "noreply@example.com");
        assert_eq!(author.display_name, "Jane Q Doe");
        assert_eq!(author.first_name, "Jane");
        assert_eq!(author.last_name, "Doe");
        assert!(builder.build_author(&post(Some("t"), &[], None)).is_none());
    }

    #[test]
    fn test_comment_without_item_is_skipped() {
        let mut builder = DocumentBuilder::new(ConverterConfig::default());
        builder.build_post_item(&post(Some("t"), &[], None), 1);

        let comment = SourceEntry {
            id: "c".to_string(),
            in_reply_to: Some("p".to_string()),
            ..Default::default()
        };
        let placed = CommentAssignment {
            comment_id: 1,
            target_post_id: Some(1),
            parent_comment_id: 0,
        };
        let stray = CommentAssignment {
            comment_id: 2,
            target_post_id: Some(9),
            parent_comment_id: 0,
        };

        assert!(builder.build_comment(&comment, &placed));
        assert!(!builder.build_comment(&comment, &stray));

        let doc = builder.finish();
        let comments = &doc.channel.items[0].comments;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author_email, "noreply@example.com");
        assert_eq!(comments[0].parent, 0);
        assert!(comments[0].approved);
    }
}
