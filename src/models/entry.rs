use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// One Atom `entry` from a Blogger export, as read from the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub id: String,
    pub title: Option<String>,
    pub published: String,
    pub content: Option<String>,
    pub categories: Vec<String>,
    pub author: EntryAuthor,
    /// `thr:in-reply-to/@ref`. Present (possibly empty) only on comments.
    pub in_reply_to: Option<String>,
}

impl SourceEntry {
    pub fn is_comment(&self) -> bool {
        self.in_reply_to.is_some()
    }

    pub fn author_name(&self) -> &str {
        self.author.name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub entries: Vec<SourceEntry>,
}

impl SourceDocument {
    pub fn new(entries: Vec<SourceEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::str::FromStr for SourceDocument {
    type Err = crate::error::Error;

    fn from_str(xml: &str) -> Result<Self, Self::Err> {
        crate::atom::parse_feed(xml)
    }
}
