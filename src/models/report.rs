use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedComment {
    pub source_id: String,
    pub in_reply_to: String,
    pub comment_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub posts: usize,
    pub comments: usize,
    pub authors: usize,
    pub tags: usize,
    pub discarded_labels: usize,
    pub skipped_comments: Vec<SkippedComment>,
    pub converted_at: DateTime<Utc>,
}

impl ConversionReport {
    pub fn new() -> Self {
        Self {
            posts: 0,
            comments: 0,
            authors: 0,
            tags: 0,
            discarded_labels: 0,
            skipped_comments: Vec::new(),
            converted_at: Utc::now(),
        }
    }

    pub fn has_skipped(&self) -> bool {
        !self.skipped_comments.is_empty()
    }
}

impl Default for ConversionReport {
    fn default() -> Self {
        Self::new()
    }
}
