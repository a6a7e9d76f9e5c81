use crate::models::SourceEntry;

#[derive(Debug, Default)]
pub struct ClassifiedEntries<'a> {
    pub posts: Vec<&'a SourceEntry>,
    pub comments: Vec<&'a SourceEntry>,
}

/// Split entries into posts and comments. An entry is a comment exactly when
/// it carries an in-reply-to reference; source order is kept within each list.
pub fn classify(entries: &[SourceEntry]) -> ClassifiedEntries<'_> {
    let (comments, posts): (Vec<_>, Vec<_>) = entries.iter().partition(|e| e.is_comment());
    ClassifiedEntries { posts, comments }
}
