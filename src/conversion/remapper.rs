use std::collections::HashMap;

use crate::models::SourceEntry;

/// Source entry id -> assigned WordPress post ID. Complete before any comment
/// is resolved and read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct PostIdMap {
    ids: HashMap<String, u32>,
    count: u32,
}

impl PostIdMap {
    pub fn get(&self, source_id: &str) -> Option<u32> {
        self.ids.get(source_id).copied()
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn assign(&mut self, source_id: &str) -> u32 {
        self.count += 1;
        // Duplicate source ids keep their first assignment for lookups
        self.ids.entry(source_id.to_string()).or_insert(self.count);
        self.count
    }
}

/// Assign post IDs `1..=N` in source order. Returns the map and the ID given
/// to each post, aligned with `posts`.
pub fn assign_post_ids(posts: &[&SourceEntry]) -> (PostIdMap, Vec<u32>) {
    let mut map = PostIdMap::default();
    let ids = posts.iter().map(|post| map.assign(&post.id)).collect();
    (map, ids)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentAssignment {
    pub comment_id: u32,
    /// `None` when the reference names neither an earlier comment nor a post.
    pub target_post_id: Option<u32>,
    /// 0 for top-level comments.
    pub parent_comment_id: u32,
}

#[derive(Debug, Clone, Copy)]
struct CommentLink {
    comment_id: u32,
    post_id: u32,
}

/// Resolves comments one at a time, in source order. Only comments resolved
/// earlier can be found as parents.
pub struct CommentResolver<'a> {
    posts: &'a PostIdMap,
    comments: HashMap<String, CommentLink>,
    next_id: u32,
}

impl<'a> CommentResolver<'a> {
    pub fn new(posts: &'a PostIdMap) -> Self {
        Self {
            posts,
            comments: HashMap::new(),
            next_id: 1,
        }
    }

    /// Assign the next comment ID and resolve the reference: first against
    /// earlier comments (reply-to-comment), then against posts. The ID is
    /// consumed even when nothing resolves.
    pub fn resolve(&mut self, comment: &SourceEntry) -> CommentAssignment {
        let comment_id = self.next_id;
        self.next_id += 1;

        let reference = comment.in_reply_to.as_deref().unwrap_or("");

        let (target_post_id, parent_comment_id) = match self.comments.get(reference) {
            Some(parent) => (Some(parent.post_id), parent.comment_id),
            None => (self.posts.get(reference), 0),
        };

        if let Some(post_id) = target_post_id {
            self.comments
                .entry(comment.id.clone())
                .or_insert(CommentLink { comment_id, post_id });
        }

        CommentAssignment {
            comment_id,
            target_post_id,
            parent_comment_id,
        }
    }

    pub fn assigned(&self) -> u32 {
        self.next_id - 1
    }
}
