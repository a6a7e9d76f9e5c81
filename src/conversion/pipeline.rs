use std::sync::Arc;

use chrono::Utc;

use crate::config::ConverterConfig;
use crate::conversion::builder::DocumentBuilder;
use crate::conversion::classifier::classify;
use crate::conversion::progress::ProgressObserver;
use crate::conversion::remapper::{assign_post_ids, CommentResolver};
use crate::models::{ConversionReport, OutputDocument, SkippedComment, SourceDocument};

#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: OutputDocument,
    pub report: ConversionReport,
}

pub struct Converter {
    config: ConverterConfig,
    progress: Option<Arc<dyn ProgressObserver>>,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.progress = Some(observer);
        self
    }

    pub fn convert(&self, source: &SourceDocument) -> Conversion {
        let mut report = ConversionReport::new();

        // Step 1: Split entries into posts and comments
        let classified = classify(&source.entries);
        tracing::info!(
            "Found {} posts and {} comments in {} entries",
            classified.posts.len(),
            classified.comments.len(),
            source.len()
        );
        self.notify(|p| p.on_start(classified.posts.len(), classified.comments.len()));

        // Step 2: Channel metadata
        let mut builder = DocumentBuilder::new(self.config.clone());

        // Step 3: Every post ID is assigned before any comment is looked at
        let (post_ids, assigned) = assign_post_ids(&classified.posts);

        for (post, post_id) in classified.posts.iter().zip(assigned) {
            let item = builder.build_post_item(post, post_id);
            report.tags += item.tags.len();
            if builder.build_author(post).is_some() {
                report.authors += 1;
            }
            report.posts += 1;
            self.notify(|p| p.on_post());
        }

        // Step 4: Comments, threaded against posts and earlier comments
        let mut resolver = CommentResolver::new(&post_ids);

        for comment in &classified.comments {
            let assignment = resolver.resolve(comment);

            if builder.build_comment(comment, &assignment) {
                report.comments += 1;
                if assignment.parent_comment_id != 0 {
                    tracing::debug!(
                        "Comment {} threaded under comment {}",
                        assignment.comment_id,
                        assignment.parent_comment_id
                    );
                }
            } else {
                let in_reply_to = comment.in_reply_to.clone().unwrap_or_default();
                tracing::debug!(
                    "Skipping comment {}: reference {:?} matches no post",
                    comment.id,
                    in_reply_to
                );
                report.skipped_comments.push(SkippedComment {
                    source_id: comment.id.clone(),
                    in_reply_to,
                    comment_id: assignment.comment_id,
                });
            }
            self.notify(|p| p.on_comment());
        }

        if report.has_skipped() {
            tracing::warn!(
                "{} comments referenced unknown posts and were skipped",
                report.skipped_comments.len()
            );
        }

        // Step 5: Hand the finished tree back
        report.discarded_labels = builder.discarded_labels();
        report.converted_at = Utc::now();
        self.notify(|p| p.on_finish());

        tracing::info!(
            "Converted {} posts, {} comments, {} authors",
            report.posts,
            report.comments,
            report.authors
        );

        Conversion {
            document: builder.finish(),
            report,
        }
    }

    fn notify(&self, f: impl FnOnce(&dyn ProgressObserver)) {
        if let Some(ref progress) = self.progress {
            f(progress.as_ref());
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

/// Convert with the default channel metadata and placeholders.
pub fn convert(source: &SourceDocument) -> OutputDocument {
    Converter::default().convert(source).document
}
