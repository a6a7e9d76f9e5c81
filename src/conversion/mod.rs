pub mod classifier;
pub mod remapper;
pub mod builder;
pub mod progress;
pub mod pipeline;

pub use classifier::{classify, ClassifiedEntries};
pub use remapper::{assign_post_ids, CommentAssignment, CommentResolver, PostIdMap};
pub use builder::DocumentBuilder;
pub use progress::ProgressObserver;
pub use pipeline::{convert, Conversion, Converter};
