//! Reading Blogger's Atom export into [`SourceDocument`](crate::models::SourceDocument).

pub mod reader;

pub use reader::{parse_feed, parse_file, ATOM_NS, THREAD_NS};
