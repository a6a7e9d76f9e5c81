//! Serializing [`OutputDocument`](crate::models::OutputDocument) as a WXR file.

pub mod writer;

pub use writer::{to_xml_string, write_document, write_file};
