use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File {} not found.", .0.display())]
    InputNotFound(PathBuf),

    #[error("Malformed source document: {0}")]
    MalformedSource(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("XML write error: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::MalformedSource(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Error::MalformedSource(e.to_string())
    }
}

impl Error {
    /// Whether the failure happened before any output could be produced.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InputNotFound(_) | Error::MalformedSource(_))
    }
}
