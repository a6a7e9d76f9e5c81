pub mod config;
pub mod error;
pub mod models;
pub mod taxonomy;
pub mod atom;
pub mod conversion;
pub mod wxr;

pub use config::{Config, ConverterConfig};
pub use error::{Error, Result};
pub use models::{ConversionReport, OutputDocument, SourceDocument, SourceEntry};
pub use conversion::{convert, Conversion, Converter, ProgressObserver};
pub use taxonomy::is_valid_label;
