pub mod entry;
pub mod wxr;
pub mod report;

pub use entry::*;
pub use wxr::*;
pub use report::*;
