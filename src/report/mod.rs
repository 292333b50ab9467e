//! Report module - run summaries and directory reports

pub mod file_report;
pub mod summary;

pub use file_report::*;
pub use summary::*;
