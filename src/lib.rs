//! SmartTerm: terminal assistant library
//!
//! Every tool follows the same shape: enumerate candidates under a path,
//! let the user select among them, transform the selection, and report
//! per-item outcomes.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod tools;
pub mod utils;
