//! Pipeline module - candidate discovery, selection, and the run shape

pub mod candidates;
pub mod error;
pub mod run;
pub mod selector;

pub use candidates::*;
pub use error::*;
pub use run::*;
pub use selector::*;
