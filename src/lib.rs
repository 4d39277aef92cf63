//! # `labeled_todos`
//!
//! A task-tracking HTTP service that labels tasks with a language model.

pub mod api;
pub mod config;
pub mod error;
pub mod labels;
pub mod tasks;
pub mod templates;
pub mod testing;
pub mod traits;

pub use error::{Error, Result};
pub use traits::{CompletionProvider, CompletionRequest};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
