//! Error types for `labeled_todos`.

/// Errors that can occur in the task service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `SQLite` database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(i64),

    /// The completion provider failed or returned something unusable.
    #[error("Completion error: {0}")]
    Completion(String),

    /// The configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A template error occurred.
    #[error("Template error: {0}")]
    Template(String),

    /// A blocking store call could not be joined.
    #[error("Blocking task failed: {0}")]
    Blocking(String),
}

impl Error {
    /// Whether this error means the referenced task does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_))
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
