//! Error types for grcmap.

use thiserror::Error;

/// Result type alias for grcmap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for grcmap.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid evidence mappings: {0}")]
    InvalidMappings(String),

    // Evidence task errors (20-29)
    #[error("no mapping found for task reference: {task_ref}")]
    TaskNotFound { task_ref: String },

    #[error("document rejected: {0}")]
    DocumentRejected(String),

    #[error("evidence collection failed: {0}")]
    CollectionFailed(String),

    // Framework errors (30-39)
    #[error("compliance framework not found: {framework}")]
    FrameworkNotFound { framework: String },

    #[error("no compliance framework mappings available")]
    NoFrameworkData,

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidMappings(_) => 11,
            Error::TaskNotFound { .. } => 20,
            Error::DocumentRejected(_) => 21,
            Error::CollectionFailed(_) => 22,
            Error::FrameworkNotFound { .. } => 30,
            Error::NoFrameworkData => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }
}
