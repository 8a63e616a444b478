//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::histogram::ClassIdentity;
use thiserror::Error;

/// Errors raised while folding a single instance into a histogram
///
/// A failed call never leaves a half-applied update behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccumulationError {
    #[error("Instance class could not be resolved")]
    UnresolvedClass,

    #[error("Shallow size could not be computed for instance of {class}")]
    UnknownSize { class: ClassIdentity },

    #[error("Counter overflow while accumulating {class}")]
    Overflow { class: ClassIdentity },
}

/// Errors returned by histogram operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistogramError {
    #[error(transparent)]
    Accumulation(#[from] AccumulationError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors that can occur while reading instance records
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read instance source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
