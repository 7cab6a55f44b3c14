//! Error types for the Tracklab system.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Shape mismatch in {context}: expected length {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Group cardinality mismatch: expected {expected} markers, got {actual}")]
    Cardinality { expected: usize, actual: usize },

    #[error("Arity error: expected exactly {expected} markers, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("Role token '{role}' is ambiguous, candidates: {candidates:?}")]
    AmbiguousRoleMatch { role: String, candidates: Vec<String> },

    #[error("Role token '{role}' matches no marker in the group")]
    RoleNotFound { role: String },

    #[error("Marker index {index} out of range for group of {len} markers")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid label pattern: {0}")]
    InvalidPattern(String),

    #[error("Missing channel '{channel}' for label '{label}'")]
    MissingChannel { label: String, channel: String },

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File resolution error: {0}")]
    FileResolution(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
