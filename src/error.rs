//! Error types for carta.

use thiserror::Error;

/// Result type for carta operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for carta operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Recognition backend failed while processing a document.
    ///
    /// Fatal for the run: continuing would silently produce a partial,
    /// misleading corpus.
    #[error("Recognition failed for '{document}': {message}")]
    Recognition {
        /// Identifier of the document being processed.
        document: String,
        /// Backend-reported failure detail.
        message: String,
    },

    /// Two distinct canonical entities map to the same card file.
    ///
    /// Fatal: merging them under one card would corrupt the aggregation.
    #[error("Card path collision at '{path}': '{existing}' vs '{incoming}'")]
    CardNameCollision {
        /// Relative card path both entities resolved to.
        path: String,
        /// Canonical name that claimed the path first.
        existing: String,
        /// Canonical name that collided with it.
        incoming: String,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested recognition backend does not exist.
    #[error("Unknown backend '{0}' (available: {1})")]
    UnknownBackend(String, String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Create a recognition error for a document.
    pub fn recognition(document: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Recognition {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
