//! Error types for the qabase library

use thiserror::Error;

/// Errors surfaced by the resolution pipeline and its collaborators
#[derive(Debug, Error)]
pub enum QaError {
    /// The corpus store failed (database open, query, schema)
    #[error("corpus store failure: {0}")]
    Store(#[from] rusqlite::Error),

    /// An `Embedder` implementation could not embed the text, or the stored
    /// corpus was built with a different embedding dimension
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// The conversation handed to the adapter cannot be answered
    #[error("invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("corpus import failed for {path}: {message}")]
    Import { path: String, message: String },

    /// The scoring service could not be reached or rejected the request
    #[error("scoring service: {0}")]
    Scoring(String),
}

pub type Result<T> = std::result::Result<T, QaError>;

impl From<reqwest::Error> for QaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Scoring("the request timed out".to_string())
        } else {
            Self::Scoring(err.to_string())
        }
    }
}
