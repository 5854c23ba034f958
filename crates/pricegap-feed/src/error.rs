//! Feed error types.

use thiserror::Error;

/// Reasons a response yields no usable price.
///
/// These never leave the crate's public `extract_*` functions, which
/// collapse them into `None` after a debug log.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Pair not found: {0}")]
    PairNotFound(String),

    #[error("Identifier mismatch: {0}")]
    IdentifierMismatch(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
