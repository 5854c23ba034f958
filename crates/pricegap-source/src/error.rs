//! Source error types.

use thiserror::Error;

/// Failure to obtain a response from a venue.
///
/// Every variant counts as a transport failure for error backoff.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Venue reported error: {0}")]
    Venue(String),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type SourceResult<T> = Result<T, SourceError>;
