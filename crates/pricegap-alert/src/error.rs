//! Alert error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Failure of a single notification sink.
///
/// Sink failures are logged by the dispatcher and never reach the polling
/// loop or the throttle.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("{sink} not configured: {reason}")]
    NotConfigured { sink: &'static str, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

pub type AlertResult<T> = Result<T, AlertError>;
pub type SinkResult<T> = Result<T, SinkError>;
