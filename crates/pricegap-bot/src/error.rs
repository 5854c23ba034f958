//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] pricegap_core::CoreError),

    #[error("Source error: {0}")]
    Source(#[from] pricegap_source::SourceError),

    #[error("Detector error: {0}")]
    Detector(#[from] pricegap_detector::DetectorError),

    #[error("Alert error: {0}")]
    Alert(#[from] pricegap_alert::AlertError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] pricegap_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
