//! Structured logging initialization.

use crate::error::{TelemetryError, TelemetryResult};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map an operator-facing level name to a tracing directive.
///
/// Accepts the usual names in any case, plus `WARNING` and `CRITICAL`
/// (tracing has no level above `error`).
pub fn level_directive(level: &str) -> TelemetryResult<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" | "critical" => Ok("error"),
        other => Err(TelemetryError::InvalidLevel(other.to_string())),
    }
}

/// Initialize structured logging.
///
/// `RUST_LOG` wins over `level` when set. Console output is pretty in
/// development and JSON when `RUST_ENV=production`. When `log_file` is given,
/// a plain-text copy of every event is appended there.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> TelemetryResult<()> {
    let directive = level_directive(level)?;
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{directive},hyper=warn,reqwest=warn")));

    let is_production = std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let file = match log_file {
        Some(path) => Some(Arc::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };
    macro_rules! file_layer {
        () => {
            file.map(|file| {
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(file)
            })
        };
    }

    let result = if is_production {
        // JSON format for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .with(file_layer!())
            .try_init()
    } else {
        // Pretty format for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(true))
            .with(file_layer!())
            .try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("INFO").unwrap(), "info");
        assert_eq!(level_directive("Warning").unwrap(), "warn");
        assert_eq!(level_directive("CRITICAL").unwrap(), "error");
        assert_eq!(level_directive(" debug ").unwrap(), "debug");
        assert!(matches!(
            level_directive("verbose"),
            Err(TelemetryError::InvalidLevel(_))
        ));
    }
}
