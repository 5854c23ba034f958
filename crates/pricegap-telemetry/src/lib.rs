//! Prometheus metrics and structured logging for pricegap.
//!
//! - Structured logging with tracing (pretty in development, JSON in
//!   production, optional plain-text log file)
//! - Prometheus counters for cycles, fetches, opportunities and alerts
//! - Session statistics summaries read back from those counters

pub mod error;
pub mod logging;
pub mod metrics;
pub mod session_stats;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, level_directive};
pub use metrics::Metrics;
pub use session_stats::{SessionStats, SessionStatsReporter, SourceFetchStats};
