//! Cross-exchange price discrepancy monitor.
//!
//! Orchestrates one monitoring run:
//! - Configuration from TOML, environment secrets and CLI overrides
//! - Sequential price fetches from Binance, Kraken and CoinGecko
//! - Discrepancy detection with a throttled alert fan-out
//! - Consecutive-error backoff and graceful shutdown

pub mod backoff;
pub mod catalog;
pub mod config;
pub mod error;
pub mod supervisor;

pub use backoff::ErrorCounter;
pub use catalog::render_pair_catalog;
pub use config::{AppConfig, CliOverrides};
pub use error::{AppError, AppResult};
pub use supervisor::{
    build_dispatcher, CycleReport, RunSummary, Supervisor, SupervisorSettings, SupervisorState,
};
