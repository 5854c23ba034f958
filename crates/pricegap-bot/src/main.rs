//! pricegap - cross-exchange price discrepancy monitor.
//!
//! Polls Binance, Kraken and CoinGecko for one pair, logs price differences
//! and sends throttled alerts when they exceed the configured threshold.

use anyhow::Result;
use clap::{Parser, Subcommand};
use pricegap_bot::{AppConfig, CliOverrides, Supervisor};
use pricegap_source::HttpTransport;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cross-exchange price discrepancy finder
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PRICEGAP_CONFIG env var)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cryptocurrency symbol to track (e.g. BTC, ETH, SOL)
    #[arg(short, long)]
    symbol: Option<String>,

    /// Base currency for comparison (e.g. USDT, USD, EUR)
    #[arg(short, long)]
    base: Option<String>,

    /// Minimum price difference percentage reported as an opportunity
    #[arg(short, long)]
    threshold: Option<Decimal>,

    /// Seconds between price checks (minimum 10)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Logging level
    #[arg(
        short,
        long,
        ignore_case = true,
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    log_level: Option<String>,

    /// Disable Binance
    #[arg(long)]
    disable_binance: bool,

    /// Disable Kraken
    #[arg(long)]
    disable_kraken: bool,

    /// Disable CoinGecko
    #[arg(long)]
    disable_coingecko: bool,

    /// Stop after this many price checks
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_cycles: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List popular and stablecoin pairs
    Pairs,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            symbol: self.symbol.clone(),
            base_currency: self.base.clone(),
            threshold_percent: self.threshold,
            interval_seconds: self.interval,
            log_level: self.log_level.clone(),
            disable_binance: self.disable_binance,
            disable_kraken: self.disable_kraken,
            disable_coingecko: self.disable_coingecko,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets may live in a local .env file
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    if let Some(Command::Pairs) = args.command {
        print!("{}", pricegap_bot::render_pair_catalog());
        return Ok(());
    }

    // Initialize TLS crypto provider (must be before any HTTPS request)
    pricegap_source::init_crypto();

    // Determine config path: CLI arg > PRICEGAP_CONFIG env var > default
    let config_path = AppConfig::resolve_path(args.config.clone());
    let mut config = AppConfig::load(&config_path)?;
    config.apply_env();
    config.apply_overrides(args.overrides());
    config.validate()?;

    pricegap_telemetry::init_logging(&config.logging.level, config.logging.log_file())?;

    info!("Starting pricegap v{}", env!("CARGO_PKG_VERSION"));
    if config_path.exists() {
        info!(config_path = %config_path.display(), "Configuration loaded");
    } else {
        warn!(config_path = %config_path.display(), "Config file not found, using defaults");
    }
    let catalog_name = pricegap_core::find_pair(&config.pair.symbol, &config.pair.base_currency)
        .map(|p| p.name)
        .unwrap_or("custom pair");
    info!(
        pair_name = catalog_name,
        symbol = %config.pair.symbol,
        base = %config.pair.base_currency,
        threshold_percent = %config.pair.threshold_percent,
        interval_secs = config.polling.interval_seconds,
        enabled = ?config.sources.enabled(),
        "Starting with configuration"
    );

    let transport = Arc::new(HttpTransport::new(config.sources.endpoints.clone())?);
    let mut supervisor =
        Supervisor::from_config(&config, transport)?.with_max_cycles(args.max_cycles);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            shutdown.cancel();
        }
    });

    let summary = supervisor.run(cancel).await;
    info!(
        cycles = summary.cycles,
        pauses = summary.pauses,
        "Price discrepancy finder stopped"
    );

    Ok(())
}
