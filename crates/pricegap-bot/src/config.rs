//! Application configuration.
//!
//! Loaded from TOML, then secrets from the environment, then CLI overrides,
//! then validated once before the supervisor is built.

use crate::error::{AppError, AppResult};
use pricegap_alert::AlertConfig;
use pricegap_core::{SourceId, TrackedPair};
use pricegap_detector::DetectorConfig;
use pricegap_source::SourceEndpoints;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shortest allowed polling interval.
pub const MIN_INTERVAL_SECONDS: u64 = 10;

/// Environment variable holding the config path.
pub const CONFIG_ENV: &str = "PRICEGAP_CONFIG";

/// Default config path when neither `--config` nor `PRICEGAP_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// The monitored pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Minimum percentage difference reported as an opportunity.
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: Decimal,
}

fn default_symbol() -> String {
    "XRP".to_string()
}

fn default_base_currency() -> String {
    "USDT".to_string()
}

fn default_threshold_percent() -> Decimal {
    Decimal::ONE
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            base_currency: default_base_currency(),
            threshold_percent: default_threshold_percent(),
        }
    }
}

/// Loop timing and error backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between cycles. Minimum 10.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    /// Consecutive failures before the loop pauses.
    #[serde(default = "default_max_errors")]
    pub max_errors: u32,
    /// Pause length after `max_errors` consecutive failures.
    #[serde(default = "default_pause_seconds")]
    pub pause_seconds: u64,
}

fn default_interval_seconds() -> u64 {
    60
}

fn default_max_errors() -> u32 {
    5
}

fn default_pause_seconds() -> u64 {
    300
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            max_errors: default_max_errors(),
            pause_seconds: default_pause_seconds(),
        }
    }
}

/// Per-source enable flags and HTTP endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_enabled")]
    pub binance: bool,
    #[serde(default = "default_enabled")]
    pub kraken: bool,
    #[serde(default = "default_enabled")]
    pub coingecko: bool,
    #[serde(default)]
    pub endpoints: SourceEndpoints,
}

fn default_enabled() -> bool {
    true
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            binance: true,
            kraken: true,
            coingecko: true,
            endpoints: SourceEndpoints::default(),
        }
    }
}

impl SourcesConfig {
    pub fn is_enabled(&self, source: SourceId) -> bool {
        match source {
            SourceId::Binance => self.binance,
            SourceId::Kraken => self.kraken,
            SourceId::CoinGecko => self.coingecko,
        }
    }

    /// Enabled sources in fetch order.
    pub fn enabled(&self) -> Vec<SourceId> {
        SourceId::ALL
            .into_iter()
            .filter(|s| self.is_enabled(*s))
            .collect()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// DEBUG, INFO, WARNING, ERROR or CRITICAL.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Plain-text log file. Empty disables it.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("arbitrage.log")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl LoggingConfig {
    pub fn log_file(&self) -> Option<&Path> {
        if self.file.as_os_str().is_empty() {
            None
        } else {
            Some(self.file.as_path())
        }
    }
}

/// Command-line overrides, applied after the file and environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub symbol: Option<String>,
    pub base_currency: Option<String>,
    pub threshold_percent: Option<Decimal>,
    pub interval_seconds: Option<u64>,
    pub log_level: Option<String>,
    pub disable_binance: bool,
    pub disable_kraken: bool,
    pub disable_coingecko: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pair: PairConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Resolve the config path: CLI arg > `PRICEGAP_CONFIG` > default.
    pub fn resolve_path(cli_path: Option<PathBuf>) -> PathBuf {
        cli_path
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load from `path`, or defaults when the file does not exist.
    ///
    /// Runs before logging is initialized, so the caller reports a missing
    /// file.
    pub fn load(path: &Path) -> AppResult<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Fill secrets from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Fill secrets using `lookup`. Empty values are ignored.
    ///
    /// - `PRICEGAP_SMTP_USERNAME`, `PRICEGAP_SMTP_PASSWORD`
    /// - `PRICEGAP_TWILIO_ACCOUNT_SID`, `PRICEGAP_TWILIO_AUTH_TOKEN`
    /// - `PRICEGAP_WEBHOOK_BEARER` (sent as `Authorization: Bearer ...`)
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(username) = get("PRICEGAP_SMTP_USERNAME") {
            self.alerts.email.username = Some(username);
        }
        if let Some(password) = get("PRICEGAP_SMTP_PASSWORD") {
            self.alerts.email.password = Some(password);
        }
        if let Some(sid) = get("PRICEGAP_TWILIO_ACCOUNT_SID") {
            self.alerts.sms.account_sid = Some(sid);
        }
        if let Some(token) = get("PRICEGAP_TWILIO_AUTH_TOKEN") {
            self.alerts.sms.auth_token = Some(token);
        }
        if let Some(bearer) = get("PRICEGAP_WEBHOOK_BEARER") {
            self.alerts
                .webhook
                .headers
                .insert("Authorization".to_string(), format!("Bearer {bearer}"));
        }
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(symbol) = overrides.symbol {
            self.pair.symbol = symbol;
        }
        if let Some(base) = overrides.base_currency {
            self.pair.base_currency = base;
        }
        if let Some(threshold) = overrides.threshold_percent {
            self.pair.threshold_percent = threshold;
        }
        if let Some(interval) = overrides.interval_seconds {
            self.polling.interval_seconds = interval;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.disable_binance {
            self.sources.binance = false;
        }
        if overrides.disable_kraken {
            self.sources.kraken = false;
        }
        if overrides.disable_coingecko {
            self.sources.coingecko = false;
        }
    }

    /// The pair to monitor, uppercased.
    pub fn tracked_pair(&self) -> AppResult<TrackedPair> {
        Ok(TrackedPair::new(
            &self.pair.symbol,
            &self.pair.base_currency,
            self.pair.threshold_percent,
        )?)
    }

    /// Validate the final configuration.
    pub fn validate(&self) -> AppResult<()> {
        let pair = self.tracked_pair()?;
        DetectorConfig::for_pair(&pair).validate()?;

        if self.polling.interval_seconds < MIN_INTERVAL_SECONDS {
            return Err(AppError::Config(format!(
                "polling.interval_seconds must be at least {MIN_INTERVAL_SECONDS}, got {}",
                self.polling.interval_seconds
            )));
        }
        if self.polling.max_errors == 0 {
            return Err(AppError::Config(
                "polling.max_errors must be at least 1".to_string(),
            ));
        }
        if self.sources.enabled().is_empty() {
            return Err(AppError::Config(
                "at least one source must be enabled".to_string(),
            ));
        }
        if self.sources.endpoints.timeout_secs == 0 {
            return Err(AppError::Config(
                "sources.endpoints.timeout_secs must be positive".to_string(),
            ));
        }
        pricegap_telemetry::level_directive(&self.logging.level)
            .map_err(|e| AppError::Config(e.to_string()))?;
        self.alerts.validate().map_err(AppError::Config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pair.symbol, "XRP");
        assert_eq!(config.pair.base_currency, "USDT");
        assert_eq!(config.pair.threshold_percent, dec!(1));
        assert_eq!(config.polling.interval_seconds, 60);
        assert_eq!(config.polling.max_errors, 5);
        assert_eq!(config.polling.pause_seconds, 300);
        assert_eq!(config.alerts.cooldown_seconds, 300);
        assert_eq!(config.sources.enabled(), SourceId::ALL.to_vec());
        assert_eq!(config.logging.log_file(), Some(Path::new("arbitrage.log")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [pair]
            symbol = "eth"
            threshold_percent = "0.5"

            [sources]
            kraken = false

            [logging]
            file = ""
            "#,
        )
        .unwrap();

        assert_eq!(config.pair.symbol, "eth");
        assert_eq!(config.pair.base_currency, "USDT");
        assert_eq!(config.pair.threshold_percent, dec!(0.5));
        assert_eq!(
            config.sources.enabled(),
            vec![SourceId::Binance, SourceId::CoinGecko]
        );
        assert_eq!(config.sources.endpoints, SourceEndpoints::default());
        assert!(config.logging.log_file().is_none());

        let pair = config.tracked_pair().unwrap();
        assert_eq!(pair.display_name(), "ETH/USDT");
    }

    #[test]
    fn test_shipped_default_toml() {
        let config = AppConfig::from_toml(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(config.pair.symbol, "XRP");
        assert_eq!(config.pair.threshold_percent, dec!(1.0));
        assert_eq!(config.polling.max_errors, 5);
        assert!(!config.alerts.email.enabled);
        assert_eq!(
            config.alerts.webhook.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = AppConfig::from_toml("[polling]\ninterval_seconds = \"soon\"");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(CliOverrides {
            symbol: Some("BTC".to_string()),
            base_currency: Some("USD".to_string()),
            threshold_percent: Some(dec!(2.5)),
            interval_seconds: Some(30),
            log_level: Some("DEBUG".to_string()),
            disable_coingecko: true,
            ..CliOverrides::default()
        });

        assert_eq!(config.pair.symbol, "BTC");
        assert_eq!(config.pair.base_currency, "USD");
        assert_eq!(config.pair.threshold_percent, dec!(2.5));
        assert_eq!(config.polling.interval_seconds, 30);
        assert_eq!(config.logging.level, "DEBUG");
        assert!(!config.sources.coingecko);
        assert!(config.sources.binance);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.pair.threshold_percent = dec!(0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.polling.interval_seconds = 5;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let mut config = AppConfig::default();
        config.polling.interval_seconds = MIN_INTERVAL_SECONDS;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        config.polling.max_errors = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.apply_overrides(CliOverrides {
            disable_binance: true,
            disable_kraken: true,
            disable_coingecko: true,
            ..CliOverrides::default()
        });
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "LOUD".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.pair.symbol = "  ".to_string();
        assert!(matches!(config.validate(), Err(AppError::Core(_))));
    }

    #[test]
    fn test_env_secrets() {
        let env: HashMap<&str, &str> = [
            ("PRICEGAP_SMTP_PASSWORD", "app-password"),
            ("PRICEGAP_TWILIO_ACCOUNT_SID", "AC42"),
            ("PRICEGAP_TWILIO_AUTH_TOKEN", ""),
            ("PRICEGAP_WEBHOOK_BEARER", "tok"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.alerts.email.password.as_deref(), Some("app-password"));
        assert!(config.alerts.email.username.is_none());
        assert_eq!(config.alerts.sms.account_sid.as_deref(), Some("AC42"));
        assert!(config.alerts.sms.auth_token.is_none());
        assert_eq!(
            config.alerts.webhook.headers.get("Authorization").map(String::as_str),
            Some("Bearer tok")
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("interval_seconds"));
        assert!(toml_str.contains("[alerts.email]"));
        assert!(!toml_str.contains("password"));
    }
}
