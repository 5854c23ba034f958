//! Alert configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cooldown and per-sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Minimum seconds between dispatched alerts.
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u64,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

fn default_cooldown_seconds() -> u64 {
    300
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: default_cooldown_seconds(),
            email: EmailConfig::default(),
            sms: SmsConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

/// SMTP email sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_email_from")]
    pub from: String,
    /// Recipient. Alerts are skipped with a warning when empty.
    #[serde(default)]
    pub to: String,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Upgrade the connection with STARTTLS.
    #[serde(default = "default_true")]
    pub use_tls: bool,
    #[serde(default)]
    pub username: Option<String>,
    /// Usually supplied through `PRICEGAP_SMTP_PASSWORD`.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

fn default_email_from() -> String {
    "price-alerts@crypto-tracker.com".to_string()
}

fn default_subject_prefix() -> String {
    "[PRICE ALERT]".to_string()
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            from: default_email_from(),
            to: String::new(),
            subject_prefix: default_subject_prefix(),
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            use_tls: default_true(),
            username: None,
            password: None,
        }
    }
}

/// Twilio SMS sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub to_number: String,
    #[serde(default)]
    pub from_number: String,
    /// Twilio account SID, usually from `PRICEGAP_TWILIO_ACCOUNT_SID`.
    #[serde(default)]
    pub account_sid: Option<String>,
    /// Twilio auth token, usually from `PRICEGAP_TWILIO_AUTH_TOKEN`.
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,
    #[serde(default = "default_twilio_api_url")]
    pub api_url: String,
}

fn default_twilio_api_url() -> String {
    "https://api.twilio.com".to_string()
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            to_number: String::new(),
            from_number: String::new(),
            account_sid: None,
            auth_token: None,
            api_url: default_twilio_api_url(),
        }
    }
}

/// HTTP method for generic webhooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WebhookMethod {
    #[default]
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "get")]
    Get,
}

/// Webhook sink settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: WebhookMethod,
    /// Extra request headers (e.g. `Authorization`).
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl AlertConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.email.enabled && self.email.smtp_server.trim().is_empty() {
            return Err("alerts.email.smtp_server must be set when email is enabled".to_string());
        }
        if self.webhook.enabled
            && !self.webhook.url.is_empty()
            && !(self.webhook.url.starts_with("http://") || self.webhook.url.starts_with("https://"))
        {
            return Err(format!(
                "alerts.webhook.url ({}) must be an http(s) URL",
                self.webhook.url
            ));
        }
        Ok(())
    }
}
