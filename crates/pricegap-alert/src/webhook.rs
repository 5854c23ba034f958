//! Webhook sink.
//!
//! Discord webhook URLs receive an embed payload; every other URL receives a
//! flat JSON object (POST) or the same fields as query parameters (GET).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{WebhookConfig, WebhookMethod};
use crate::error::{AlertError, AlertResult, SinkError, SinkResult};
use crate::sink::{AlertNotice, NotificationSink};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
const DISCORD_MARKER: &str = "discord.com/api/webhooks";
const DISCORD_EMBED_COLOR: u32 = 15_548_997;

pub struct WebhookSink {
    client: Client,
    config: WebhookConfig,
    headers: HeaderMap,
}

impl WebhookSink {
    pub fn new(config: WebhookConfig) -> AlertResult<Self> {
        let client = Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| AlertError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AlertError::ConfigError(format!("webhook header '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AlertError::ConfigError(format!("webhook header '{name}' value: {e}")))?;
            headers.insert(name, value);
        }

        Ok(Self {
            client,
            config,
            headers,
        })
    }

    pub fn is_discord(&self) -> bool {
        self.config.url.contains(DISCORD_MARKER)
    }

    /// Body sent to the configured URL.
    pub fn payload(&self, notice: &AlertNotice) -> Value {
        if self.is_discord() {
            discord_payload(notice)
        } else {
            generic_payload(notice)
        }
    }
}

fn discord_payload(notice: &AlertNotice) -> Value {
    json!({
        "username": "Price Alert Bot",
        "content": "🚨 **PRICE ALERT** 🚨",
        "embeds": [{
            "title": format!("{} Price Discrepancy", notice.pair_label()),
            "description": notice.message,
            "color": DISCORD_EMBED_COLOR,
            "fields": [
                {"name": "Symbol", "value": notice.symbol, "inline": true},
                {"name": "Base Currency", "value": notice.base_currency, "inline": true},
                {"name": "Alert Type", "value": "Price Discrepancy", "inline": true}
            ],
            "footer": {"text": format!("Alert Time: {}", notice.display_time())}
        }]
    })
}

fn generic_payload(notice: &AlertNotice) -> Value {
    json!({
        "symbol": notice.symbol,
        "base_currency": notice.base_currency,
        "message": notice.message,
        "timestamp": notice.timestamp.to_rfc3339(),
        "alert_type": "price_discrepancy"
    })
}

/// Flatten a generic payload into query parameters.
fn query_params(payload: &Value) -> Vec<(String, String)> {
    payload
        .as_object()
        .map(|obj| {
            obj.iter()
                .map(|(k, v)| {
                    let value = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
                    (k.clone(), value)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, notice: &AlertNotice) -> SinkResult<()> {
        if self.config.url.trim().is_empty() {
            return Err(SinkError::NotConfigured {
                sink: "webhook",
                reason: "URL (alerts.webhook.url) is empty".to_string(),
            });
        }

        let payload = self.payload(notice);
        let request = match self.config.method {
            WebhookMethod::Post => self.client.post(&self.config.url).json(&payload),
            WebhookMethod::Get => self
                .client
                .get(&self.config.url)
                .query(&query_params(&payload)),
        };

        let response = request
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| SinkError::Delivery(format!("webhook request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Webhook alert rejected");
            return Err(SinkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(status = status.as_u16(), discord = self.is_discord(), "Webhook alert sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn notice() -> AlertNotice {
        AlertNotice {
            symbol: "ETH".to_string(),
            base_currency: "USDT".to_string(),
            message: "ETH/USDT: Buy on Binance (3100) and sell on Kraken (3150)".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
        }
    }

    fn sink(url: &str) -> WebhookSink {
        WebhookSink::new(WebhookConfig {
            enabled: true,
            url: url.to_string(),
            ..WebhookConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_discord_payload() {
        let sink = sink("https://discord.com/api/webhooks/123/abc");
        assert!(sink.is_discord());

        let payload = sink.payload(&notice());
        assert_eq!(payload["username"], "Price Alert Bot");
        let embed = &payload["embeds"][0];
        assert_eq!(embed["title"], "ETH/USDT Price Discrepancy");
        assert_eq!(embed["color"], 15548997);
        assert_eq!(embed["fields"][1]["value"], "USDT");
        assert_eq!(embed["footer"]["text"], "Alert Time: 2024-05-06 07:08:09 UTC");
    }

    #[test]
    fn test_generic_payload_and_query() {
        let sink = sink("https://hooks.example.com/alerts");
        assert!(!sink.is_discord());

        let payload = sink.payload(&notice());
        assert_eq!(payload["alert_type"], "price_discrepancy");
        assert_eq!(payload["symbol"], "ETH");
        assert_eq!(payload["timestamp"], "2024-05-06T07:08:09+00:00");

        let params = query_params(&payload);
        assert!(params.contains(&("base_currency".to_string(), "USDT".to_string())));
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut headers = BTreeMap::new();
        headers.insert("Bad Header".to_string(), "x".to_string());
        let result = WebhookSink::new(WebhookConfig {
            enabled: true,
            url: "https://example.com".to_string(),
            headers,
            ..WebhookConfig::default()
        });
        assert!(matches!(result, Err(AlertError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_missing_url_is_not_configured() {
        let sink = sink("");
        assert!(matches!(
            sink.send(&notice()).await,
            Err(SinkError::NotConfigured { sink: "webhook", .. })
        ));
    }
}
