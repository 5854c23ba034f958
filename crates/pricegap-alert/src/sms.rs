//! SMS sink backed by the Twilio Messages API.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use crate::config::SmsConfig;
use crate::error::{AlertError, AlertResult, SinkError, SinkResult};
use crate::sink::{AlertNotice, NotificationSink};

const SMS_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SmsSink {
    client: Client,
    config: SmsConfig,
}

impl SmsSink {
    pub fn new(config: SmsConfig) -> AlertResult<Self> {
        let client = Client::builder()
            .timeout(SMS_TIMEOUT)
            .build()
            .map_err(|e| AlertError::HttpClient(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// "PRICE ALERT - XRP/USDT: <message>".
    pub fn body(notice: &AlertNotice) -> String {
        format!("PRICE ALERT - {}: {}", notice.pair_label(), notice.message)
    }

    /// Credentials and numbers, or the reason the sink cannot send.
    fn credentials(&self) -> SinkResult<(&str, &str)> {
        if self.config.to_number.trim().is_empty() {
            return Err(SinkError::NotConfigured {
                sink: "sms",
                reason: "destination number (alerts.sms.to_number) is empty".to_string(),
            });
        }
        match (
            self.config.account_sid.as_deref().filter(|s| !s.is_empty()),
            self.config.auth_token.as_deref().filter(|s| !s.is_empty()),
        ) {
            (Some(sid), Some(token)) if !self.config.from_number.trim().is_empty() => {
                Ok((sid, token))
            }
            _ => Err(SinkError::NotConfigured {
                sink: "sms",
                reason: "Twilio credentials not fully configured".to_string(),
            }),
        }
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{account_sid}/Messages.json",
            self.config.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl NotificationSink for SmsSink {
    fn name(&self) -> &'static str {
        "sms"
    }

    async fn send(&self, notice: &AlertNotice) -> SinkResult<()> {
        let (sid, token) = self.credentials()?;
        let body = Self::body(notice);

        let response = self
            .client
            .post(self.messages_url(sid))
            .basic_auth(sid, Some(token))
            .form(&[
                ("To", self.config.to_number.as_str()),
                ("From", self.config.from_number.as_str()),
                ("Body", body.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SinkError::Delivery(format!("Twilio request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let message_sid = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("sid").and_then(|s| s.as_str()).map(str::to_string))
            .unwrap_or_default();
        info!(to = %self.config.to_number, sid = %message_sid, "SMS alert sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notice() -> AlertNotice {
        AlertNotice {
            symbol: "BTC".to_string(),
            base_currency: "USD".to_string(),
            message: "BTC/USD: Buy on Kraken".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn full_config() -> SmsConfig {
        SmsConfig {
            enabled: true,
            to_number: "+15550001111".to_string(),
            from_number: "+15550002222".to_string(),
            account_sid: Some("AC123".to_string()),
            auth_token: Some("secret".to_string()),
            ..SmsConfig::default()
        }
    }

    #[test]
    fn test_body_format() {
        assert_eq!(
            SmsSink::body(&notice()),
            "PRICE ALERT - BTC/USD: BTC/USD: Buy on Kraken"
        );
    }

    #[test]
    fn test_messages_url() {
        let sink = SmsSink::new(full_config()).unwrap();
        assert_eq!(
            sink.messages_url("AC123"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_credentials_checks() {
        let sink = SmsSink::new(full_config()).unwrap();
        assert_eq!(sink.credentials().unwrap(), ("AC123", "secret"));

        let sink = SmsSink::new(SmsConfig {
            auth_token: None,
            ..full_config()
        })
        .unwrap();
        assert!(matches!(
            sink.credentials(),
            Err(SinkError::NotConfigured { sink: "sms", .. })
        ));

        let sink = SmsSink::new(SmsConfig {
            to_number: String::new(),
            ..full_config()
        })
        .unwrap();
        assert!(sink.credentials().is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_send_makes_no_request() {
        let sink = SmsSink::new(SmsConfig::default()).unwrap();
        assert!(matches!(
            sink.send(&notice()).await,
            Err(SinkError::NotConfigured { .. })
        ));
    }
}
