//! HTTP transport for the public ticker endpoints.
//!
//! Binance `GET /api/v3/ticker/24hr?symbol=`, Kraken
//! `GET /0/public/Ticker?pair=` and CoinGecko
//! `GET /api/v3/simple/price?ids=&vs_currencies=`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{SourceError, SourceResult, TransportError};
use crate::transport::{PriceTransport, QuoteRequest};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("pricegap/", env!("CARGO_PKG_VERSION"));

/// Base URLs and timeout for the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEndpoints {
    #[serde(default = "default_binance_url")]
    pub binance_url: String,
    #[serde(default = "default_kraken_url")]
    pub kraken_url: String,
    #[serde(default = "default_coingecko_url")]
    pub coingecko_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_binance_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_kraken_url() -> String {
    "https://api.kraken.com".to_string()
}

fn default_coingecko_url() -> String {
    "https://api.coingecko.com".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            binance_url: default_binance_url(),
            kraken_url: default_kraken_url(),
            coingecko_url: default_coingecko_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// reqwest-backed `PriceTransport`.
pub struct HttpTransport {
    client: Client,
    endpoints: SourceEndpoints,
}

impl HttpTransport {
    pub fn new(endpoints: SourceEndpoints) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoints.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &SourceEndpoints {
        &self.endpoints
    }

    /// URL and query parameters for a request.
    fn request_target(&self, request: &QuoteRequest) -> (String, Vec<(&'static str, String)>) {
        match request {
            QuoteRequest::BinanceTicker { symbol } => (
                join_url(&self.endpoints.binance_url, "/api/v3/ticker/24hr"),
                vec![("symbol", symbol.clone())],
            ),
            QuoteRequest::KrakenTicker { pair } => (
                join_url(&self.endpoints.kraken_url, "/0/public/Ticker"),
                vec![("pair", pair.clone())],
            ),
            QuoteRequest::CoinGeckoSimplePrice { coin_id, currency } => (
                join_url(&self.endpoints.coingecko_url, "/api/v3/simple/price"),
                vec![("ids", coin_id.clone()), ("vs_currencies", currency.clone())],
            ),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[async_trait]
impl PriceTransport for HttpTransport {
    async fn fetch(&self, request: &QuoteRequest) -> Result<serde_json::Value, TransportError> {
        let (url, query) = self.request_target(request);
        debug!(url = %url, request = %request, "Fetching quote");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(format!("{request}: {e}"))
                } else {
                    TransportError::Request(format!("{request}: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TransportError::Decode(format!("{request}: {e}")))
    }
}
