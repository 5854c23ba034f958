//! Scripted price transport for integration tests.
//!
//! Each source gets a queue of responses. The last response sticks once the
//! queue is down to one entry; unscripted sources answer with an empty body.

use async_trait::async_trait;
use pricegap_core::SourceId;
use pricegap_source::{PriceTransport, QuoteRequest, TransportError};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub type Step = Result<Value, TransportError>;

#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<SourceId, VecDeque<Step>>>,
    calls: Mutex<Vec<QuoteRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `steps` for `source`.
    pub fn script(self, source: SourceId, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(source, steps.into_iter().collect());
        self
    }

    pub fn calls(&self) -> Vec<QuoteRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, source: SourceId) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.source() == source)
            .count()
    }
}

#[async_trait]
impl PriceTransport for ScriptedTransport {
    async fn fetch(&self, request: &QuoteRequest) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(request.clone());

        let mut scripts = self.scripts.lock().unwrap();
        let Some(queue) = scripts.get_mut(&request.source()) else {
            return Ok(json!({}));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap_or_else(|| Ok(json!({})))
        }
    }
}

pub fn binance(price: &str) -> Step {
    Ok(json!({"symbol": "XRPUSDT", "lastPrice": price}))
}

pub fn kraken(price: &str) -> Step {
    Ok(json!({
        "error": [],
        "result": {
            "XRPUSDT": {
                "a": [price, "1", "1.000"],
                "b": [price, "1", "1.000"],
                "c": [price, "10.0"],
                "v": ["1000.0", "2000.0"],
                "p": [price, price],
                "t": [10, 20],
                "l": [price, price],
                "h": [price, price],
                "o": price
            }
        }
    }))
}

pub fn coingecko(price: f64) -> Step {
    Ok(json!({"ripple": {"usdt": price}}))
}

pub fn timeout() -> Step {
    Err(TransportError::Timeout("request timed out after 10s".to_string()))
}
