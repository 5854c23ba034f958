//! Notification sinks that record or fail.

use async_trait::async_trait;
use pricegap_alert::{AlertNotice, NotificationSink, SinkError, SinkResult};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct RecordingSink {
    seen: Arc<Mutex<Vec<AlertNotice>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<AlertNotice> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, notice: &AlertNotice) -> SinkResult<()> {
        self.seen.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// Always fails delivery.
pub struct BrokenSink;

#[async_trait]
impl NotificationSink for BrokenSink {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn send(&self, _notice: &AlertNotice) -> SinkResult<()> {
        Err(SinkError::Delivery("connection reset by peer".to_string()))
    }
}
