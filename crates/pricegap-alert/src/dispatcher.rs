//! Fan-out of alerts to the registered sinks.

use tracing::{error, info, warn};

use crate::error::SinkError;
use crate::sink::{AlertNotice, NotificationSink};

/// Per-dispatch delivery counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Registry of sinks (composite pattern).
///
/// Every dispatch also emits the `PRICE ALERT` log line, so an instance with
/// no sinks still surfaces alerts in its log.
#[derive(Default)]
pub struct AlertDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl AlertDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sink: Box<dyn NotificationSink>) {
        info!(sink = sink.name(), "Notification sink registered");
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Deliver `notice` to every sink in registration order.
    ///
    /// Sink failures are logged and counted, never returned.
    pub async fn dispatch(&self, notice: &AlertNotice) -> DispatchReport {
        error!(
            alert = true,
            pair = %notice.pair_label(),
            "🚨 PRICE ALERT 🚨 {}",
            notice.message
        );

        let mut report = DispatchReport::default();
        for sink in &self.sinks {
            match sink.send(notice).await {
                Ok(()) => {
                    info!(sink = sink.name(), pair = %notice.pair_label(), "Alert delivered");
                    report.delivered += 1;
                }
                Err(e @ SinkError::NotConfigured { .. }) => {
                    warn!(sink = sink.name(), reason = %e, "Alert sink skipped");
                    report.skipped += 1;
                }
                Err(e) => {
                    error!(sink = sink.name(), error = %e, "Failed to send alert");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkResult;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    struct RecordingSink {
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, notice: &AlertNotice) -> SinkResult<()> {
            self.seen.lock().unwrap().push(notice.message.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn send(&self, _notice: &AlertNotice) -> SinkResult<()> {
            Err(SinkError::Delivery("connection refused".to_string()))
        }
    }

    struct UnconfiguredSink;

    #[async_trait]
    impl NotificationSink for UnconfiguredSink {
        fn name(&self) -> &'static str {
            "unconfigured"
        }

        async fn send(&self, _notice: &AlertNotice) -> SinkResult<()> {
            Err(SinkError::NotConfigured {
                sink: "unconfigured",
                reason: "no recipient".to_string(),
            })
        }
    }

    fn notice() -> AlertNotice {
        AlertNotice {
            symbol: "XRP".to_string(),
            base_currency: "USDT".to_string(),
            message: "XRP/USDT: Buy on Binance".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_other_sinks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = AlertDispatcher::new();
        dispatcher.register(Box::new(FailingSink));
        dispatcher.register(Box::new(UnconfiguredSink));
        dispatcher.register(Box::new(RecordingSink { seen: seen.clone() }));

        let report = dispatcher.dispatch(&notice()).await;
        assert_eq!(
            report,
            DispatchReport {
                delivered: 1,
                skipped: 1,
                failed: 1
            }
        );
        assert_eq!(seen.lock().unwrap().as_slice(), ["XRP/USDT: Buy on Binance"]);
    }

    #[tokio::test]
    async fn test_empty_dispatcher() {
        let dispatcher = AlertDispatcher::new();
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.dispatch(&notice()).await, DispatchReport::default());
    }

    #[test]
    fn test_sink_names_in_order() {
        let mut dispatcher = AlertDispatcher::new();
        dispatcher.register(Box::new(FailingSink));
        dispatcher.register(Box::new(UnconfiguredSink));
        assert_eq!(dispatcher.sink_names(), vec!["failing", "unconfigured"]);
        assert_eq!(dispatcher.len(), 2);
    }
}
