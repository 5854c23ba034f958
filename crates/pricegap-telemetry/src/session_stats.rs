//! Session statistics read back from the Prometheus counters.
//!
//! The supervisor logs a summary periodically and once more on shutdown.

use crate::metrics::{
    ALERTS_TOTAL, CYCLES_TOTAL, FETCHES_TOTAL, FETCH_LATENCY_MS, OPPORTUNITIES_TOTAL,
    PAUSES_TOTAL, SINK_DELIVERIES_TOTAL,
};
use chrono::{DateTime, Utc};
use pricegap_core::SourceId;
use serde::Serialize;
use tracing::info;

/// Fetch statistics for one source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFetchStats {
    pub source: SourceId,
    pub prices: u64,
    pub no_data: u64,
    pub failed: u64,
    pub avg_latency_ms: f64,
}

impl SourceFetchStats {
    /// Share of attempted fetches that produced a price.
    pub fn success_rate(&self) -> f64 {
        let attempts = self.prices + self.no_data + self.failed;
        if attempts == 0 {
            return 0.0;
        }
        self.prices as f64 / attempts as f64
    }
}

/// Statistics for the running session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub pair: String,
    pub started_at: DateTime<Utc>,
    pub cycles_compared: u64,
    pub cycles_insufficient: u64,
    pub cycles_failed: u64,
    pub pauses: u64,
    pub opportunities: u64,
    pub alerts_dispatched: u64,
    pub alerts_suppressed: u64,
    pub sink_failures: u64,
    pub sources: Vec<SourceFetchStats>,
}

impl SessionStats {
    pub fn total_cycles(&self) -> u64 {
        self.cycles_compared + self.cycles_insufficient + self.cycles_failed
    }
}

/// Session statistics reporter.
pub struct SessionStatsReporter {
    pair: String,
    sources: Vec<SourceId>,
    start_time: DateTime<Utc>,
}

impl SessionStatsReporter {
    pub fn new(pair: impl Into<String>, sources: Vec<SourceId>) -> Self {
        Self {
            pair: pair.into(),
            sources,
            start_time: Utc::now(),
        }
    }

    /// Current statistics.
    ///
    /// Counters are process-wide, so values include anything recorded
    /// before this reporter was created.
    pub fn get_stats(&self) -> SessionStats {
        let pair = self.pair.as_str();
        let opportunities = SourceId::ALL
            .iter()
            .flat_map(|buy| SourceId::ALL.iter().map(move |sell| (*buy, *sell)))
            .filter(|(buy, sell)| buy != sell)
            .map(|(buy, sell)| counter(&OPPORTUNITIES_TOTAL, &[pair, buy.key(), sell.key()]))
            .sum();

        SessionStats {
            pair: self.pair.clone(),
            started_at: self.start_time,
            cycles_compared: counter(&CYCLES_TOTAL, &[pair, "compared"]),
            cycles_insufficient: counter(&CYCLES_TOTAL, &[pair, "insufficient_data"]),
            cycles_failed: counter(&CYCLES_TOTAL, &[pair, "error"]),
            pauses: counter(&PAUSES_TOTAL, &[pair]),
            opportunities,
            alerts_dispatched: counter(&ALERTS_TOTAL, &[pair, "dispatched"]),
            alerts_suppressed: counter(&ALERTS_TOTAL, &[pair, "suppressed"]),
            sink_failures: counter(&SINK_DELIVERIES_TOTAL, &["failed"]),
            sources: self
                .sources
                .iter()
                .map(|source| source_stats(*source))
                .collect(),
        }
    }

    /// Output session statistics to logs.
    pub fn output_summary(&self) {
        let stats = self.get_stats();
        let duration = Utc::now() - self.start_time;
        let hours = duration.num_hours();
        let minutes = duration.num_minutes() % 60;

        info!("========== Session Statistics Summary ==========");
        info!(
            "Pair: {} since {} ({} hours {} minutes)",
            stats.pair,
            self.start_time.format("%Y-%m-%d %H:%M:%S UTC"),
            hours,
            minutes
        );
        info!(
            "  Cycles: {} (compared: {}, insufficient data: {}, failed: {})",
            stats.total_cycles(),
            stats.cycles_compared,
            stats.cycles_insufficient,
            stats.cycles_failed
        );
        info!(
            "  Opportunities: {} | Alerts sent: {} | suppressed: {} | sink failures: {}",
            stats.opportunities,
            stats.alerts_dispatched,
            stats.alerts_suppressed,
            stats.sink_failures
        );
        info!("  Error pauses: {}", stats.pauses);

        for s in &stats.sources {
            info!(
                "  {}: prices={} no_data={} failed={} success={:.1}% avg_latency={:.1}ms",
                s.source,
                s.prices,
                s.no_data,
                s.failed,
                s.success_rate() * 100.0,
                s.avg_latency_ms
            );
        }

        info!("================================================");
    }

    /// Get JSON-formatted statistics.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.get_stats()).unwrap_or(serde_json::Value::Null)
    }
}

fn counter(counter: &prometheus::CounterVec, labels: &[&str]) -> u64 {
    counter.with_label_values(labels).get() as u64
}

fn source_stats(source: SourceId) -> SourceFetchStats {
    let key = source.key();
    let latency = FETCH_LATENCY_MS.with_label_values(&[key]);
    let samples = latency.get_sample_count();
    let avg_latency_ms = if samples == 0 {
        0.0
    } else {
        latency.get_sample_sum() / samples as f64
    };

    SourceFetchStats {
        source,
        prices: counter(&FETCHES_TOTAL, &[key, "price"]),
        no_data: counter(&FETCHES_TOTAL, &[key, "no_data"]),
        failed: counter(&FETCHES_TOTAL, &[key, "failed"]),
        avg_latency_ms,
    }
}
