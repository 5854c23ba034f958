//! Prometheus metrics for pricegap.
//!
//! Provides observability for:
//! - Polling cycles and supervisor state
//! - Per-source fetch outcomes and latency
//! - Detected discrepancies and alert throttling
//! - Notification sink delivery
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.
//! These panics only occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use pricegap_core::SourceId;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, register_int_gauge,
    CounterVec, GaugeVec, HistogramVec, IntGauge,
};

/// Completed polling cycles.
/// Labels: pair, outcome (compared/insufficient_data/error)
pub static CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricegap_cycles_total",
        "Total polling cycles by outcome",
        &["pair", "outcome"]
    )
    .unwrap()
});

/// Supervisor state (1 = active, 0 = inactive).
/// Labels: state (running/paused/stopped)
pub static SUPERVISOR_STATE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "pricegap_supervisor_state",
        "Polling supervisor current state (1=active, 0=inactive)",
        &["state"]
    )
    .unwrap()
});

/// Consecutive source failures seen by the supervisor.
pub static CONSECUTIVE_ERRORS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "pricegap_consecutive_errors",
        "Consecutive fetch or cycle failures since the last success"
    )
    .unwrap()
});

/// Error pauses entered.
pub static PAUSES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricegap_pauses_total",
        "Total error pauses entered by the supervisor",
        &["pair"]
    )
    .unwrap()
});

/// Per-source fetch outcomes.
/// Labels: source, outcome (price/no_data/failed/disabled)
pub static FETCHES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricegap_fetches_total",
        "Total source fetches by outcome",
        &["source", "outcome"]
    )
    .unwrap()
});

/// Fetch latency in milliseconds.
pub static FETCH_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "pricegap_fetch_latency_ms",
        "Source fetch latency in milliseconds",
        &["source"],
        vec![10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// Discrepancies at or above the configured threshold.
pub static OPPORTUNITIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricegap_opportunities_total",
        "Total discrepancies at or above threshold",
        &["pair", "buy_source", "sell_source"]
    )
    .unwrap()
});

/// Throttle decisions for alertable discrepancies.
/// Labels: pair, decision (dispatched/suppressed)
pub static ALERTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricegap_alerts_total",
        "Total alert throttle decisions",
        &["pair", "decision"]
    )
    .unwrap()
});

/// Sink delivery results.
/// Labels: result (delivered/skipped/failed)
pub static SINK_DELIVERIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricegap_sink_deliveries_total",
        "Total notification sink deliveries by result",
        &["result"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record a finished polling cycle.
    pub fn cycle_completed(pair: &str, outcome: &str) {
        CYCLES_TOTAL.with_label_values(&[pair, outcome]).inc();
    }

    /// Set the supervisor state. Only the active state is 1.
    pub fn supervisor_state_set(state: &str) {
        for s in &["running", "paused", "stopped"] {
            SUPERVISOR_STATE.with_label_values(&[s]).set(0.0);
        }
        SUPERVISOR_STATE.with_label_values(&[state]).set(1.0);
    }

    pub fn consecutive_errors(count: u32) {
        CONSECUTIVE_ERRORS.set(i64::from(count));
    }

    /// Record an error pause.
    pub fn pause_entered(pair: &str) {
        PAUSES_TOTAL.with_label_values(&[pair]).inc();
    }

    /// Record a fetch outcome and its latency.
    pub fn fetch_completed(source: SourceId, outcome: &str, latency_ms: f64) {
        FETCHES_TOTAL
            .with_label_values(&[source.key(), outcome])
            .inc();
        FETCH_LATENCY_MS
            .with_label_values(&[source.key()])
            .observe(latency_ms);
    }

    /// Record a discrepancy at or above threshold.
    pub fn opportunity_detected(pair: &str, buy_source: SourceId, sell_source: SourceId) {
        OPPORTUNITIES_TOTAL
            .with_label_values(&[pair, buy_source.key(), sell_source.key()])
            .inc();
    }

    pub fn alert_dispatched(pair: &str) {
        ALERTS_TOTAL.with_label_values(&[pair, "dispatched"]).inc();
    }

    pub fn alert_suppressed(pair: &str) {
        ALERTS_TOTAL.with_label_values(&[pair, "suppressed"]).inc();
    }

    /// Record the per-sink results of one dispatch.
    pub fn sink_deliveries(delivered: usize, skipped: usize, failed: usize) {
        SINK_DELIVERIES_TOTAL
            .with_label_values(&["delivered"])
            .inc_by(delivered as f64);
        SINK_DELIVERIES_TOTAL
            .with_label_values(&["skipped"])
            .inc_by(skipped as f64);
        SINK_DELIVERIES_TOTAL
            .with_label_values(&["failed"])
            .inc_by(failed as f64);
    }
}
