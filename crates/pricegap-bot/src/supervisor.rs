//! Polling supervisor.
//!
//! Drives the fetch → compare → alert loop for one pair:
//! - Sequential source fetches in fixed order
//! - Consecutive-failure backoff (`ErrorCounter`)
//! - Global alert cooldown (`AlertThrottle`)
//! - Hourly session statistics
//!
//! All state is owned here; the loop runs as a single task and stops only
//! when the cancellation token fires or the optional cycle limit is reached.

use crate::backoff::ErrorCounter;
use crate::config::AppConfig;
use crate::error::AppResult;
use chrono::{DateTime, Utc};
use pricegap_alert::{
    AlertConfig, AlertDispatcher, AlertNotice, AlertThrottle, EmailSink, SmsSink,
    ThrottleDecision, WebhookSink,
};
use pricegap_core::{PricePoint, PriceSnapshot, SourceId, TrackedPair};
use pricegap_detector::{DetectionOutcome, DetectorConfig, DiscrepancyEngine, DiscrepancyResult};
use pricegap_source::{FetchOutcome, PriceTransport, SourceAdapter};
use pricegap_telemetry::{Metrics, SessionStatsReporter};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Session stats output interval (1 hour).
const STATS_INTERVAL: Duration = Duration::from_secs(3600);

/// Supervisor lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Running,
    Paused,
    Stopped,
}

impl SupervisorState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

/// Loop timing, backoff and alert settings.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub interval: Duration,
    pub max_errors: u32,
    pub pause_seconds: u64,
    pub cooldown_seconds: u64,
    /// Stop after this many attempted cycles.
    pub max_cycles: Option<u64>,
}

impl SupervisorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.polling.interval_seconds),
            max_errors: config.polling.max_errors,
            pause_seconds: config.polling.pause_seconds,
            cooldown_seconds: config.alerts.cooldown_seconds,
            max_cycles: None,
        }
    }
}

/// What one cycle observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Sources that returned a price.
    pub prices: usize,
    /// Transport failures.
    pub failures: usize,
    pub comparisons: usize,
    pub opportunities: usize,
    pub alerts_dispatched: usize,
    pub alerts_suppressed: usize,
    /// Session time at which the snapshot was compared.
    pub checked_at: Option<DateTime<Utc>>,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub pauses: u64,
}

/// Wall-clock time that follows tokio's clock.
///
/// Anchored to `Utc::now()` at start and advanced by `tokio::time::Instant`,
/// so a paused test runtime also controls alert timestamps and cooldowns.
#[derive(Debug, Clone, Copy)]
struct SessionClock {
    wall: DateTime<Utc>,
    mono: Instant,
}

impl SessionClock {
    fn start() -> Self {
        Self {
            wall: Utc::now(),
            mono: Instant::now(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.mono.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.wall + elapsed
    }
}

/// Register the sinks enabled in `config`.
pub fn build_dispatcher(config: &AlertConfig) -> AppResult<AlertDispatcher> {
    let mut dispatcher = AlertDispatcher::new();
    if config.email.enabled {
        dispatcher.register(Box::new(EmailSink::new(config.email.clone())));
    }
    if config.sms.enabled {
        dispatcher.register(Box::new(SmsSink::new(config.sms.clone())?));
    }
    if config.webhook.enabled {
        dispatcher.register(Box::new(WebhookSink::new(config.webhook.clone())?));
    }
    Ok(dispatcher)
}

/// Polling supervisor for one pair.
pub struct Supervisor {
    pair: TrackedPair,
    pair_label: String,
    adapters: Vec<SourceAdapter>,
    engine: DiscrepancyEngine,
    throttle: AlertThrottle,
    dispatcher: AlertDispatcher,
    errors: ErrorCounter,
    interval: Duration,
    max_cycles: Option<u64>,
    state: SupervisorState,
    cycles: u64,
    pauses: u64,
    stats: SessionStatsReporter,
    clock: SessionClock,
}

impl Supervisor {
    /// Create a supervisor over `adapters`, fetched in the given order.
    pub fn new(
        pair: TrackedPair,
        adapters: Vec<SourceAdapter>,
        dispatcher: AlertDispatcher,
        settings: SupervisorSettings,
    ) -> Self {
        let pair_label = pair.display_name();
        let sources = adapters.iter().map(|a| a.source()).collect();
        Self {
            engine: DiscrepancyEngine::new(DetectorConfig::for_pair(&pair)),
            throttle: AlertThrottle::new(settings.cooldown_seconds),
            errors: ErrorCounter::new(settings.max_errors, settings.pause_seconds),
            stats: SessionStatsReporter::new(pair_label.clone(), sources),
            pair,
            pair_label,
            adapters,
            dispatcher,
            interval: settings.interval,
            max_cycles: settings.max_cycles,
            state: SupervisorState::Running,
            cycles: 0,
            pauses: 0,
            clock: SessionClock::start(),
        }
    }

    /// Build from a validated config. Every source gets an adapter so
    /// disabled ones still appear in each snapshot.
    pub fn from_config(config: &AppConfig, transport: Arc<dyn PriceTransport>) -> AppResult<Self> {
        let pair = config.tracked_pair()?;
        let adapters = SourceId::ALL
            .into_iter()
            .map(|source| {
                SourceAdapter::new(source, transport.clone())
                    .with_enabled(config.sources.is_enabled(source))
            })
            .collect();
        let dispatcher = build_dispatcher(&config.alerts)?;
        Ok(Self::new(
            pair,
            adapters,
            dispatcher,
            SupervisorSettings::from_config(config),
        ))
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn pair(&self) -> &TrackedPair {
        &self.pair
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.errors.consecutive_errors()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn pauses(&self) -> u64 {
        self.pauses
    }

    pub fn throttle(&self) -> &AlertThrottle {
        &self.throttle
    }

    fn set_state(&mut self, state: SupervisorState) {
        self.state = state;
        Metrics::supervisor_state_set(state.label());
    }

    fn cycle_limit_reached(&self) -> bool {
        self.max_cycles.is_some_and(|max| self.cycles >= max)
    }

    /// Run until cancelled or the cycle limit is reached.
    pub async fn run(&mut self, cancel: CancellationToken) -> RunSummary {
        let enabled: Vec<&str> = self
            .adapters
            .iter()
            .filter(|a| a.is_enabled())
            .map(|a| a.source().name())
            .collect();
        info!(
            pair = %self.pair_label,
            threshold_percent = %self.pair.threshold_percent,
            interval_secs = self.interval.as_secs(),
            sources = %enabled.join(", "),
            sinks = ?self.dispatcher.sink_names(),
            max_cycles = ?self.max_cycles,
            "Starting price discrepancy monitor"
        );

        self.set_state(SupervisorState::Running);
        let mut last_stats_output = Instant::now();

        loop {
            if cancel.is_cancelled() || self.cycle_limit_reached() {
                break;
            }

            if self.errors.should_pause() {
                if !self.pause(&cancel).await {
                    break;
                }
                continue;
            }

            self.cycles += 1;
            match self.run_cycle().await {
                Ok(report) => {
                    debug!(cycle = self.cycles, ?report, "Cycle complete");
                }
                Err(e) => {
                    error!(cycle = self.cycles, error = %e, "Error in price check cycle");
                    self.errors.record_failure();
                    Metrics::cycle_completed(&self.pair_label, "error");
                }
            }
            Metrics::consecutive_errors(self.errors.consecutive_errors());

            if last_stats_output.elapsed() >= STATS_INTERVAL {
                self.stats.output_summary();
                last_stats_output = Instant::now();
            }

            if self.cycle_limit_reached() {
                info!(cycles = self.cycles, "Cycle limit reached");
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.set_state(SupervisorState::Stopped);
        self.stats.output_summary();
        info!(cycles = self.cycles, pauses = self.pauses, "Price discrepancy monitor stopped");

        RunSummary {
            cycles: self.cycles,
            pauses: self.pauses,
        }
    }

    /// Sleep out an error pause. Returns false if cancelled during it.
    async fn pause(&mut self, cancel: &CancellationToken) -> bool {
        let pause = self.errors.pause_duration();
        error!(
            consecutive_errors = self.errors.consecutive_errors(),
            pause_secs = pause.as_secs(),
            "Too many consecutive errors, pausing for {} seconds",
            pause.as_secs()
        );
        self.set_state(SupervisorState::Paused);
        self.pauses += 1;
        Metrics::pause_entered(&self.pair_label);

        let completed = tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(pause) => true,
        };

        self.errors.reset();
        Metrics::consecutive_errors(0);
        if completed {
            info!("Resuming after error pause");
            self.set_state(SupervisorState::Running);
        }
        completed
    }

    /// Run one fetch → compare → alert cycle.
    pub async fn run_cycle(&mut self) -> AppResult<CycleReport> {
        let mut report = CycleReport::default();
        let mut snapshot = PriceSnapshot::new();

        for adapter in &self.adapters {
            let started = Instant::now();
            let outcome = adapter.fetch_price(&self.pair).await;
            if !matches!(outcome, FetchOutcome::Disabled) {
                Metrics::fetch_completed(
                    adapter.source(),
                    outcome.label(),
                    started.elapsed().as_secs_f64() * 1000.0,
                );
            }

            match &outcome {
                FetchOutcome::Price(_) => {
                    report.prices += 1;
                    self.errors.record_success();
                }
                FetchOutcome::Failed(_) => {
                    report.failures += 1;
                    self.errors.record_failure();
                }
                FetchOutcome::NoData | FetchOutcome::Disabled => {}
            }

            snapshot.insert(PricePoint::new(
                adapter.source(),
                outcome.price(),
                self.clock.now(),
            ));
        }

        let checked_at = self.clock.now();
        report.checked_at = Some(checked_at);
        let detection = self.engine.evaluate(&self.pair, &snapshot, checked_at)?;
        if report.failures == 0 {
            self.errors.reset();
        }

        match &detection {
            DetectionOutcome::InsufficientData { .. } => {
                Metrics::cycle_completed(&self.pair_label, "insufficient_data");
            }
            DetectionOutcome::Compared { .. } => {
                Metrics::cycle_completed(&self.pair_label, "compared");
            }
        }

        report.comparisons = detection.comparisons();
        report.opportunities = detection.opportunities().len();
        for opportunity in detection.opportunities() {
            Metrics::opportunity_detected(
                &self.pair_label,
                opportunity.buy_source,
                opportunity.sell_source,
            );
        }

        for opportunity in detection.alertable() {
            if self.offer_alert(opportunity).await {
                report.alerts_dispatched += 1;
            } else {
                report.alerts_suppressed += 1;
            }
        }

        Ok(report)
    }

    /// Pass an alertable opportunity through the throttle. Returns true if
    /// it was dispatched.
    async fn offer_alert(&mut self, opportunity: &DiscrepancyResult) -> bool {
        let now = opportunity.detected_at;
        match self.throttle.check(now) {
            ThrottleDecision::Dispatch => {
                let notice = AlertNotice::new(&self.pair, opportunity.alert_message(&self.pair), now);
                let delivery = self.dispatcher.dispatch(&notice).await;
                Metrics::alert_dispatched(&self.pair_label);
                Metrics::sink_deliveries(delivery.delivered, delivery.skipped, delivery.failed);
                true
            }
            ThrottleDecision::Suppress { remaining_secs } => {
                debug!(
                    pair = %self.pair_label,
                    remaining_secs,
                    "Alert for {} suppressed due to cooldown",
                    self.pair_label
                );
                Metrics::alert_suppressed(&self.pair_label);
                false
            }
        }
    }
}
