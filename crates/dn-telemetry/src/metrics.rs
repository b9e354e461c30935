//! Prometheus metrics for the devnet bootstrap coordinator.
//!
//! All metrics follow the naming convention: `dn_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Genesis ceremony steps by description and outcome
    pub static ref CEREMONY_STEPS: CounterVec = CounterVec::new(
        Opts::new("dn_ceremony_steps_total", "Genesis ceremony steps executed"),
        &["step", "outcome"]  // outcome: success/failure
    ).expect("metric creation failed");

    /// Ceremony wall-clock duration
    pub static ref CEREMONY_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dn_ceremony_duration_seconds",
            "Time spent running the whole genesis ceremony"
        ).buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0])
    ).expect("metric creation failed");

    /// Dynamic dial batches by outcome
    pub static ref DIAL_BATCHES: CounterVec = CounterVec::new(
        Opts::new("dn_dial_batches_total", "Peer dial batches issued"),
        &["outcome"]  // outcome: success/failure/skipped
    ).expect("metric creation failed");

    /// Node configs assembled by role
    pub static ref NODES_ASSEMBLED: CounterVec = CounterVec::new(
        Opts::new("dn_nodes_assembled_total", "Node startup configs assembled"),
        &["role"]  // role: validator/seed/full
    ).expect("metric creation failed");
}

/// Outcome label for a fallible operation.
pub fn outcome_label<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "failure"
    }
}

pub fn record_ceremony_step(step: &str, outcome: &str) {
    CEREMONY_STEPS.with_label_values(&[step, outcome]).inc();
}

pub fn record_dial_batch(outcome: &str) {
    DIAL_BATCHES.with_label_values(&[outcome]).inc();
}

pub fn record_node_assembled(role: &str) {
    NODES_ASSEMBLED.with_label_values(&[role]).inc();
}

/// Handle over the global registry.
#[derive(Clone)]
pub struct MetricsHandle {
    registry: Registry,
}

impl MetricsHandle {
    /// Render every registered metric in Prometheus text format.
    pub fn gather(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
    }
}

/// Register all metrics with the global registry. Safe to call twice.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(CEREMONY_STEPS.clone()),
        Box::new(CEREMONY_DURATION.clone()),
        Box::new(DIAL_BATCHES.clone()),
        Box::new(NODES_ASSEMBLED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: REGISTRY.clone(),
    })
}
