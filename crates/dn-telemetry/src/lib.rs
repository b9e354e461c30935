//! # DN Telemetry
//!
//! Structured logging and Prometheus metrics for the devnet bootstrap
//! coordinator.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dn_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let telemetry = init_telemetry(TelemetryConfig::from_env())?;
//! // ... run the ceremony ...
//! println!("{}", telemetry.metrics().gather()?);
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `devnet-bootstrap` | Service name in logs |
//! | `DN_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `DN_JSON_LOGS` | `false` | JSON log lines (default on in containers) |
//! | `DN_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `DN_NETWORK` | `devnet` | Network label |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};
pub use metrics::{
    outcome_label, record_ceremony_step, record_dial_batch, record_node_assembled,
    register_metrics, MetricsHandle, CEREMONY_DURATION, CEREMONY_STEPS, DIAL_BATCHES,
    NODES_ASSEMBLED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the global subscriber.
pub fn init_telemetry(config: TelemetryConfig) -> Result<Telemetry, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(&config)?;
    Ok(Telemetry { config, metrics })
}

/// Live telemetry: configuration plus the metrics handle.
pub struct Telemetry {
    config: TelemetryConfig,
    metrics: MetricsHandle,
}

impl Telemetry {
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_name() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "devnet-bootstrap");
    }
}
