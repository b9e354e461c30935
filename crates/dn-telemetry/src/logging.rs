//! Subscriber setup and structured log helpers.
//!
//! Every line carries the same fields so log shippers can parse them:
//! `timestamp`, `level`, `target`, `component`, the message, and the
//! fields of any enclosing span (for example a ceremony `run_id`).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Filter from the resolved `log_level` alone. `RUST_LOG` is already
/// folded into it behind `DN_LOG_LEVEL`, so the environment is not read
/// again here.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Install the global subscriber: level filter plus a pretty or JSON layer.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match (config.console_output, config.json_logs) {
        (false, _) => registry.try_init(),
        (true, true) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        (true, false) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .try_init(),
    }
    .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        network = %config.network,
        json = config.json_logs,
        "logging initialized"
    );
    Ok(())
}

/// Structured log entry tagged with the emitting component.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a node-related event with its service name.
#[macro_export]
macro_rules! log_node_event {
    ($level:ident, $component:expr, $msg:expr, $service:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            service = %$service,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_filter_follows_resolved_level() {
        let config = TelemetryConfig::from_lookup(|key| match key {
            "DN_LOG_LEVEL" => Some("debug".to_string()),
            "RUST_LOG" => Some("error".to_string()),
            _ => None,
        });
        let filter = build_filter(&config).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let config = TelemetryConfig {
            log_level: "devnet=loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(build_filter(&config), Err(TelemetryError::Config(_))));
    }
}
