//! Structured logging for cvd-core.
//!
//! - stdout is reserved for command payloads (JSON/Markdown/summary output)
//! - stderr receives all log output, human-readable or JSON lines
//! - every invocation carries a `run-<12 hex>` correlation id

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Event targets used across the crate.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const COMMAND_FAILED: &str = "command.failed";
}

/// Initialize the logging subsystem.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directive) if std::env::var("CVD_LOG").is_err() => {
            EnvFilter::try_new(directive).unwrap_or_else(|_| default_filter(config))
        }
        _ => default_filter(config),
    };

    let result = match config.format {
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

fn default_filter(config: &LogConfig) -> EnvFilter {
    let level: tracing_subscriber::filter::LevelFilter = config.level.into();
    EnvFilter::default().add_directive(level.into())
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_shape() {
        let id = generate_run_id();
        assert!(id.starts_with("run-"));
        assert_eq!(id.len(), 16);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_run_id());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default().with_level(LogLevel::Off);
        init_logging(&config);
        init_logging(&config);
    }
}
