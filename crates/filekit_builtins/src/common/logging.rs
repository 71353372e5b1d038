//! Logging set-up for the filekit binaries.
//!
//! The listing engine only emits `tracing` events; this module installs the
//! subscriber that turns them into text on stderr. The level comes from the
//! `FILEKIT_LOG` environment variable (any `EnvFilter` directive) and defaults
//! to `error`, so diagnostics printed by the commands themselves are not
//! duplicated by log lines unless asked for.

use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "FILEKIT_LOG";

static LOGGER_INSTANCE: OnceCell<LoggingConfig> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    Json,
    Pretty,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    Stderr,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "error".to_string(),
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
        }
    }
}

impl LoggingConfig {
    /// Defaults overridden by `FILEKIT_LOG` when it is set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var(LOG_ENV) {
            if !level.trim().is_empty() {
                config.level = level;
            }
        }
        config
    }
}

/// Initialize the logging system with configuration.
///
/// Only the first call installs a subscriber; later calls return the
/// configuration that won.
pub fn init_with(config: LoggingConfig) -> Result<&'static LoggingConfig> {
    LOGGER_INSTANCE.get_or_try_init(|| -> Result<LoggingConfig> {
        setup_tracing_subscriber(&config)?;
        Ok(config)
    })
}

/// Initialize global logger with optional level filter
pub fn init(level: Option<Level>) {
    let mut config = LoggingConfig::from_env();
    if let Some(level) = level {
        config.level = level.to_string().to_lowercase();
    }
    let _ = init_with(config);
}

/// Configuration installed by the first successful `init_with`, if any.
pub fn active_config() -> Option<&'static LoggingConfig> {
    LOGGER_INSTANCE.get()
}

#[cfg(feature = "logging")]
fn setup_tracing_subscriber(config: &LoggingConfig) -> Result<()> {
    use anyhow::Context;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_new(&config.level)
        .or_else(|_| EnvFilter::try_new("error"))
        .context("Failed to create log filter")?;

    macro_rules! install {
        ($writer:expr) => {
            match config.format {
                LogFormat::Json => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer($writer))
                    .try_init(),
                LogFormat::Pretty => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty().with_writer($writer))
                    .try_init(),
                LogFormat::Compact => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact().with_target(false).with_writer($writer))
                    .try_init(),
                LogFormat::Plain => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_writer($writer))
                    .try_init(),
            }
        };
    }

    match config.output {
        LogOutput::Stdout => install!(std::io::stdout),
        LogOutput::Stderr => install!(std::io::stderr),
    }
    .context("Failed to install tracing subscriber")
}

#[cfg(not(feature = "logging"))]
fn setup_tracing_subscriber(_config: &LoggingConfig) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn env_overrides_default_level() {
        std::env::set_var(LOG_ENV, "filekit_builtins=debug");
        let config = LoggingConfig::from_env();
        std::env::remove_var(LOG_ENV);

        assert_eq!(config.level, "filekit_builtins=debug");
        assert_eq!(config.output, LogOutput::Stderr);
    }

    #[test]
    #[serial]
    fn blank_env_keeps_default() {
        std::env::set_var(LOG_ENV, "  ");
        let config = LoggingConfig::from_env();
        std::env::remove_var(LOG_ENV);

        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn config_reads_from_json() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level":"warn","format":"json","output":"stdout"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stdout);
    }
}
