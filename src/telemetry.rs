// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tracing subscriber for this process.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the console
//! level in the settings. Output goes to stderr so stdout stays free for the
//! rendered settings document.

use tracing_subscriber::EnvFilter;

use crate::config::LOG_FORMAT_ENV;
use crate::error::{ConfigError, ConfigResult};
use crate::loader::EnvSource;
use crate::settings::ConsoleLogging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }

    /// Read `LOG_FORMAT`; unset means pretty.
    pub fn from_env<E: EnvSource + ?Sized>(env: &E) -> ConfigResult<LogFormat> {
        match env.var(LOG_FORMAT_ENV).filter(|v| !v.trim().is_empty()) {
            Some(raw) => LogFormat::parse(&raw).ok_or_else(|| {
                ConfigError::invalid(LOG_FORMAT_ENV, raw, "expected json or pretty")
            }),
            None => Ok(LogFormat::default()),
        }
    }
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(console: &ConsoleLogging) -> EnvFilter {
    EnvFilter::new(console.level.as_str())
}

/// Install the global subscriber.
pub fn init_logging(
    console: &ConsoleLogging,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(console));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LogLevel;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn format_parsing() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn format_from_env_defaults_to_pretty() {
        assert_eq!(LogFormat::from_env(&[("LOG_FORMAT", "")]).unwrap(), LogFormat::Pretty);
        assert_eq!(
            LogFormat::from_env(&[("LOG_FORMAT", "json")]).unwrap(),
            LogFormat::Json
        );
        let err = LogFormat::from_env(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert_eq!(err.key(), Some("LOG_FORMAT"));
    }

    #[test]
    fn default_filter_uses_console_level() {
        let console = ConsoleLogging {
            level: LogLevel::Debug,
            ..ConsoleLogging::default()
        };
        assert_eq!(
            default_filter(&console).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }
}
