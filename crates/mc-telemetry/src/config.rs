//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,

    /// Filter directive (`info`, `medichain=debug,reqwest=warn`, ...)
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Whether to write logs to the console at all
    pub console_output: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "medichain".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            console_output: true,
        }
    }
}

fn flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MC_SERVICE_NAME`: Service name (default: medichain)
    /// - `RUST_LOG` or `MC_LOG_LEVEL`: Filter directive (default: info)
    /// - `MC_JSON_LOGS`: JSON output (default: false)
    /// - `MC_CONSOLE_OUTPUT`: Console output (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            service_name: lookup("MC_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: lookup("RUST_LOG")
                .or_else(|| lookup("MC_LOG_LEVEL"))
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_level),
            json_logs: lookup("MC_JSON_LOGS").map_or(defaults.json_logs, |v| flag(&v)),
            console_output: lookup("MC_CONSOLE_OUTPUT")
                .map_or(defaults.console_output, |v| {
                    !v.eq_ignore_ascii_case("false") && v != "0"
                }),
        }
    }

    /// Override the filter, e.g. from a `--verbose` flag.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::from_lookup(lookup(&[]));
        assert_eq!(config, TelemetryConfig::default());
        assert_eq!(config.log_level, "info");
        assert!(config.console_output);
    }

    #[test]
    fn test_rust_log_wins() {
        let config = TelemetryConfig::from_lookup(lookup(&[
            ("RUST_LOG", "debug"),
            ("MC_LOG_LEVEL", "warn"),
        ]));
        assert_eq!(config.log_level, "debug");
        let config = TelemetryConfig::from_lookup(lookup(&[("MC_LOG_LEVEL", "warn")]));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_flags() {
        let config = TelemetryConfig::from_lookup(lookup(&[
            ("MC_JSON_LOGS", "TRUE"),
            ("MC_CONSOLE_OUTPUT", "0"),
        ]));
        assert!(config.json_logs);
        assert!(!config.console_output);
    }

    #[test]
    fn test_serde_defaults() {
        let config: TelemetryConfig = serde_json::from_str(r#"{"json_logs":true}"#).unwrap();
        assert!(config.json_logs);
        assert_eq!(config.service_name, "medichain");
    }
}
