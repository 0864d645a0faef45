//! Telemetry configuration from environment variables.

use std::env;

const DEFAULT_SERVICE: &str = "quantum-chain-warp";

/// Logging configuration for a warp subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to log lines
    pub service_name: String,

    /// Subsystem identifier ("18", "19")
    pub subsystem_id: String,

    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,

    /// Emit log lines at all
    pub console_output: bool,

    /// One JSON object per log line
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE.to_string(),
            subsystem_id: "00".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Read configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `QC_SERVICE_NAME`: service name (default: quantum-chain-warp)
    /// - `QC_SUBSYSTEM_ID`: subsystem id (default: 00)
    /// - `QC_LOG_LEVEL` or `RUST_LOG`: filter (default: info)
    /// - `QC_CONSOLE_OUTPUT`: `false`/`0` silences output
    /// - `QC_JSON_LOGS`: `true`/`1` selects JSON; containers default to JSON
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Configuration for subsystem `id`, e.g. `("19", "warp-predicates")`.
    pub fn for_subsystem(id: &str, name: &str) -> Self {
        Self {
            subsystem_id: id.to_string(),
            service_name: format!("qc-{id}-{name}"),
            ..Self::from_env()
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let in_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();
        let flag =
            |key: &str| lookup(key).map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"));

        Self {
            service_name: lookup("QC_SERVICE_NAME").unwrap_or(defaults.service_name),
            subsystem_id: lookup("QC_SUBSYSTEM_ID").unwrap_or(defaults.subsystem_id),
            log_level: lookup("QC_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            console_output: lookup("QC_CONSOLE_OUTPUT")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0"))
                .unwrap_or(defaults.console_output),
            json_logs: flag("QC_JSON_LOGS").unwrap_or(in_container),
        }
    }
}
