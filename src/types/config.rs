//! Configuration structures.
//!
//! Configuration arrives as the JSON options object the host app passes at
//! startup. Every section has defaults, so `{}` is a valid config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::{Error, Result};

/// Top-level bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Client options forwarded from the host app.
    #[serde(default)]
    pub client: ClientOptions,

    /// Stack symbolication and frame normalization.
    #[serde(default)]
    pub symbolication: SymbolicationConfig,

    /// Native delivery transport.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Parse a config from a JSON options object.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot work at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.transport.buffer_size == 0 {
            return Err(Error::config("transport.buffer_size must be at least 1"));
        }
        self.symbolication.internal_callsites_regex()?;
        Ok(())
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &str {
        let level = self.observability.log_level.as_str();
        if self.client.debug && !matches!(level, "debug" | "trace") {
            "debug"
        } else {
            level
        }
    }
}

/// Client options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Verbose SDK logging. Raises the default filter to `debug`.
    pub debug: bool,

    pub environment: Option<String>,
    pub release: Option<String>,
    pub dist: Option<String>,
}

/// Symbolication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolicationConfig {
    /// Development build: symbolicate against the dev server and fetch source context.
    pub development: bool,

    /// Lines of source context above and below the reported line.
    pub context_lines: usize,

    /// Regexes for framework bridge/renderer files hidden from dev-mode traces.
    pub internal_callsites: Vec<String>,

    /// Path fragments marking vendored dependency code.
    pub vendor_markers: Vec<String>,

    /// Placeholder the engine uses for frames without a script source.
    pub native_code_marker: String,

    /// Request timeout for dev-server source fetches.
    #[serde(with = "humantime_serde")]
    pub source_fetch_timeout: Duration,
}

impl SymbolicationConfig {
    /// Compile the internal-callsite denylist into a single alternation.
    pub fn internal_callsites_regex(&self) -> Result<regex::Regex> {
        regex::Regex::new(&self.internal_callsites.join("|"))
            .map_err(|e| Error::config(format!("invalid internal_callsites pattern: {}", e)))
    }
}

impl Default for SymbolicationConfig {
    fn default() -> Self {
        Self {
            development: false,
            context_lines: 5,
            internal_callsites: vec![
                r"ReactNativeRenderer-dev\.js$".to_string(),
                r"MessageQueue\.js$".to_string(),
            ],
            vendor_markers: vec!["node_modules".to_string()],
            native_code_marker: "native code".to_string(),
            source_fetch_timeout: Duration::from_secs(5),
        }
    }
}

/// Native delivery transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Maximum concurrent in-flight deliveries.
    pub buffer_size: usize,

    /// Default drain timeout used when closing the client.
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            buffer_size: 30,
            shutdown_timeout: Duration::from_secs(2),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
