//! Observability utilities.

use std::sync::OnceLock;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::Config;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize tracing subscriber once for the process.
///
/// Filter comes from `RUST_LOG`, falling back to [`Config::log_directive`].
/// JSON output is enabled by `observability.json_logs` or `RN_BRIDGE_LOG_FORMAT=json`.
pub fn init_tracing(config: &Config) {
    TRACING_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));
        let json = config.observability.json_logs
            || std::env::var("RN_BRIDGE_LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false);

        let result = if json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact())
                .try_init()
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

/// Map the native module's numeric log level onto a tracing filter.
///
/// 1 = errors only, 2 = info, 3 = everything, anything else disables logging.
pub fn level_filter_for_native(level: i32) -> LevelFilter {
    match level {
        1 => LevelFilter::ERROR,
        2 => LevelFilter::INFO,
        3 => LevelFilter::TRACE,
        _ => LevelFilter::OFF,
    }
}
