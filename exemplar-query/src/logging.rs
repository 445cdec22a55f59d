//! Optional logging bootstrap.
//!
//! The engine itself only emits `tracing` events (compile traces, pruned
//! recursions, skipped clauses, all at debug); nothing here is required for
//! correct behavior. Applications that already install a subscriber can
//! ignore this module. For quick diagnostics, enable the
//! `tracing-subscriber` feature and call [`init`] once at startup.
//!
//! # Environment Variables
//!
//! - `EXEMPLAR_DEBUG=true|1|yes` - Enable debug logging
//! - `EXEMPLAR_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `EXEMPLAR_LOG_FORMAT=json|pretty|compact` - Output format (default: json)

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via the `EXEMPLAR_DEBUG` environment
/// variable.
///
/// Returns `true` if set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("EXEMPLAR_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `EXEMPLAR_LOG_LEVEL`.
///
/// Defaults to "debug" if `EXEMPLAR_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    if let Ok(level) = env::var("EXEMPLAR_LOG_LEVEL") {
        match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => {
                if is_debug_enabled() {
                    "debug"
                } else {
                    "warn"
                }
            }
        }
    } else if is_debug_enabled() {
        "debug"
    } else {
        "warn"
    }
}

/// Get the configured log format from `EXEMPLAR_LOG_FORMAT`.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("EXEMPLAR_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize logging from the environment.
///
/// Call once at application startup; later calls are no-ops. Does nothing
/// unless `EXEMPLAR_DEBUG` or `EXEMPLAR_LOG_LEVEL` is set, and installs a
/// subscriber only when the `tracing-subscriber` feature is enabled.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("EXEMPLAR_LOG_LEVEL").is_err() {
            // No logging requested.
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{fmt, prelude::*, EnvFilter};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "exemplar={level},exemplar_query={level},exemplar_schema={level},exemplar_memory={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "pretty" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
            }

            tracing::debug!(level, format = get_log_format(), "exemplar logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var readers are exercised without mutating the process
    // environment; the defaults are what matters.

    #[test]
    fn test_defaults_without_env() {
        if env::var("EXEMPLAR_DEBUG").is_err() {
            assert!(!is_debug_enabled());
        }
        if env::var("EXEMPLAR_LOG_FORMAT").is_err() {
            assert_eq!(get_log_format(), "json");
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
