//! Structured Logger
//!
//! Wraps `tracing` to provide console output plus a daily-rolling NDJSON
//! file, with environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global structured logger.
///
/// `level` is the default filter when `RUST_LOG` is unset; the HTTP client
/// stack is capped at `warn` either way so model-call chatter does not drown
/// the call log lines.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) {
    let default_filter = format!("{level},hyper=warn,reqwest=warn");
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Daily-rolling NDJSON file: `logs/careline.log.YYYY-MM-DD`
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "careline.log");
    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    // Human console output
    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
