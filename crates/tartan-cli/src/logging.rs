//! Tracing setup.
//!
//! Filtering follows `RUST_LOG` (default `warn`):
//! - `RUST_LOG=debug` - every edit the loom makes
//! - `RUST_LOG=tartan::warp=debug` - warp changes only
//!
//! Batch commands log to stderr. The editor owns the terminal, so it logs
//! to `<config_dir>/tartan/logs/tartan.log` with daily rotation instead.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr.
pub fn init_stderr() {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter());

    tracing_subscriber::registry().with(layer).init();
}

/// Log to the rolling file, or nowhere if the log directory is unavailable.
pub fn init_file() {
    let file_layer = crate::config::logs_dir()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .map(|dir| {
            let appender = tracing_appender::rolling::daily(dir, "tartan.log");
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(env_filter())
        });

    tracing_subscriber::registry().with(file_layer).init();
}
