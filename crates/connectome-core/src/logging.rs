//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events; binaries, benches and tests call
//! [`init_tracing`] once to see them. Output goes to stderr so that stdout
//! stays free for record and artifact streams.

use std::io;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Install a global fmt subscriber for the given configuration.
///
/// `RUST_LOG` overrides `config.level` when set. Returns `false` when a global
/// subscriber was already installed (the call is then a no-op).
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init().is_ok(),
        "compact" => builder.compact().try_init().is_ok(),
        _ => builder.pretty().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(level = %config.level, format = %config.format, "Tracing initialized");
    }
    installed
}
