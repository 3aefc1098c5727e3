//! Tracing setup shared by every clubdesk binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at the default `info` level
///
/// `RUST_LOG` overrides the level as usual; output is the compact fmt
/// layer, colored when the terminal supports it.
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific fallback level (debug, info, warn, error)
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Route debug-level events through the test writer
///
/// Safe to call from every test; re-initialization attempts are ignored.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
