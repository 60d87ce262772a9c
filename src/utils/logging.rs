//! Tracing subscriber setup shared by the binaries
//!
//! The library itself never installs a subscriber; only `main` functions call
//! [`init_tracing`].

use tracing_subscriber::{fmt, EnvFilter};

/// Install the fmt subscriber. Filter comes from `RUST_LOG`, then
/// `LOG_LEVEL`, then defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            EnvFilter::try_new(level.to_lowercase())
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
