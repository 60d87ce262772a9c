//! Sei Pointer API Server
//!
//! REST API classifying addresses as pointers or base assets
//!
//! Usage:
//!   cargo run --bin pointer_api
//!
//! Environment:
//!   SEIREST   - Chain REST endpoint (default: https://rest.sei-apis.com)
//!   API_KEY   - Outbound key for the chain REST endpoint
//!   HOST/PORT - Listen address (default: 0.0.0.0:3003)
//!   RUST_LOG  - Log filter (falls back to LOG_LEVEL, then info)

use sei_pointer_api::api::{create_router, start_cleanup_task, AppState};
use sei_pointer_api::utils::constants::{APP_NAME, APP_VERSION};
use sei_pointer_api::utils::logging::init_tracing;
use sei_pointer_api::ServiceConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServiceConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config)?);

    // Background cleanup for cache and rate limiter
    let cleanup = start_cleanup_task(state.clone());
    info!("🧹 Background cleanup task started");

    let app = create_router(state.clone());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🚀 {} v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("   Chain REST: {}", config.rest_url);
    info!(
        "   Lookup strategy: {}, timeout: {}ms",
        config.lookup_strategy.as_str(),
        config.lookup_timeout.as_millis()
    );
    info!(
        "   Cache: {} entries, TTL {}s",
        config.cache_max_entries,
        config.cache_ttl.as_secs()
    );
    info!("");
    info!("Endpoints:");
    info!("  GET  /{{address}}          - Classify one address");
    info!("  POST /                    - Classify {{address}} or {{addresses: [...]}}");
    info!("  POST /check-address       - Same as POST /");
    info!("  GET  /stats               - Cache and lookup statistics");
    info!("  GET  /health              - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    cleanup.abort();

    info!("🛑 Shutdown signal received");
    let cache = state.coordinator.cache().stats();
    let lookups = state.coordinator.resolver().stats();
    info!(
        "   Cache: {} entries, {} hits, {} misses ({:.1}% hit rate)",
        cache.entries, cache.hits, cache.misses, cache.hit_rate
    );
    info!(
        "   Lookups: {} issued, {} unavailable, {} rate limited",
        lookups.issued, lookups.unavailable, lookups.rate_limited
    );
    info!("👋 {} shutdown complete", APP_NAME);

    Ok(())
}
