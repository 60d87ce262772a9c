//! Pointer Lookup CLI
//!
//! Classifies the addresses given on the command line against the
//! configured chain REST endpoint and prints each result as JSON. With no
//! arguments, a few sample addresses are classified instead.
//!
//! Usage:
//!   cargo run --bin pointer_lookup -- 0x809FF4801aA5bDb33045d1fEC810D082490D63a4

use eyre::Result;
use sei_pointer_api::utils::constants::SAMPLE_ADDRESSES;
use sei_pointer_api::utils::logging::init_tracing;
use sei_pointer_api::{BatchCoordinator, ChainRestClient, ServiceConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServiceConfig::from_env()?;
    let client = ChainRestClient::new(&config)?;
    info!("🔗 Chain REST: {}", client.base_url());

    let coordinator = BatchCoordinator::from_config(&config, Arc::new(client));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let addresses = if args.is_empty() {
        info!("No addresses given, classifying samples");
        SAMPLE_ADDRESSES.iter().map(|a| a.to_string()).collect()
    } else {
        args
    };

    for report in coordinator.resolve_many(addresses).await {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
