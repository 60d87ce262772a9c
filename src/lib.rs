//! Sei Pointer API Library
//!
//! Classifies Sei addresses across the EVM, CosmWasm and native bank
//! families:
//! - Is the address a pointer, or the base asset itself?
//! - Which token standard links the two sides?
//! - What is the address on the other side of the relationship?
//!
//! Answers come from the chain's pointer registry (REST), memoized in a
//! bounded sliding-TTL cache.

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod utils;

pub use crate::core::{BatchCoordinator, LookupStatsSnapshot, ResolutionPlan, Resolver};
pub use models::{
    AddressFamily, AddressReport, AppError, AppResult, AssetType, CallerTier, Classification,
    ErrorCode, LookupStrategy, PointerType, ServiceConfig,
};
pub use providers::{ChainRestClient, LookupOutcome, PointerLookup};
pub use utils::cache::{CacheStats, ResolutionCache};
