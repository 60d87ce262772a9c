//! Batch Coordinator
//!
//! validate → cache → resolve → cache store, for one address or many.
//!
//! Every address runs in its own task behind a shared semaphore, so a panic
//! while resolving one address becomes an `ADDR_INTERNAL` entry at that
//! position instead of taking down the batch. Output order always matches
//! input order.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::resolver::Resolver;
use crate::models::{
    AddressFailure, AddressReport, AppError, AppResult, BatchLimits, CallerTier, ServiceConfig,
};
use crate::providers::PointerLookup;
use crate::utils::cache::ResolutionCache;
use crate::utils::validator::validate;

#[derive(Clone)]
pub struct BatchCoordinator {
    resolver: Arc<Resolver>,
    cache: ResolutionCache,
    limits: BatchLimits,
    concurrency: usize,
}

/// A batch entry that is either settled up front or still resolving
enum Slot {
    Ready(AddressReport),
    Pending(String, JoinHandle<AddressReport>),
}

impl BatchCoordinator {
    pub fn new(
        resolver: Arc<Resolver>,
        cache: ResolutionCache,
        limits: BatchLimits,
        concurrency: usize,
    ) -> Self {
        Self {
            resolver,
            cache,
            limits,
            concurrency: concurrency.max(1),
        }
    }

    /// Wire resolver and cache from configuration
    pub fn from_config(config: &ServiceConfig, lookup: Arc<dyn PointerLookup>) -> Self {
        Self::new(
            Arc::new(Resolver::new(lookup, config.lookup_strategy)),
            ResolutionCache::with_limits(config.cache_max_entries, config.cache_ttl),
            config.batch_limits,
            config.batch_concurrency,
        )
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// Classify one address in an isolated task
    pub async fn resolve_one(&self, address: &str) -> AddressReport {
        if !validate(address) {
            return invalid(address);
        }
        let this = self.clone();
        let owned = address.to_string();
        let handle = tokio::spawn(async move { this.resolve_inline(&owned).await });
        settle(address, handle).await
    }

    /// Classify a list of addresses, one report per input in input order.
    /// Invalid addresses are answered without any lookup.
    pub async fn resolve_many(&self, addresses: Vec<String>) -> Vec<AddressReport> {
        let start = Instant::now();
        let total = addresses.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let slots: Vec<Slot> = addresses
            .into_iter()
            .map(|address| {
                if !validate(&address) {
                    return Slot::Ready(invalid(&address));
                }
                let this = self.clone();
                let permits = semaphore.clone();
                let owned = address.clone();
                let handle = tokio::spawn(async move {
                    let _permit = match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            return AddressReport::Failed(AddressFailure::new(
                                &owned,
                                &AppError::internal(&owned, e),
                            ))
                        }
                    };
                    this.resolve_inline(&owned).await
                });
                Slot::Pending(address, handle)
            })
            .collect();

        let mut reports = Vec::with_capacity(total);
        for slot in slots {
            reports.push(match slot {
                Slot::Ready(report) => report,
                Slot::Pending(address, handle) => settle(&address, handle).await,
            });
        }

        let failed = reports.iter().filter(|r| r.failure().is_some()).count();
        info!(
            total = total,
            failed = failed,
            latency_ms = start.elapsed().as_millis() as u64,
            "📦 Batch resolved"
        );
        reports
    }

    /// Size-check a batch against the caller's tier, then resolve it
    pub async fn resolve_batch(
        &self,
        addresses: Vec<String>,
        tier: CallerTier,
    ) -> AppResult<Vec<AddressReport>> {
        if addresses.is_empty() {
            return Err(AppError::empty_batch());
        }
        let max = self.limits.for_tier(tier);
        if addresses.len() > max {
            return Err(AppError::batch_too_large(addresses.len(), max));
        }
        Ok(self.resolve_many(addresses).await)
    }

    async fn resolve_inline(&self, address: &str) -> AddressReport {
        if let Some(mut cached) = self.cache.get(address) {
            cached.address = address.to_string();
            return AddressReport::Classified(cached);
        }

        let report = self.resolver.classify(address).await;
        if let AddressReport::Classified(classification) = &report {
            self.cache.set(address, classification.clone());
        }
        report
    }
}

fn invalid(address: &str) -> AddressReport {
    AddressReport::Failed(AddressFailure::new(
        address,
        &AppError::invalid_address(address),
    ))
}

async fn settle(address: &str, handle: JoinHandle<AddressReport>) -> AddressReport {
    match handle.await {
        Ok(report) => report,
        Err(e) => {
            error!(address = %address, error = %e, "❌ Resolution task failed");
            AddressReport::Failed(AddressFailure::new(
                address,
                &AppError::internal(address, "resolution task aborted"),
            ))
        }
    }
}
