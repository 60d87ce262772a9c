//! Resolution Engine
//!
//! Runs an address's [`ResolutionPlan`] against a [`PointerLookup`] and
//! picks the first positive result in priority order.
//!
//! Two strategies, same answer for the same remote state:
//! - Parallel: every candidate lookup in flight at once (`join_all`)
//! - Sequential: one at a time, stop at the first positive
//!
//! A lookup that is `Unavailable` counts as "no match". Only when *every*
//! lookup in the plan is unavailable does the address fail.

use futures_util::future::join_all;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::classifier::{Candidate, ResolutionPlan};
use crate::models::{
    AddressFailure, AddressReport, AppError, AppResult, Classification, LookupStrategy,
};
use crate::providers::{LookupFailure, LookupOutcome, PointerLookup};

// ============================================
// Lookup Counters
// ============================================

/// Counters over every lookup issued by a resolver
#[derive(Debug, Default)]
pub struct LookupStats {
    issued: AtomicU64,
    found: AtomicU64,
    absent: AtomicU64,
    unavailable: AtomicU64,
    rate_limited: AtomicU64,
}

impl LookupStats {
    fn record(&self, outcome: &LookupOutcome) {
        self.issued.fetch_add(1, Ordering::Relaxed);
        let bucket = match outcome {
            LookupOutcome::Found(_) => &self.found,
            LookupOutcome::Absent => &self.absent,
            LookupOutcome::Unavailable(failure) => {
                if *failure == LookupFailure::RateLimited {
                    self.rate_limited.fetch_add(1, Ordering::Relaxed);
                }
                &self.unavailable
            }
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LookupStatsSnapshot {
        LookupStatsSnapshot {
            issued: self.issued.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            absent: self.absent.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LookupStatsSnapshot {
    pub issued: u64,
    pub found: u64,
    pub absent: u64,
    pub unavailable: u64,
    pub rate_limited: u64,
}

// ============================================
// Resolver
// ============================================

pub struct Resolver {
    lookup: Arc<dyn PointerLookup>,
    strategy: LookupStrategy,
    stats: LookupStats,
}

impl Resolver {
    pub fn new(lookup: Arc<dyn PointerLookup>, strategy: LookupStrategy) -> Self {
        Self {
            lookup,
            strategy,
            stats: LookupStats::default(),
        }
    }

    pub fn strategy(&self) -> LookupStrategy {
        self.strategy
    }

    pub fn stats(&self) -> LookupStatsSnapshot {
        self.stats.snapshot()
    }

    /// Classify one address. Failures come back as an error report,
    /// never as a panic or `Err`.
    pub async fn classify(&self, address: &str) -> AddressReport {
        match self.resolve(address).await {
            Ok(classification) => AddressReport::Classified(classification),
            Err(e) => {
                warn!(address = %address, code = e.code_str(), "⚠️ {}", e.message);
                AddressReport::Failed(AddressFailure::new(address, &e))
            }
        }
    }

    /// Classify one address, surfacing per-address failures as `Err`
    pub async fn resolve(&self, address: &str) -> AppResult<Classification> {
        let plan =
            ResolutionPlan::for_address(address).ok_or_else(|| AppError::invalid_address(address))?;
        let start = Instant::now();

        let outcomes = match self.strategy {
            LookupStrategy::Parallel => self.run_parallel(plan, address).await,
            LookupStrategy::Sequential => self.run_sequential(plan, address).await,
        };

        let hit = outcomes.iter().find_map(|(candidate, outcome)| match outcome {
            LookupOutcome::Found(record) => Some((*candidate, record)),
            _ => None,
        });

        if hit.is_none()
            && !outcomes.is_empty()
            && outcomes
                .iter()
                .all(|(_, outcome)| matches!(outcome, LookupOutcome::Unavailable(_)))
        {
            return Err(AppError::remote_unavailable(address));
        }

        let classification = plan.interpret(address, hit)?;
        debug!(
            address = %address,
            plan = plan.as_str(),
            lookups = outcomes.len(),
            pointer_type = %classification.pointer_type,
            is_pointer = classification.is_pointer(),
            latency_ms = start.elapsed().as_millis() as u64,
            "🔍 Address resolved"
        );
        Ok(classification)
    }

    async fn run_parallel(
        &self,
        plan: ResolutionPlan,
        address: &str,
    ) -> Vec<(Candidate, LookupOutcome)> {
        let candidates = plan.candidates();
        let outcomes = join_all(candidates.iter().map(|c| self.issue(*c, address))).await;
        candidates.iter().copied().zip(outcomes).collect()
    }

    async fn run_sequential(
        &self,
        plan: ResolutionPlan,
        address: &str,
    ) -> Vec<(Candidate, LookupOutcome)> {
        let mut outcomes = Vec::with_capacity(plan.candidates().len());
        for candidate in plan.candidates() {
            let outcome = self.issue(*candidate, address).await;
            let stop = matches!(outcome, LookupOutcome::Found(_));
            outcomes.push((*candidate, outcome));
            if stop {
                break;
            }
        }
        outcomes
    }

    async fn issue(&self, candidate: Candidate, address: &str) -> LookupOutcome {
        let outcome = self.lookup.lookup(candidate.query(address)).await;
        self.stats.record(&outcome);
        outcome
    }
}
