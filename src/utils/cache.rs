//! High-Performance In-Memory Cache Module
//!
//! Thread-safe memoization of successful classifications.
//! Uses DashMap for concurrent access without a global lock.
//!
//! Features:
//! - Sliding TTL (5 minutes default): every hit restarts the countdown
//! - Bounded size (500 entries default), least-recently-used entry evicted
//! - Key normalization (lowercase for EVM/CosmWasm, verbatim for denoms)
//! - Cache HIT/MISS logging and counters

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::models::{AddressFamily, Classification};
use crate::utils::constants::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECS};

/// Cache entry with last-access timestamp for sliding TTL and LRU order
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub classification: Classification,
    pub last_access: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_access.elapsed() > ttl
    }
}

/// Bounded classification cache keyed by normalized address
#[derive(Clone)]
pub struct ResolutionCache {
    store: Arc<DashMap<String, CacheEntry>>,
    max_entries: usize,
    ttl: Duration,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
    /// Serializes inserts so the capacity check and the insert are atomic
    write_lock: Arc<Mutex<()>>,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionCache {
    /// Cache with default capacity (500) and TTL (5 minutes)
    pub fn new() -> Self {
        Self::with_limits(
            DEFAULT_CACHE_MAX_ENTRIES,
            Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        )
    }

    pub fn with_limits(max_entries: usize, ttl: Duration) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            max_entries: max_entries.max(1),
            ttl,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Normalize an address into its cache key
    pub fn cache_key(address: &str) -> String {
        if AddressFamily::detect(address).is_case_insensitive() {
            address.to_lowercase()
        } else {
            address.to_string()
        }
    }

    /// Returns the cached classification if present and not expired.
    /// A hit refreshes the entry's TTL and LRU position.
    pub fn get(&self, address: &str) -> Option<Classification> {
        let key = Self::cache_key(address);

        let Some(mut entry) = self.store.get_mut(&key) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("📭 CACHE MISS: {}", key);
            return None;
        };

        if entry.is_expired(self.ttl) {
            drop(entry);
            // a concurrent set may have refreshed the key meanwhile
            self.store
                .remove_if(&key, |_, entry| entry.is_expired(self.ttl));
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("📭 CACHE MISS (expired): {}", key);
            return None;
        }

        entry.last_access = Instant::now();
        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!("✅ CACHE HIT: {}", key);
        Some(entry.classification.clone())
    }

    /// Store a successful classification, evicting the least recently used
    /// entry when at capacity. Failures are never cached: the type only
    /// admits a `Classification`.
    pub fn set(&self, address: &str, classification: Classification) {
        let key = Self::cache_key(address);
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if !self.store.contains_key(&key) {
            self.make_room();
        }

        self.store.insert(
            key.clone(),
            CacheEntry {
                classification,
                last_access: Instant::now(),
            },
        );
        debug!("💾 CACHE SET: {} (TTL: {}s)", key, self.ttl.as_secs());
    }

    fn make_room(&self) {
        if self.store.len() < self.max_entries {
            return;
        }
        self.cleanup_expired();

        while self.store.len() >= self.max_entries {
            let oldest = self
                .store
                .iter()
                .min_by_key(|entry| entry.value().last_access)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.store.remove(&key);
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                    debug!("🗑️ CACHE EVICT (lru): {}", key);
                }
                None => break,
            }
        }
    }

    /// Remove one entry
    pub fn invalidate(&self, address: &str) {
        let key = Self::cache_key(address);
        self.store.remove(&key);
        debug!("🗑️ CACHE INVALIDATE: {}", key);
    }

    /// Drop every expired entry, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.store.len();
        let ttl = self.ttl;
        self.store.retain(|_, entry| !entry.is_expired(ttl));
        let removed = before.saturating_sub(self.store.len());
        if removed > 0 {
            info!("🧹 CACHE CLEANUP: {} expired entries removed", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            max_entries: self.max_entries,
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate,
            ttl_secs: self.ttl.as_secs(),
        }
    }

    pub fn clear(&self) {
        self.store.clear();
        info!("🗑️ CACHE CLEARED");
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetType, PointerType};
    use std::sync::Barrier;
    use std::thread::{self, sleep};

    fn classification(address: &str) -> Classification {
        Classification::base(address, AssetType::Standard(PointerType::Erc20), None)
    }

    fn evm(n: u8) -> String {
        format!("0x{:040x}", n)
    }

    #[test]
    fn test_cache_set_get() {
        let cache = ResolutionCache::new();
        let address = "0x809FF4801aA5bDb33045d1fEC810D082490D63a4";

        cache.set(address, classification(address));

        assert_eq!(cache.get(address), Some(classification(address)));
    }

    #[test]
    fn test_address_normalization() {
        let cache = ResolutionCache::new();
        let upper = "0x809FF4801AA5BDB33045D1FEC810D082490D63A4";

        cache.set(upper, classification(upper));

        assert!(cache.get("0x809ff4801aa5bdb33045d1fec810d082490d63a4").is_some());
    }

    #[test]
    fn test_denoms_keep_their_case() {
        assert_eq!(
            ResolutionCache::cache_key("factory/sei1e3gttzq5e5k49f9f5gzvrl0rltlav65xu6p9xc0aj7e84lantdjqp7cncc/uTOKEN"),
            "factory/sei1e3gttzq5e5k49f9f5gzvrl0rltlav65xu6p9xc0aj7e84lantdjqp7cncc/uTOKEN"
        );
    }

    #[test]
    fn test_cache_miss() {
        let cache = ResolutionCache::new();
        assert!(cache.get(&evm(1)).is_none());
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = ResolutionCache::with_limits(10, Duration::from_millis(40));
        cache.set(&evm(1), classification(&evm(1)));

        sleep(Duration::from_millis(80));

        assert!(cache.get(&evm(1)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_access_slides_ttl() {
        let cache = ResolutionCache::with_limits(10, Duration::from_millis(150));
        cache.set(&evm(1), classification(&evm(1)));

        for _ in 0..4 {
            sleep(Duration::from_millis(60));
            assert!(cache.get(&evm(1)).is_some());
        }
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let cache = ResolutionCache::with_limits(2, Duration::from_secs(60));
        cache.set(&evm(1), classification(&evm(1)));
        sleep(Duration::from_millis(5));
        cache.set(&evm(2), classification(&evm(2)));
        sleep(Duration::from_millis(5));

        // touching 1 makes 2 the least recently used
        assert!(cache.get(&evm(1)).is_some());
        sleep(Duration::from_millis(5));
        cache.set(&evm(3), classification(&evm(3)));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&evm(1)).is_some());
        assert!(cache.get(&evm(2)).is_none());
        assert!(cache.get(&evm(3)).is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = ResolutionCache::with_limits(1, Duration::from_secs(60));
        cache.set(&evm(1), classification(&evm(1)));
        cache.set(&evm(1), classification(&evm(1)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_cache_stats() {
        let cache = ResolutionCache::new();
        cache.set(&evm(1), classification(&evm(1)));
        cache.get(&evm(1));
        cache.get(&evm(2));

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.max_entries, 500);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = ResolutionCache::new();
        cache.set(&evm(1), classification(&evm(1)));
        cache.set(&evm(2), classification(&evm(2)));

        cache.invalidate(&evm(1));
        assert!(cache.get(&evm(1)).is_none());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_holds_under_concurrent_writers() {
        let cache = ResolutionCache::with_limits(4, Duration::from_secs(60));
        let writers = 16;

        for round in 0..50u32 {
            let barrier = Arc::new(Barrier::new(writers));
            let handles: Vec<_> = (0..writers)
                .map(|i| {
                    let cache = cache.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        let address = format!("0x{:040x}", round * 100 + i as u32);
                        barrier.wait();
                        cache.set(&address, classification(&address));
                        cache.len()
                    })
                })
                .collect();

            for handle in handles {
                assert!(handle.join().unwrap() <= 4);
            }
            assert!(cache.len() <= 4);
        }
    }
}
