//! Single-instance cache service handle
//!
//! The process owns one cache at a time. `CacheService` is the explicit
//! handle to it: a mutex over the cache/stats pair so every operation,
//! including a thousands-of-iterations simulation, runs to completion
//! before any other operation can observe the shared state.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::lru::LruCache;
use crate::sim::{self, AnalysisResult, SimulationResult};
use crate::stats::CacheStats;

/// Outcome of a single `get` through the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// Whether the key was resident
    pub found: bool,
    /// The value, when found
    pub value: Option<i64>,
    /// Measured wall time of the lookup
    pub latency: Duration,
}

/// Point-in-time view of the cache and its counters
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    /// Hits since creation or last reset
    pub hits: u64,
    /// Misses since creation or last reset
    pub misses: u64,
    /// Hits plus misses
    pub total_accesses: u64,
    /// Hit ratio, percent
    pub hit_ratio: f64,
    /// Number of resident entries
    pub current_size: usize,
    /// Fixed capacity of the current cache
    pub capacity: usize,
    /// Resident entries ordered MRU-first
    pub cache_items: Vec<(i64, i64)>,
}

struct Inner {
    cache: Option<LruCache<i64, i64>>,
    stats: CacheStats,
}

impl Inner {
    fn cache_mut(&mut self) -> Result<&mut LruCache<i64, i64>> {
        self.cache.as_mut().ok_or_else(Error::no_cache)
    }

    fn cache_ref(&self) -> Result<&LruCache<i64, i64>> {
        self.cache.as_ref().ok_or_else(Error::no_cache)
    }
}

/// The process-wide cache instance, stats tracker, and the operations
/// external callers are allowed to run against them
pub struct CacheService {
    inner: Mutex<Inner>,
}

impl CacheService {
    /// Create a service with no cache; `create_cache` must be called
    /// before any get/put/stats/simulation succeeds.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                cache: None,
                stats: CacheStats::new(),
            }),
        }
    }

    /// Create a fresh cache of the given capacity, replacing any prior
    /// cache and zeroing the counters.
    ///
    /// Fails with `InvalidConfiguration` if `capacity < 1`, leaving any
    /// existing cache untouched.
    pub fn create_cache(&self, capacity: i64) -> Result<()> {
        if capacity < 1 {
            return Err(Error::invalid(
                "capacity",
                format!("must be at least 1, got {}", capacity),
            ));
        }

        let mut inner = self.inner.lock();
        inner.cache = Some(LruCache::new(capacity as usize));
        inner.stats.reset();
        Ok(())
    }

    /// Look up a key, promoting it to MRU and recording a hit or miss.
    pub fn get(&self, key: i64) -> Result<Lookup> {
        let mut inner = self.inner.lock();
        let cache = inner.cache_mut()?;

        let started = Instant::now();
        let value = cache.get(&key).copied();
        let latency = started.elapsed();

        match value {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }

        Ok(Lookup {
            found: value.is_some(),
            value,
            latency,
        })
    }

    /// Insert or update a key, promoting it to MRU.
    ///
    /// Updates never evict and never touch the hit/miss counters; a new
    /// key inserted into a full cache evicts the LRU entry first.
    pub fn put(&self, key: i64, value: i64) -> Result<Duration> {
        let mut inner = self.inner.lock();
        let cache = inner.cache_mut()?;

        let started = Instant::now();
        let evicted = cache.put(key, value);
        let latency = started.elapsed();

        if evicted.is_some() {
            inner.stats.record_eviction();
        }
        Ok(latency)
    }

    /// Resident entries ordered MRU-first; purely observational.
    pub fn snapshot(&self) -> Result<Vec<(i64, i64)>> {
        let inner = self.inner.lock();
        let cache = inner.cache_ref()?;
        Ok(cache.iter().map(|(k, v)| (*k, *v)).collect())
    }

    /// Counters plus the current cache contents, MRU-first.
    pub fn stats_report(&self) -> Result<StatsReport> {
        let inner = self.inner.lock();
        let cache = inner.cache_ref()?;

        Ok(StatsReport {
            hits: inner.stats.hits(),
            misses: inner.stats.misses(),
            total_accesses: inner.stats.total_accesses(),
            hit_ratio: inner.stats.hit_ratio(),
            current_size: cache.len(),
            capacity: cache.capacity(),
            cache_items: cache.iter().map(|(k, v)| (*k, *v)).collect(),
        })
    }

    /// Zero the counters without touching cache contents.
    pub fn reset_stats(&self) -> Result<()> {
        let inner = self.inner.lock();
        inner.cache_ref()?;
        inner.stats.reset();
        Ok(())
    }

    /// Drive a Zipfian workload through the live cache with fill-on-miss,
    /// resetting the counters first. The whole run holds the service lock.
    pub fn run_simulation(
        &self,
        num_requests: i64,
        key_range: i64,
        alpha: f64,
    ) -> Result<SimulationResult> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;
        let cache = inner.cache.as_mut().ok_or_else(Error::no_cache)?;
        sim::run_simulation(cache, &inner.stats, num_requests, key_range, alpha)
    }

    /// Sweep candidate capacities with scratch caches. The live cache and
    /// counters are not consulted, but the sweep still holds the service
    /// lock so it cannot interleave with live traffic.
    pub fn analyze_performance(
        &self,
        cache_sizes: &[i64],
        num_requests: i64,
        key_range: i64,
        alpha: f64,
    ) -> Result<AnalysisResult> {
        let _inner = self.inner.lock();
        sim::analyze_performance(cache_sizes, num_requests, key_range, alpha)
    }
}

impl Default for CacheService {
    fn default() -> Self {
        Self::new()
    }
}
