//! Hit/miss statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for cache access outcomes
///
/// `get` records exactly one hit or miss per lookup; `put` never does.
/// Evictions are tracked as a supplementary metric.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CacheStats {
    /// Create a zeroed stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an eviction
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Total hits since creation or last reset
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Total misses since creation or last reset
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Total evictions since creation or last reset
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Total completed lookups
    pub fn total_accesses(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// Hit ratio as a percentage (0.0 to 100.0)
    ///
    /// Defined as 0.0 before any lookup has completed, never NaN.
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64 * 100.0
        }
    }

    /// Miss ratio as a percentage (0.0 to 100.0), 0.0 before any lookup
    pub fn miss_ratio(&self) -> f64 {
        let misses = self.misses();
        let total = self.hits() + misses;
        if total == 0 {
            0.0
        } else {
            misses as f64 / total as f64 * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}
