//! Simulation runner and capacity analyzer
//!
//! Drives synthetic Zipfian workloads through an LRU cache with a
//! fill-on-miss policy, sampling hit-ratio evolution over the run, and
//! sweeps candidate capacities to relate capacity, hit ratio, and access
//! latency.

use std::time::Instant;

use crate::error::{Error, Result};
use crate::lru::LruCache;
use crate::stats::CacheStats;
use crate::workload::ZipfGenerator;

/// Number of progress checkpoints recorded across a simulation run.
///
/// Downstream consumers chart exactly this many points, so the run is cut
/// into fixed windows rather than a sliding one.
const PROGRESS_CHECKPOINTS: u64 = 10;

/// Synthetic value stored on a miss; the content is irrelevant to
/// measurement, only residency matters.
fn fill_value(key: i64) -> i64 {
    key * 10
}

/// Outcome of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Number of get operations issued
    pub num_requests: u64,
    /// Size of the key universe
    pub key_range: u64,
    /// Zipf skew parameter of the workload
    pub alpha: f64,
    /// Wall-clock time of the whole request loop, in seconds
    pub total_time_sec: f64,
    /// Final hit count
    pub hits: u64,
    /// Final miss count
    pub misses: u64,
    /// Final hit ratio, percent
    pub hit_ratio: f64,
    /// Cumulative hit count at each progress checkpoint
    pub hits_over_time: Vec<u64>,
    /// Cumulative miss percentage at each progress checkpoint
    pub miss_ratio_over_time: Vec<f64>,
}

/// One row of a capacity sweep
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityReport {
    /// Capacity of the cache this row was measured with
    pub cache_size: usize,
    /// Hits over the replayed trace
    pub hits: u64,
    /// Misses over the replayed trace
    pub misses: u64,
    /// Hit ratio, percent
    pub hit_ratio: f64,
    /// Mean per-operation wall time, milliseconds
    pub avg_access_time_ms: f64,
}

/// Outcome of a capacity sweep, one report per candidate in input order
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Number of operations replayed per capacity
    pub num_requests: u64,
    /// Size of the key universe
    pub key_range: u64,
    /// Zipf skew parameter of the workload
    pub alpha: f64,
    /// Per-capacity measurements, in the order the capacities were given
    pub results: Vec<CapacityReport>,
}

/// Run `num_requests` get operations of a Zipfian workload against the
/// given cache, filling on miss.
///
/// Stats are reset at the start so the result reflects this run alone.
/// Validation happens before any state is touched; a failed call leaves
/// cache and stats unchanged.
pub fn run_simulation(
    cache: &mut LruCache<i64, i64>,
    stats: &CacheStats,
    num_requests: i64,
    key_range: i64,
    alpha: f64,
) -> Result<SimulationResult> {
    let n = validate_num_requests(num_requests)?;
    let mut workload = ZipfGenerator::new(key_range, alpha)?;

    stats.reset();

    // Checkpoint after request ⌈j·n/10⌉ for j = 1..=10: ten contiguous
    // windows whose last one is shorter when n is not a multiple of 10.
    // Duplicate positions (only possible for n < 10) collapse, so a run of
    // at least 10 requests always yields exactly 10 data points.
    let mut boundaries = (1..=PROGRESS_CHECKPOINTS).map(|j| (j * n).div_ceil(PROGRESS_CHECKPOINTS));
    let mut next_boundary = boundaries.next();
    let mut hits_over_time = Vec::with_capacity(PROGRESS_CHECKPOINTS as usize);
    let mut miss_ratio_over_time = Vec::with_capacity(PROGRESS_CHECKPOINTS as usize);

    let started = Instant::now();
    for i in 0..n {
        let key = workload.next_key();
        match cache.get(&key) {
            Some(_) => stats.record_hit(),
            None => {
                stats.record_miss();
                if cache.put(key, fill_value(key)).is_some() {
                    stats.record_eviction();
                }
            }
        }

        if next_boundary == Some(i + 1) {
            hits_over_time.push(stats.hits());
            miss_ratio_over_time.push(stats.miss_ratio());
            while next_boundary == Some(i + 1) {
                next_boundary = boundaries.next();
            }
        }
    }
    let total_time_sec = started.elapsed().as_secs_f64();

    Ok(SimulationResult {
        num_requests: n,
        key_range: workload.key_range() as u64,
        alpha,
        total_time_sec,
        hits: stats.hits(),
        misses: stats.misses(),
        hit_ratio: stats.hit_ratio(),
        hits_over_time,
        miss_ratio_over_time,
    })
}

/// Measure hit ratio and mean access latency for each candidate capacity.
///
/// One key trace is drawn up front and replayed against every capacity so
/// the comparison is over an identical workload; each capacity gets a
/// fresh, empty cache and fresh counters.
pub fn analyze_performance(
    cache_sizes: &[i64],
    num_requests: i64,
    key_range: i64,
    alpha: f64,
) -> Result<AnalysisResult> {
    let n = validate_num_requests(num_requests)?;
    if cache_sizes.is_empty() {
        return Err(Error::invalid("cache_sizes", "must not be empty"));
    }
    for &size in cache_sizes {
        if size < 1 {
            return Err(Error::invalid(
                "cache_sizes",
                format!("every capacity must be at least 1, got {}", size),
            ));
        }
    }

    let mut workload = ZipfGenerator::new(key_range, alpha)?;
    let trace = workload.trace(n as usize);

    let mut results = Vec::with_capacity(cache_sizes.len());
    for &size in cache_sizes {
        results.push(replay_trace(&trace, size as usize, n));
    }

    Ok(AnalysisResult {
        num_requests: n,
        key_range: workload.key_range() as u64,
        alpha,
        results,
    })
}

fn replay_trace(trace: &[i64], capacity: usize, num_requests: u64) -> CapacityReport {
    let mut cache = LruCache::new(capacity);
    let stats = CacheStats::new();

    let started = Instant::now();
    for &key in trace {
        match cache.get(&key) {
            Some(_) => stats.record_hit(),
            None => {
                stats.record_miss();
                if cache.put(key, fill_value(key)).is_some() {
                    stats.record_eviction();
                }
            }
        }
    }
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    CapacityReport {
        cache_size: capacity,
        hits: stats.hits(),
        misses: stats.misses(),
        hit_ratio: stats.hit_ratio(),
        avg_access_time_ms: elapsed_ms / num_requests as f64,
    }
}

fn validate_num_requests(num_requests: i64) -> Result<u64> {
    if num_requests < 1 {
        return Err(Error::invalid(
            "num_requests",
            format!("must be at least 1, got {}", num_requests),
        ));
    }
    Ok(num_requests as u64)
}
