//! # cachelab
//!
//! Core engine for an interactive LRU cache laboratory.
//!
//! ## Architecture
//! - **LRU engine**: slot arena + intrusive recency list, O(1) get/put/evict
//! - **Stats**: atomic hit/miss/eviction counters, percentage ratios
//! - **Workload**: memoized-CDF Zipfian key generator, seedable
//! - **Sim**: fill-on-miss simulation runner and capacity analyzer
//! - **Service**: the single process-wide cache handle; every operation
//!   runs serialized against the shared cache/stats pair

#![warn(missing_docs)]

mod error;
mod lru;
mod service;
mod sim;
mod stats;
mod workload;

pub use error::{Error, Result};
pub use lru::LruCache;
pub use service::{CacheService, Lookup, StatsReport};
pub use sim::{AnalysisResult, CapacityReport, SimulationResult};
pub use stats::CacheStats;
pub use workload::ZipfGenerator;
