//! Wire types for the line-delimited JSON protocol
//!
//! One request object per line, one response object per line. The core
//! crate stays serde-free; its result structs are mirrored here.

use cachelab::{AnalysisResult, SimulationResult, StatsReport};
use serde::{Deserialize, Serialize};

// Defaults applied to omitted request fields.

fn default_capacity() -> i64 {
    100
}
fn default_num_requests() -> i64 {
    1000
}
fn default_key_range() -> i64 {
    200
}
fn default_alpha() -> f64 {
    1.0
}
fn default_cache_sizes() -> Vec<i64> {
    vec![10, 50, 100, 200, 500]
}

/// A client command, dispatched on the `op` field
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    CreateCache {
        #[serde(default = "default_capacity")]
        capacity: i64,
    },
    Get {
        key: i64,
    },
    Put {
        key: i64,
        value: i64,
    },
    Stats,
    ResetStats,
    RunSimulation {
        #[serde(default = "default_num_requests")]
        num_requests: i64,
        #[serde(default = "default_key_range")]
        key_range: i64,
        #[serde(default = "default_alpha")]
        alpha: f64,
    },
    AnalyzePerformance {
        #[serde(default = "default_cache_sizes")]
        cache_sizes: Vec<i64>,
        #[serde(default = "default_num_requests")]
        num_requests: i64,
        #[serde(default = "default_key_range")]
        key_range: i64,
        #[serde(default = "default_alpha")]
        alpha: f64,
    },
}

/// One resident entry in a stats response
#[derive(Debug, Clone, Serialize)]
pub struct CacheItem {
    pub key: i64,
    pub value: i64,
}

/// Server reply; the shape depends on the command
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Message {
        message: String,
    },
    Lookup {
        key: i64,
        found: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<i64>,
        latency_ms: f64,
    },
    PutAck {
        message: String,
        latency_ms: f64,
    },
    Stats {
        hits: u64,
        misses: u64,
        total_accesses: u64,
        hit_ratio: f64,
        capacity: usize,
        current_size: usize,
        cache_items: Vec<CacheItem>,
    },
    Simulation {
        num_requests: u64,
        key_range: u64,
        alpha: f64,
        total_time_sec: f64,
        hits: u64,
        misses: u64,
        hit_ratio: f64,
        hits_over_time: Vec<u64>,
        miss_ratio_over_time: Vec<f64>,
    },
    Analysis {
        num_requests: u64,
        key_range: u64,
        alpha: f64,
        results: Vec<CapacityRow>,
    },
    Error {
        error: String,
    },
}

/// One row of an analyze-performance response
#[derive(Debug, Clone, Serialize)]
pub struct CapacityRow {
    pub cache_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_ratio: f64,
    pub avg_access_time_ms: f64,
}

impl Response {
    pub fn error(err: impl ToString) -> Self {
        Response::Error {
            error: err.to_string(),
        }
    }
}

impl From<StatsReport> for Response {
    fn from(report: StatsReport) -> Self {
        Response::Stats {
            hits: report.hits,
            misses: report.misses,
            total_accesses: report.total_accesses,
            hit_ratio: report.hit_ratio,
            capacity: report.capacity,
            current_size: report.current_size,
            cache_items: report
                .cache_items
                .into_iter()
                .map(|(key, value)| CacheItem { key, value })
                .collect(),
        }
    }
}

impl From<SimulationResult> for Response {
    fn from(result: SimulationResult) -> Self {
        Response::Simulation {
            num_requests: result.num_requests,
            key_range: result.key_range,
            alpha: result.alpha,
            total_time_sec: result.total_time_sec,
            hits: result.hits,
            misses: result.misses,
            hit_ratio: result.hit_ratio,
            hits_over_time: result.hits_over_time,
            miss_ratio_over_time: result.miss_ratio_over_time,
        }
    }
}

impl From<AnalysisResult> for Response {
    fn from(result: AnalysisResult) -> Self {
        Response::Analysis {
            num_requests: result.num_requests,
            key_range: result.key_range,
            alpha: result.alpha,
            results: result
                .results
                .into_iter()
                .map(|row| CapacityRow {
                    cache_size: row.cache_size,
                    hits: row.hits,
                    misses: row.misses,
                    hit_ratio: row.hit_ratio,
                    avg_access_time_ms: row.avg_access_time_ms,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_with_defaults() {
        let req: Request = serde_json::from_str(r#"{"op": "run_simulation"}"#).unwrap();
        match req {
            Request::RunSimulation {
                num_requests,
                key_range,
                alpha,
            } => {
                assert_eq!(num_requests, 1000);
                assert_eq!(key_range, 200);
                assert_eq!(alpha, 1.0);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_request_parses_explicit_fields() {
        let req: Request = serde_json::from_str(
            r#"{"op": "analyze_performance", "cache_sizes": [1, 1000], "num_requests": 500, "key_range": 1000, "alpha": 1.5}"#,
        )
        .unwrap();
        match req {
            Request::AnalyzePerformance { cache_sizes, .. } => {
                assert_eq!(cache_sizes, vec![1, 1000]);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_request_rejects_unknown_op() {
        assert!(serde_json::from_str::<Request>(r#"{"op": "drop_table"}"#).is_err());
    }

    #[test]
    fn test_lookup_omits_value_on_miss() {
        let miss = Response::Lookup {
            key: 7,
            found: false,
            value: None,
            latency_ms: 0.01,
        };
        let json = serde_json::to_string(&miss).unwrap();
        assert!(!json.contains("\"value\""));
        assert!(json.contains("\"found\":false"));
    }

    #[test]
    fn test_stats_field_names() {
        let resp = Response::Stats {
            hits: 3,
            misses: 1,
            total_accesses: 4,
            hit_ratio: 75.0,
            capacity: 10,
            current_size: 2,
            cache_items: vec![CacheItem { key: 1, value: 10 }],
        };
        let json = serde_json::to_string(&resp).unwrap();
        for field in [
            "\"hits\"",
            "\"misses\"",
            "\"hit_ratio\"",
            "\"capacity\"",
            "\"current_size\"",
            "\"cache_items\"",
        ] {
            assert!(json.contains(field), "missing {} in {}", field, json);
        }
    }
}
