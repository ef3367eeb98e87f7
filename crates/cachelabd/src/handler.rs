//! Command handler mapping wire requests onto the cache service

use std::sync::Arc;

use cachelab::CacheService;

use crate::wire::{Request, Response};

pub struct CommandHandler {
    service: Arc<CacheService>,
}

impl CommandHandler {
    pub fn new(service: Arc<CacheService>) -> Self {
        Self { service }
    }

    pub fn handle(&self, req: Request) -> Response {
        match req {
            Request::CreateCache { capacity } => self.handle_create(capacity),
            Request::Get { key } => self.handle_get(key),
            Request::Put { key, value } => self.handle_put(key, value),
            Request::Stats => self.handle_stats(),
            Request::ResetStats => self.handle_reset_stats(),
            Request::RunSimulation {
                num_requests,
                key_range,
                alpha,
            } => self.handle_simulation(num_requests, key_range, alpha),
            Request::AnalyzePerformance {
                cache_sizes,
                num_requests,
                key_range,
                alpha,
            } => self.handle_analysis(&cache_sizes, num_requests, key_range, alpha),
        }
    }

    fn handle_create(&self, capacity: i64) -> Response {
        match self.service.create_cache(capacity) {
            Ok(()) => Response::Message {
                message: format!("Cache created with capacity {}", capacity),
            },
            Err(e) => Response::error(e),
        }
    }

    fn handle_get(&self, key: i64) -> Response {
        match self.service.get(key) {
            Ok(lookup) => Response::Lookup {
                key,
                found: lookup.found,
                value: lookup.value,
                latency_ms: lookup.latency.as_secs_f64() * 1000.0,
            },
            Err(e) => Response::error(e),
        }
    }

    fn handle_put(&self, key: i64, value: i64) -> Response {
        match self.service.put(key, value) {
            Ok(latency) => Response::PutAck {
                message: format!("Added key {} with value {}", key, value),
                latency_ms: latency.as_secs_f64() * 1000.0,
            },
            Err(e) => Response::error(e),
        }
    }

    fn handle_stats(&self) -> Response {
        match self.service.stats_report() {
            Ok(report) => report.into(),
            Err(e) => Response::error(e),
        }
    }

    fn handle_reset_stats(&self) -> Response {
        match self.service.reset_stats() {
            Ok(()) => Response::Message {
                message: "Statistics reset".to_string(),
            },
            Err(e) => Response::error(e),
        }
    }

    fn handle_simulation(&self, num_requests: i64, key_range: i64, alpha: f64) -> Response {
        match self.service.run_simulation(num_requests, key_range, alpha) {
            Ok(result) => result.into(),
            Err(e) => Response::error(e),
        }
    }

    fn handle_analysis(
        &self,
        cache_sizes: &[i64],
        num_requests: i64,
        key_range: i64,
        alpha: f64,
    ) -> Response {
        match self
            .service
            .analyze_performance(cache_sizes, num_requests, key_range, alpha)
        {
            Ok(result) => result.into(),
            Err(e) => Response::error(e),
        }
    }
}
