//! Call statistics
//!
//! Every service call is recorded once, with the tier that served it and the
//! wall-clock time it took. Counters are kept globally and per service name.

use std::collections::BTreeMap;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

/// Where a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    /// Fetched over the network
    Miss,
    /// Read from a cache file
    Disk,
    /// Read from the in-memory map
    Memory,
}

impl CacheTier {
    pub fn is_hit(self) -> bool {
        !matches!(self, Self::Miss)
    }
}

/// Counters for one scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatCounter {
    /// Calls recorded, hits included
    pub requests: u64,
    /// Calls served from either cache tier
    pub cached: u64,
    /// Calls served from memory
    pub mem_cached: u64,
    /// `request_time + cache_time`
    pub total_time: Duration,
    /// Time spent on network calls
    pub request_time: Duration,
    /// Time spent reading the cache
    pub cache_time: Duration,
}

impl StatCounter {
    fn record(&mut self, tier: CacheTier, elapsed: Duration) {
        self.requests += 1;
        match tier {
            CacheTier::Miss => self.request_time += elapsed,
            CacheTier::Disk => {
                self.cached += 1;
                self.cache_time += elapsed;
            }
            CacheTier::Memory => {
                self.cached += 1;
                self.mem_cached += 1;
                self.cache_time += elapsed;
            }
        }
        self.total_time += elapsed;
    }

    /// Calls that went to the network
    pub fn misses(&self) -> u64 {
        self.requests - self.cached
    }

    /// Fraction of calls served from cache, 0.0 when nothing was recorded
    pub fn hit_ratio(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        self.cached as f64 / self.requests as f64
    }
}

/// Point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub global: StatCounter,
    pub services: BTreeMap<String, StatCounter>,
}

impl StatsSnapshot {
    pub fn service(&self, name: &str) -> Option<&StatCounter> {
        self.services.get(name)
    }
}

/// Thread-safe call statistics aggregator
#[derive(Debug, Default)]
pub struct CallStats {
    inner: Mutex<StatsSnapshot>,
}

impl CallStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call against the global and the `service` counters
    pub fn record(&self, service: &str, tier: CacheTier, elapsed: Duration) {
        let mut inner = self.inner.lock();
        inner.global.record(tier, elapsed);
        match inner.services.get_mut(service) {
            Some(counter) => counter.record(tier, elapsed),
            None => {
                let mut counter = StatCounter::default();
                counter.record(tier, elapsed);
                inner.services.insert(service.to_string(), counter);
            }
        }
    }

    /// Consistent copy of every counter
    pub fn snapshot(&self) -> StatsSnapshot {
        self.inner.lock().clone()
    }

    /// Clear all counters
    pub fn reset(&self) {
        *self.inner.lock() = StatsSnapshot::default();
    }
}
