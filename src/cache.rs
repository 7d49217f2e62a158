// Catalog cache keyed by source identity
// Parsing a source is expensive compared to filtering, so each identity is loaded once

use crate::catalog::{load, Catalog, CatalogSource, LoadError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

// Live counters for the cache
#[derive(Debug, Default)]
pub struct CacheStats {
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
    pub failed_load_count: AtomicUsize,
    pub invalidation_count: AtomicUsize,
}

// Point-in-time copy of the counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsReport {
    pub items_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub failed_load_count: usize,
    pub invalidation_count: usize,
}

#[derive(Debug, Default)]
pub struct CatalogCache {
    entries: DashMap<String, Arc<Catalog>>,
    stats: CacheStats,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Return the cached catalog for this source, loading it on first use.
    // Failed loads are not cached, so a fixed source can be retried.
    pub fn get_or_load<S: CatalogSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Arc<Catalog>, LoadError> {
        let key = source.identity();

        if let Some(entry) = self.entries.get(&key) {
            self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
            debug!(source = %key, "Catalog cache hit");
            return Ok(Arc::clone(entry.value()));
        }

        self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
        info!(source = %key, "Catalog cache miss, loading source");

        let catalog = match load(source) {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => {
                self.stats.failed_load_count.fetch_add(1, Ordering::SeqCst);
                warn!(source = %key, error = %e, "Catalog load failed");
                return Err(e);
            }
        };

        // Two concurrent misses both load; the first insert wins and both callers share it
        let shared = self.entries.entry(key).or_insert(catalog);
        Ok(Arc::clone(shared.value()))
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    // Drop the cached catalog so the next lookup reloads the source
    pub fn invalidate(&self, identity: &str) -> bool {
        let removed = self.entries.remove(identity).is_some();
        if removed {
            self.stats.invalidation_count.fetch_add(1, Ordering::SeqCst);
        }
        removed
    }

    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats
            .invalidation_count
            .fetch_add(count, Ordering::SeqCst);
        count
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            items_count: self.entries.len(),
            hit_count: self.stats.hit_count.load(Ordering::SeqCst),
            miss_count: self.stats.miss_count.load(Ordering::SeqCst),
            failed_load_count: self.stats.failed_load_count.load(Ordering::SeqCst),
            invalidation_count: self.stats.invalidation_count.load(Ordering::SeqCst),
        }
    }
}
