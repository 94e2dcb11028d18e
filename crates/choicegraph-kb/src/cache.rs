//! Bounded query-result cache
//!
//! Keyed by query text, evicted with the SIEVE policy. Hit and miss
//! counters feed the driver's end-of-run summary. No TTL: a run is assumed
//! to see a stable knowledge-base snapshot, so entries never expire.

use choicegraph_graph::GroundingMap;
use sieve_cache::SieveCache;

use crate::KbError;

/// Hit/miss counters and occupancy of a [`QueryCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Size-bounded store of query results.
pub struct QueryCache {
    entries: SieveCache<String, Vec<GroundingMap>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    /// Creates a cache holding at most `capacity` query results.
    pub fn new(capacity: usize) -> Result<Self, KbError> {
        let entries = SieveCache::new(capacity)
            .map_err(|error| KbError::Cache(format!("could not initialize cache: {error}")))?;
        Ok(Self {
            entries,
            capacity,
            hits: 0,
            misses: 0,
        })
    }

    /// Returns the cached rows for `query_text`, counting a hit or miss.
    pub fn get(&mut self, query_text: &str) -> Option<Vec<GroundingMap>> {
        let key = query_text.to_string();
        match self.entries.get(&key) {
            Some(rows) => {
                self.hits += 1;
                Some(rows.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Stores rows for `query_text`, evicting per SIEVE when full.
    pub fn insert(&mut self, query_text: &str, rows: Vec<GroundingMap>) {
        self.entries.insert(query_text.to_string(), rows);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            len: self.entries.len(),
            capacity: self.capacity,
        }
    }
}
