use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};

/// Search cache key: case-insensitive term, order-insensitive types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    term: String,
    types: Vec<String>,
    limit: i64,
    offset: i64,
}

impl SearchKey {
    pub fn new(term: &str, types: &[String], limit: i64, offset: i64) -> Self {
        let mut types = types.to_vec();
        types.sort();
        Self {
            term: term.to_lowercase(),
            types,
            limit,
            offset,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    payload: Map<String, Value>,
}

/// In-process TTL cache for search payloads. A zero TTL disables it.
#[derive(Debug)]
pub struct SearchCache {
    ttl: Duration,
    entries: Mutex<HashMap<SearchKey, CacheEntry>>,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &SearchKey) -> Option<Map<String, Value>> {
        if self.ttl.is_zero() {
            return None;
        }
        let map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.payload.clone())
    }

    pub fn insert(&self, key: SearchKey, payload: Map<String, Value>) {
        if self.ttl.is_zero() {
            return;
        }
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let ttl = self.ttl;
        map.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        map.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                payload,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
