use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Coarse-grained TTL memoization for engine responses, keyed by endpoint
/// plus canonically encoded parameters.
///
/// Concurrent identical requests against a cold cache are NOT deduplicated:
/// both callers hit the engine and the later response wins the slot. The
/// cache only absorbs repeats after the first response lands.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl ResponseCache {
    pub fn new() -> Self {
        ResponseCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone())
    }

    pub fn set(&self, key: &str, value: Value, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();
        // Opportunistic sweep keeps the map bounded by live entries.
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
