//! Generated-document cache keyed by the validated case tuple.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::CaseInput;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Separates the key fields so ("ab", "c") and ("a", "bc") never collide
const FIELD_SEPARATOR: char = '\u{1f}';

/// String key/value store for generated documents
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn clear(&self);
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-process cache with a fixed per-entry time to live
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock leaves the map itself intact
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                debug!("Cache entry {} expired", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` and drop every entry that has already expired
    fn set(&self, key: &str, value: String) {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        if entries.len() < before {
            debug!("Swept {} expired cache entries", before - entries.len());
        }
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

/// `doc_` + hex SHA-256 of the ordered case fields
pub fn cache_key(case: &CaseInput) -> String {
    let mut hasher = Sha256::new();
    for (index, field) in case.ordered_fields().iter().enumerate() {
        if index > 0 {
            let mut separator = [0u8; 4];
            hasher.update(FIELD_SEPARATOR.encode_utf8(&mut separator).as_bytes());
        }
        hasher.update(field.as_bytes());
    }
    format!("doc_{:x}", hasher.finalize())
}
