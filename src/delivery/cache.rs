//! Bounded FIFO cache of delivered payloads.
//!
//! Entries are kept newest first. Inserting past capacity drops the oldest
//! inserted entry; reads never reorder, so this is not an LRU.

use std::collections::VecDeque;

use mediavault_common::TransformSpec;
use parking_lot::RwLock;
use tracing::debug;

use super::service::DeliveredMedia;

/// Default number of cached renderings.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Identity of a cached rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: String,
    pub spec: TransformSpec,
}

impl CacheKey {
    pub fn new(name: impl Into<String>, spec: TransformSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }
}

struct CacheEntry {
    key: CacheKey,
    media: DeliveredMedia,
}

/// Shared cache of rendered payloads keyed by object name and transform.
pub struct TransformCache {
    entries: RwLock<VecDeque<CacheEntry>>,
    capacity: usize,
}

impl TransformCache {
    /// A cache holding at most `capacity` entries. Zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Look up a rendering without touching insertion order.
    pub fn get(&self, name: &str, spec: TransformSpec) -> Option<DeliveredMedia> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.key.name == name && entry.key.spec == spec)
            .map(|entry| entry.media.clone())
    }

    /// Store a rendering as the newest entry.
    ///
    /// An existing entry with the same key is replaced, so keys stay unique.
    pub fn insert(&self, name: &str, spec: TransformSpec, media: DeliveredMedia) {
        if self.capacity == 0 {
            return;
        }

        let key = CacheKey::new(name, spec);
        let mut entries = self.entries.write();
        entries.retain(|entry| entry.key != key);
        entries.push_front(CacheEntry { key, media });

        while entries.len() > self.capacity {
            if let Some(evicted) = entries.pop_back() {
                debug!(
                    "Evicted cached rendering {} (size {:?})",
                    evicted.key.name,
                    evicted.key.spec.size()
                );
            }
        }
    }

    /// Drop every rendering of the named object. Returns how many went.
    pub fn purge_object(&self, name: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| entry.key.name != name);
        before - entries.len()
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Keys newest first.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.key.clone())
            .collect()
    }
}

impl Default for TransformCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
