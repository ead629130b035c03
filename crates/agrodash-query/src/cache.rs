//! The cache store shared by every query consumer.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::entry::ErasedEntry;
use crate::QueryKey;

/// One cache slot. The watch channel carries the entry, so waiters and
/// subscribers observe every transition.
pub(crate) type Slot = Arc<watch::Sender<ErasedEntry>>;

/// Create an empty slot for a key that has never been fetched.
pub(crate) fn new_slot() -> Slot {
    let (tx, _rx) = watch::channel(ErasedEntry::new());
    Arc::new(tx)
}

/// In-memory store of cache entries keyed by [`QueryKey`].
///
/// Created explicitly and injected into a [`QueryClient`](crate::QueryClient).
/// Only the client and the store itself mutate entries.
pub struct QueryCache {
    pub(crate) slots: RwLock<HashMap<QueryKey, Slot>>,
}

impl QueryCache {
    /// Create a new empty QueryCache wrapped in Arc.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Drop every entry.
    ///
    /// Fetches already in flight still complete for the callers waiting on
    /// them, but their results are not stored.
    pub async fn clear(&self) {
        let mut slots = self.slots.write().await;
        debug!(entries = slots.len(), "Clearing query cache");
        slots.clear();
    }

    /// Drop one entry. Returns true if it existed.
    pub async fn remove(&self, key: &QueryKey) -> bool {
        let removed = self.slots.write().await.remove(key).is_some();
        if removed {
            debug!(key = %key, "Removed query from cache");
        }
        removed
    }

    /// Returns true if an entry exists for the key.
    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.slots.read().await.contains_key(key)
    }

    /// All cached keys, sorted.
    pub async fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self.slots.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Get the number of entries.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    /// Snapshot of the erased entry under a key.
    pub(crate) async fn snapshot(&self, key: &QueryKey) -> Option<ErasedEntry> {
        self.slots
            .read()
            .await
            .get(key)
            .map(|slot| (*slot.borrow()).clone())
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn insert_empty(cache: &QueryCache, key: &QueryKey) {
        cache.slots.write().await.insert(key.clone(), new_slot());
    }

    #[tokio::test]
    async fn test_new_cache_is_empty() {
        let cache = QueryCache::new();
        assert!(cache.is_empty().await);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_keys_are_sorted() {
        let cache = QueryCache::new();
        insert_empty(&cache, &QueryKey::from(["b"])).await;
        insert_empty(&cache, &QueryKey::from(["a", "z"])).await;
        insert_empty(&cache, &QueryKey::from(["a"])).await;

        let keys = cache.keys().await;
        assert_eq!(
            keys,
            vec![
                QueryKey::from(["a"]),
                QueryKey::from(["a", "z"]),
                QueryKey::from(["b"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let cache = QueryCache::new();
        let key = QueryKey::from(["dashboard", "metrics"]);
        insert_empty(&cache, &key).await;
        insert_empty(&cache, &QueryKey::from(["dashboard", "weather"])).await;

        assert!(cache.contains(&key).await);
        assert!(cache.remove(&key).await);
        assert!(!cache.remove(&key).await);
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
