use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;

struct CacheEntry<V> {
    cell: Arc<OnceCell<V>>,
    inserted_at: Instant,
    tags: Vec<String>,
}

/// In-process key/value cache with a fixed time-to-live and tag invalidation.
///
/// Entries expire `ttl` after they are inserted. Callers racing on the same
/// key share one initialization: the first caller runs `init`, the others
/// wait on the same cell and receive its value. A failed initialization
/// leaves nothing cached, so the next caller runs `init` again.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.duration_since(entry.inserted_at) < self.ttl
    }

    /// Returns the cached value if present, initialized and not expired
    #[cfg(test)]
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().await;
        let now = Instant::now();
        entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .and_then(|entry| entry.cell.get().cloned())
    }

    /// Returns the cached value for `key`, running `init` on a miss.
    ///
    /// The entry is registered under `tags` so that [`TtlCache::invalidate_tag`]
    /// can drop it before it expires. Its time-to-live starts when `init`
    /// returns a value; if `init` fails the entry is removed.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: K,
        tags: &[&str],
        init: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            let now = Instant::now();

            let fresh = entries
                .get(&key)
                .filter(|entry| self.is_fresh(entry, now))
                .map(|entry| Arc::clone(&entry.cell));

            match fresh {
                Some(cell) => cell,
                None => {
                    // Sweep expired entries while the lock is held anyway
                    entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);

                    let cell = Arc::new(OnceCell::new());
                    entries.insert(
                        key.clone(),
                        CacheEntry {
                            cell: Arc::clone(&cell),
                            inserted_at: now,
                            tags: tags.iter().map(|t| t.to_string()).collect(),
                        },
                    );
                    cell
                }
            }
        };

        let mut ran_init = false;
        let result = cell
            .get_or_try_init(|| {
                ran_init = true;
                init()
            })
            .await
            .map(V::clone);

        if ran_init {
            let mut entries = self.entries.lock().await;
            let ours = entries
                .get(&key)
                .is_some_and(|entry| Arc::ptr_eq(&entry.cell, &cell));
            if ours {
                match &result {
                    Ok(_) => {
                        if let Some(entry) = entries.get_mut(&key) {
                            entry.inserted_at = Instant::now();
                        }
                    }
                    Err(_) if cell.get().is_none() => {
                        entries.remove(&key);
                    }
                    Err(_) => {}
                }
            }
        }

        result
    }

    /// Drops every entry registered under `tag`; returns how many were dropped
    pub async fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        before - entries.len()
    }

    /// Drops every entry
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of stored entries, including ones still initializing
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
