//! # Query Cache
//!
//! The process-wide keyed store every screen reads from and writes to.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          QueryCache                                     │
//! │                                                                         │
//! │   RwLock<HashMap<QueryKey, serde_json::Value>>                          │
//! │   ┌──────────────────────┬──────────────────────────────────────┐      │
//! │   │ "ventas"             │ [Sale, Sale, ...]                    │      │
//! │   │ "usuarios"           │ [User, ...]                          │      │
//! │   │ "productos-catalogo" │ [Product, ...]                       │      │
//! │   └──────────────────────┴──────────────────────────────────────┘      │
//! │              │ every write                                              │
//! │              ▼                                                          │
//! │   broadcast::Sender<CacheChange { key, version }>                       │
//! │              │                                                          │
//! │      ┌───────┴────────┐                                                 │
//! │      ▼                ▼                                                 │
//! │  Subscription     Subscription     (each filters to its own key)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Semantics
//! - Writers replace the whole value for a key; there is no patching.
//! - Nothing is validated on write. Typed reads report `CacheError::Decode`.
//! - `update_query_data` does read-modify-write under one write lock.
//!   A `get` followed by a `set` across an `.await` can still lose an update.
//! - The lock is never held across an `.await`.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::error::{CacheError, CacheResult};

/// Capacity of the change notification channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Query Key
// =============================================================================

/// Logical name of a cached collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Sales,
    Users,
    Products,
}

impl QueryKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Sales => "ventas",
            QueryKey::Users => "usuarios",
            QueryKey::Products => "productos-catalogo",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Change Notification
// =============================================================================

/// A write happened under `key`. Versions increase across the whole cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheChange {
    pub key: QueryKey,
    pub version: u64,
}

/// A reader's subscription to one key.
///
/// Holds the cache weakly, so a subscription alone does not keep the
/// cache (and its change channel) alive.
#[derive(Debug)]
pub struct Subscription {
    key: QueryKey,
    cache: Weak<Inner>,
    rx: broadcast::Receiver<CacheChange>,
}

impl Subscription {
    pub fn key(&self) -> QueryKey {
        self.key
    }

    /// Waits for the next change to this key.
    ///
    /// Returns `None` once every clone of the cache has been dropped and
    /// buffered changes are drained. A lagging subscriber gets a single
    /// change carrying the current version, meaning "re-read now".
    pub async fn changed(&mut self) -> Option<CacheChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) if change.key == self.key => return Some(change),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(key = %self.key, skipped, "Subscriber lagged");
                    return self.resync();
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`Subscription::changed`].
    pub fn try_changed(&mut self) -> Option<CacheChange> {
        loop {
            match self.rx.try_recv() {
                Ok(change) if change.key == self.key => return Some(change),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(_)) => return self.resync(),
                Err(_) => return None,
            }
        }
    }

    fn resync(&mut self) -> Option<CacheChange> {
        let inner = self.cache.upgrade()?;
        self.rx = self.rx.resubscribe();
        Some(CacheChange {
            key: self.key,
            version: inner.version.load(Ordering::SeqCst),
        })
    }
}

// =============================================================================
// Query Cache
// =============================================================================

#[derive(Debug)]
struct Inner {
    entries: RwLock<HashMap<QueryKey, Value>>,
    version: AtomicU64,
    changes: broadcast::Sender<CacheChange>,
}

/// Shared keyed store. Cloning is cheap and every clone sees the same data.
#[derive(Debug, Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a cache whose change channel buffers `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity.max(1));
        QueryCache {
            inner: Arc::new(Inner {
                entries: RwLock::new(HashMap::new()),
                version: AtomicU64::new(0),
                changes,
            }),
        }
    }

    /// Latest version handed out by a write.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::SeqCst)
    }

    pub fn contains(&self, key: QueryKey) -> CacheResult<bool> {
        Ok(self.read_entries()?.contains_key(&key))
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Raw JSON under `key`.
    pub fn get_raw(&self, key: QueryKey) -> CacheResult<Option<Value>> {
        Ok(self.read_entries()?.get(&key).cloned())
    }

    /// Typed read of `key`.
    pub fn get_query_data<T: DeserializeOwned>(&self, key: QueryKey) -> CacheResult<Option<T>> {
        self.get_raw(key)?.map(|v| decode(key, v)).transpose()
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Replaces the raw value under `key`. No shape checks.
    pub fn set_raw(&self, key: QueryKey, value: Value) -> CacheResult<u64> {
        let version = {
            let mut entries = self.write_entries()?;
            entries.insert(key, value);
            self.bump()
        };
        self.notify(key, version);
        Ok(version)
    }

    /// Replaces the value under `key`.
    pub fn set_query_data<T: Serialize>(&self, key: QueryKey, value: &T) -> CacheResult<u64> {
        let value = encode(key, value)?;
        self.set_raw(key, value)
    }

    /// Read-modify-write of `key` under a single write lock.
    ///
    /// `f` receives the current value (`None` when absent) and returns the
    /// replacement plus an arbitrary result handed back to the caller.
    pub fn update_query_data<T, R, F>(&self, key: QueryKey, f: F) -> CacheResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> (T, R),
    {
        self.update_query_data_if(key, |current| {
            let (next, result) = f(current);
            (Some(next), result)
        })
    }

    /// Like [`QueryCache::update_query_data`], but `f` may decline the write
    /// by returning `None`. A declined write leaves the entry, the version
    /// and the subscribers untouched.
    pub fn update_query_data_if<T, R, F>(&self, key: QueryKey, f: F) -> CacheResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> (Option<T>, R),
    {
        let (version, result) = {
            let mut entries = self.write_entries()?;
            let current = entries.get(&key).cloned().map(|v| decode(key, v)).transpose()?;
            match f(current) {
                (Some(next), result) => {
                    entries.insert(key, encode(key, &next)?);
                    (Some(self.bump()), result)
                }
                (None, result) => (None, result),
            }
        };
        if let Some(version) = version {
            self.notify(key, version);
        }
        Ok(result)
    }

    /// Drops `key`. Returns whether anything was cached.
    pub fn remove_query(&self, key: QueryKey) -> CacheResult<bool> {
        let removed = {
            let mut entries = self.write_entries()?;
            entries.remove(&key).is_some()
        };
        if removed {
            let version = self.bump();
            self.notify(key, version);
        }
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Fetch-through
    // -------------------------------------------------------------------------

    /// Returns the cached value, or runs `fetcher`, caches and returns its
    /// result. Failed fetches are not cached.
    pub async fn fetch_query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> CacheResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = CacheResult<T>>,
    {
        if let Some(hit) = self.get_query_data(key)? {
            trace!(key = %key, "Query cache hit");
            return Ok(hit);
        }

        debug!(key = %key, "Query cache miss, fetching");
        let fetched = fetcher().await?;
        self.set_query_data(key, &fetched)?;
        Ok(fetched)
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Subscribes to changes of `key` made after this call.
    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        Subscription {
            key,
            cache: Arc::downgrade(&self.inner),
            rx: self.inner.changes.subscribe(),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn read_entries(
        &self,
    ) -> CacheResult<std::sync::RwLockReadGuard<'_, HashMap<QueryKey, Value>>> {
        self.inner.entries.read().map_err(|_| CacheError::Poisoned)
    }

    fn write_entries(
        &self,
    ) -> CacheResult<std::sync::RwLockWriteGuard<'_, HashMap<QueryKey, Value>>> {
        self.inner.entries.write().map_err(|_| CacheError::Poisoned)
    }

    fn bump(&self) -> u64 {
        self.inner.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn notify(&self, key: QueryKey, version: u64) {
        trace!(key = %key, version, "Cache changed");
        // no subscribers is fine
        let _ = self.inner.changes.send(CacheChange { key, version });
    }
}

fn decode<T: DeserializeOwned>(key: QueryKey, value: Value) -> CacheResult<T> {
    serde_json::from_value(value).map_err(|source| CacheError::Decode {
        key: key.to_string(),
        source,
    })
}

fn encode<T: Serialize>(key: QueryKey, value: &T) -> CacheResult<Value> {
    serde_json::to_value(value).map_err(|source| CacheError::Encode {
        key: key.to_string(),
        source,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
