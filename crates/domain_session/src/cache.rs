//! Session cache
//!
//! Concurrent map from caller identity to [`CrmUser`]. Each operation is
//! atomic with respect to every other cache operation on the same key, and
//! callers with different keys only share a shard lock for the duration of
//! a single map operation. There is no expiry: a record stays until it is
//! re-admitted or explicitly removed, and the session managers decide
//! whether a recovered token is still usable.
//!
//! Callers needing a read-check-write sequence on one key (token refresh,
//! credential replacement) serialize it with [`SessionCache::lock_key`]. The
//! guard is key-scoped, so different callers never wait on each other.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use core_kernel::CrmUserId;

use crate::user::CrmUser;

/// Explicitly constructed, cheaply cloneable handle to the shared cache
///
/// Clones share the same underlying map; construct a fresh cache per test
/// to get isolation.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    entries: Arc<DashMap<CrmUserId, CrmUser>>,
    key_locks: Arc<DashMap<CrmUserId, Arc<Mutex<()>>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the record admitted for `key`, if any
    ///
    /// The copy is a snapshot: a later `admit` for the same key does not
    /// change it.
    pub async fn recover(&self, key: &CrmUserId) -> Option<CrmUser> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Inserts or overwrites the record for `key`; last writer wins
    pub async fn admit(&self, key: CrmUserId, record: CrmUser) {
        tracing::trace!(key = %key, has_token = record.has_token(), "admitting session record");
        self.entries.insert(key, record);
    }

    /// Inserts `record` only when nothing is admitted for `key` yet
    ///
    /// Returns true if the record was inserted.
    pub async fn admit_if_absent(&self, key: CrmUserId, record: CrmUser) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                true
            }
        }
    }

    /// Stores a refreshed `record` only while the cached record for `key`
    /// still carries the same credentials
    ///
    /// Returns false, leaving the cache untouched, when the record was
    /// replaced with other credentials or removed after the refresh began.
    pub async fn admit_if_unchanged(&self, key: CrmUserId, record: CrmUser) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(mut current) if current.get().same_credentials(&record) => {
                tracing::trace!(key = %current.key(), has_token = record.has_token(), "admitting refreshed record");
                current.insert(record);
                true
            }
            _ => false,
        }
    }

    /// Drops the record for `key`
    ///
    /// The key's lock entry survives while any task holds or waits for it.
    pub async fn remove(&self, key: &CrmUserId) -> Option<CrmUser> {
        let removed = self.entries.remove(key).map(|(_, record)| record);
        self.key_locks.remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Acquires the critical section for `key`
    ///
    /// Holding the guard does not block plain `recover`/`admit`; it only
    /// excludes other holders of the same key's guard.
    pub async fn lock_key(&self, key: &CrmUserId) -> OwnedMutexGuard<()> {
        let lock = self.key_locks.entry(key.clone()).or_default().clone();
        lock.lock_owned().await
    }
}
