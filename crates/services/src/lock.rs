//! Keyed async locking.
//!
//! The feedback uniqueness check and the like toggle are both
//! read-then-write sequences against a single logical target. On a
//! single node, serializing them per (actor, target) key closes the
//! race without touching the storage layer.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A map of independently held `tokio::Mutex`es, one per string key.
///
/// Entries are never evicted; the population is bounded by the number of
/// distinct (actor, target) pairs seen by the process.
#[derive(Default)]
pub struct KeyedLock {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the mutex for `key`, waiting if another task holds it.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let cell = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        cell.lock_owned().await
    }
}
