//! Per-medication mutual exclusion.
//!
//! Commission's exists-check-and-write and the read-modify-write of an event
//! append must not interleave for the same id. Different ids never contend.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table of async locks keyed by medication id.
///
/// Entries nobody holds or waits on are pruned on the next acquisition, so
/// the table stays proportional to in-flight operations.
#[derive(Default)]
pub struct KeyedLocks {
    table: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`. Released when the guard drops.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock();
            // Only the table references these: no holder, no waiter.
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
            table.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of ids currently tracked.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// True if no id is tracked.
    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }
}
