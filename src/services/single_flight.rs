// src/services/single_flight.rs

//! Request deduplication keyed by resource identity.
//!
//! The first caller for a key runs the fetch; callers that arrive while it is
//! in flight wait for it, and later callers get the stored value. A failed
//! fetch stores nothing, so the next caller tries again.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::error::Result;

/// Per-key once-only async fetch.
pub struct SingleFlight<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceCell<Arc<V>>>>>,
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Return the value for `key`, running `fetch` only if nobody has yet.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let cell = {
            let mut cells = self.cells.lock().await;
            Arc::clone(cells.entry(key).or_default())
        };

        cell.get_or_try_init(|| async move { fetch().await.map(Arc::new) })
            .await
            .map(Arc::clone)
    }

    /// Whether a value is stored for `key`.
    pub async fn is_resolved(&self, key: &K) -> bool {
        self.cells
            .lock()
            .await
            .get(key)
            .is_some_and(|cell| cell.initialized())
    }

    /// Drop the stored value for `key` so the next call fetches again.
    pub async fn forget(&self, key: &K) {
        self.cells.lock().await.remove(key);
    }
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
