//! Per-key mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// A registry of async locks keyed by entity id.
///
/// Holders of the same key run one at a time; different keys never block each
/// other. An entry lives only while some task holds or waits for its lock.
///
/// # Example
///
/// ```
/// use shared::sync::KeyedMutex;
///
/// # tokio_test::block_on(async {
/// let locks = KeyedMutex::new();
/// {
///     let _guard = locks.lock("model-1").await;
///     assert_eq!(locks.len(), 1);
/// }
/// assert!(locks.is_empty());
/// # });
/// ```
#[derive(Debug, Default, Clone)]
pub struct KeyedMutex {
    locks: Arc<Mutex<LockMap>>,
}

impl KeyedMutex {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and acquires the lock for `key`.
    pub async fn lock(&self, key: &str) -> KeyedGuard {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.to_string()).or_default())
        };

        let guard = mutex.lock_owned().await;
        KeyedGuard {
            locks: Arc::clone(&self.locks),
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// Returns the number of keys currently held or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no key is held or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Holds the lock for one key; releases it on drop.
#[derive(Debug)]
pub struct KeyedGuard {
    locks: Arc<Mutex<LockMap>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedGuard {
    /// The key this guard holds.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyedGuard {
    fn drop(&mut self) {
        // Release first so the map holds the last reference when idle.
        drop(self.guard.take());

        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.key)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
        {
            locks.remove(&self.key);
        }
    }
}
