//! Coalescing of identical concurrent reads.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

type Inflight<V> = HashMap<String, Arc<OnceCell<V>>>;

/// Shares one in-flight call among concurrent callers with the same key.
///
/// The first caller for a key runs the call; callers arriving while it runs
/// wait and receive a clone of the same outcome, error included. Once the
/// call finishes the key is forgotten, so later callers start a fresh call.
///
/// `V` is usually a `Result`, so errors are shared as well.
#[derive(Debug)]
pub struct Coalescer<V> {
    inflight: Mutex<Inflight<V>>,
}

impl<V> Default for Coalescer<V> {
    fn default() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> Coalescer<V> {
    /// Creates an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `call` for `key`, or joins the call already running for it.
    pub async fn run<F, Fut>(&self, key: &str, call: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(inflight.entry(key.to_string()).or_default())
        };

        let value = cell.get_or_init(call).await.clone();

        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if inflight
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, &cell))
        {
            inflight.remove(key);
        }

        value
    }

    /// Returns the number of keys with a call in flight.
    #[must_use]
    pub fn inflight(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
