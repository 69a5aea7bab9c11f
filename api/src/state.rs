//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::error::{ModelResult, ObjectKind};
use shared::models::{ObjectiveModel, TraceModel};
use shared::storage::{
    InMemoryObjectiveModelStore, InMemoryTraceModelStore, ObjectiveModelStore, TraceModelStore,
};
use shared::sync::{Coalescer, KeyedGuard, KeyedMutex};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Besides the stores it carries the per-id lock registry that serializes
/// reads and updates of one model, and the coalescers that let concurrent
/// reads of the same id share a single store call.
#[derive(Clone)]
pub struct AppState {
    trace_models: Arc<dyn TraceModelStore>,
    objective_models: Arc<dyn ObjectiveModelStore>,
    locks: KeyedMutex,
    trace_reads: Arc<Coalescer<ModelResult<TraceModel>>>,
    objective_reads: Arc<Coalescer<ModelResult<ObjectiveModel>>>,
}

impl AppState {
    /// Creates a new application state with the given stores.
    pub fn new(
        trace_models: Arc<dyn TraceModelStore>,
        objective_models: Arc<dyn ObjectiveModelStore>,
    ) -> Self {
        Self {
            trace_models,
            objective_models,
            locks: KeyedMutex::new(),
            trace_reads: Arc::new(Coalescer::new()),
            objective_reads: Arc::new(Coalescer::new()),
        }
    }

    /// Creates a new application state with in-memory stores.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self::new(
            InMemoryTraceModelStore::new_shared(),
            InMemoryObjectiveModelStore::new_shared(),
        )
    }

    /// Returns a reference to the trace model store.
    #[must_use]
    pub fn trace_models(&self) -> &dyn TraceModelStore {
        self.trace_models.as_ref()
    }

    /// Returns a reference to the objective model store.
    #[must_use]
    pub fn objective_models(&self) -> &dyn ObjectiveModelStore {
        self.objective_models.as_ref()
    }

    /// Returns the trace model read coalescer.
    #[must_use]
    pub fn trace_reads(&self) -> &Coalescer<ModelResult<TraceModel>> {
        &self.trace_reads
    }

    /// Returns the objective model read coalescer.
    #[must_use]
    pub fn objective_reads(&self) -> &Coalescer<ModelResult<ObjectiveModel>> {
        &self.objective_reads
    }

    /// Acquires the lock for one model id.
    pub async fn lock_model(&self, object: ObjectKind, id: &str) -> KeyedGuard {
        self.locks.lock(&lock_key(object, id)).await
    }

    /// Returns the number of model ids currently locked or awaited.
    #[must_use]
    pub fn locked_models(&self) -> usize {
        self.locks.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}

/// Key used for both the lock registry and the read coalescers.
#[must_use]
pub fn lock_key(object: ObjectKind, id: &str) -> String {
    format!("{object}/{id}")
}
