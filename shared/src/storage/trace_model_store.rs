//! Trace model storage.

use super::{InMemoryModelStore, ModelStore, StoredModel};
use crate::error::ObjectKind;
use crate::models::TraceModel;
use chrono::{DateTime, Utc};

impl StoredModel for TraceModel {
    const OBJECT: ObjectKind = ObjectKind::TraceModel;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    fn set_times(&mut self, create_time: DateTime<Utc>, update_time: DateTime<Utc>) {
        self.create_time = create_time;
        self.update_time = update_time;
    }
}

/// Storage for trace models.
pub trait TraceModelStore: ModelStore<TraceModel> {}

impl<T: ModelStore<TraceModel>> TraceModelStore for T {}

/// In-memory trace model store.
pub type InMemoryTraceModelStore = InMemoryModelStore<TraceModel>;
