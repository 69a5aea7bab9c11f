//! Objective model storage.

use super::{InMemoryModelStore, ModelStore, StoredModel};
use crate::error::ObjectKind;
use crate::models::ObjectiveModel;
use chrono::{DateTime, Utc};

impl StoredModel for ObjectiveModel {
    const OBJECT: ObjectKind = ObjectKind::ObjectiveModel;

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

/// Storage for objective models.
pub trait ObjectiveModelStore: ModelStore<ObjectiveModel> {}

impl<T: ModelStore<ObjectiveModel>> ObjectiveModelStore for T {}

/// In-memory objective model store.
pub type InMemoryObjectiveModelStore = InMemoryModelStore<ObjectiveModel>;
