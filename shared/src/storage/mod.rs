//! Storage traits and implementations.
//!
//! The [`ModelStore`] trait defines the persistence interface shared by trace
//! models and objective models. [`InMemoryModelStore`] backs it with a
//! `RwLock`-guarded map for development and testing.

pub mod objective_model_store;
pub mod trace_model_store;

pub use objective_model_store::{InMemoryObjectiveModelStore, ObjectiveModelStore};
pub use trace_model_store::{InMemoryTraceModelStore, TraceModelStore};

use crate::error::{ErrorKind, ModelError, ObjectKind};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use uuid::Uuid;

/// Code used when the store itself fails.
pub const STORAGE_FAILED: &str = "DataModel.InternalError.StorageFailed";

/// Errors that can occur during model store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on model store")]
    LockError,

    /// No model has the given id.
    #[error("The {} {id:?} does not exist", object.label())]
    NotFound {
        /// Kind of model looked up.
        object: ObjectKind,
        /// The missing id.
        id: String,
    },

    /// A model with the given id is already stored.
    #[error("The {} {id:?} already exists", object.label())]
    AlreadyExists {
        /// Kind of model inserted.
        object: ObjectKind,
        /// The conflicting id.
        id: String,
    },

    /// Generic storage error.
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<StoreError> for ModelError {
    fn from(err: StoreError) -> Self {
        let details = err.to_string();
        match err {
            StoreError::NotFound { object, .. } => {
                Self::new(ErrorKind::NotFound, object, "").with_details(details)
            }
            StoreError::AlreadyExists { object, .. } => {
                Self::new(ErrorKind::Existed, object, "ModelID").with_details(details)
            }
            StoreError::LockError | StoreError::StorageError(_) => {
                Self::with_code(ErrorKind::InternalError, STORAGE_FAILED).with_details(details)
            }
        }
    }
}

/// A model that can be kept in a [`ModelStore`].
pub trait StoredModel: Clone + Send + Sync + 'static {
    /// The object kind used in errors.
    const OBJECT: ObjectKind;

    /// Returns the model id.
    fn id(&self) -> &str;

    /// Replaces the model id.
    fn set_id(&mut self, id: String);

    /// Returns the model name.
    fn name(&self) -> &str;

    /// Returns the creation timestamp.
    fn create_time(&self) -> DateTime<Utc>;

    /// Sets the creation and update timestamps.
    fn set_times(&mut self, create_time: DateTime<Utc>, update_time: DateTime<Utc>);
}

/// Parameters for listing models.
#[derive(Debug, Clone, Default)]
pub struct ModelQuery {
    /// Keep only models whose name contains this text.
    pub name_pattern: Option<String>,

    /// Maximum number of models to return.
    pub limit: Option<usize>,

    /// Number of models to skip (for pagination).
    pub offset: Option<usize>,
}

impl ModelQuery {
    /// Creates a new empty query (returns all models).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name filter.
    #[must_use]
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset for pagination.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// One page of a model listing.
#[derive(Debug, Clone)]
pub struct ModelPage<M> {
    /// The models on this page, ordered by name.
    pub entries: Vec<M>,

    /// Total count of matching models (before limit/offset applied).
    pub total_count: usize,
}

/// Trait for model storage implementations.
///
/// Implementations must be thread-safe (Send + Sync). Batch operations are
/// all-or-nothing.
pub trait ModelStore<M: StoredModel>: Send + Sync {
    /// Inserts models, generating ids for those without one, and returns the
    /// ids in input order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if any id is taken.
    fn create(&self, models: Vec<M>) -> Result<Vec<String>, StoreError>;

    /// Gets a model by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    fn get(&self, id: &str) -> Result<M, StoreError>;

    /// Gets several models by id, in the order requested.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for the first unknown id.
    fn get_many(&self, ids: &[String]) -> Result<Vec<M>, StoreError>;

    /// Replaces a stored model, keeping its creation time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    fn update(&self, model: M) -> Result<(), StoreError>;

    /// Deletes several models by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if any id is unknown; nothing is
    /// deleted in that case.
    fn delete_many(&self, ids: &[String]) -> Result<(), StoreError>;

    /// Lists models matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn list(&self, query: ModelQuery) -> Result<ModelPage<M>, StoreError>;

    /// Returns the subset of `names` already used by stored models.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn existing_names(&self, names: &[String]) -> Result<Vec<String>, StoreError>;

    /// Returns the number of stored models.
    ///
    /// # Errors
    ///
    /// Returns an error if the count operation fails.
    fn count(&self) -> Result<usize, StoreError>;
}

/// In-memory model store implementation.
#[derive(Debug)]
pub struct InMemoryModelStore<M> {
    /// Models keyed by id.
    models: Arc<RwLock<HashMap<String, M>>>,
}

impl<M> Default for InMemoryModelStore<M> {
    fn default() -> Self {
        Self {
            models: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<M: StoredModel> InMemoryModelStore<M> {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl<M: StoredModel> ModelStore<M> for InMemoryModelStore<M> {
    fn create(&self, models: Vec<M>) -> Result<Vec<String>, StoreError> {
        let mut stored = self.models.write().map_err(|_| StoreError::LockError)?;

        let mut batch_ids = HashSet::new();
        for model in &models {
            let id = model.id();
            if !id.is_empty() && (stored.contains_key(id) || !batch_ids.insert(id.to_string())) {
                return Err(StoreError::AlreadyExists {
                    object: M::OBJECT,
                    id: id.to_string(),
                });
            }
        }

        let now = Utc::now();
        let mut ids = Vec::with_capacity(models.len());
        for mut model in models {
            if model.id().is_empty() {
                model.set_id(Uuid::new_v4().to_string());
            }
            model.set_times(now, now);
            ids.push(model.id().to_string());
            stored.insert(model.id().to_string(), model);
        }
        Ok(ids)
    }

    fn get(&self, id: &str) -> Result<M, StoreError> {
        let stored = self.models.read().map_err(|_| StoreError::LockError)?;
        stored.get(id).cloned().ok_or_else(|| StoreError::NotFound {
            object: M::OBJECT,
            id: id.to_string(),
        })
    }

    fn get_many(&self, ids: &[String]) -> Result<Vec<M>, StoreError> {
        let stored = self.models.read().map_err(|_| StoreError::LockError)?;
        ids.iter()
            .map(|id| {
                stored.get(id).cloned().ok_or_else(|| StoreError::NotFound {
                    object: M::OBJECT,
                    id: id.clone(),
                })
            })
            .collect()
    }

    fn update(&self, mut model: M) -> Result<(), StoreError> {
        let mut stored = self.models.write().map_err(|_| StoreError::LockError)?;
        let previous = stored
            .get(model.id())
            .ok_or_else(|| StoreError::NotFound {
                object: M::OBJECT,
                id: model.id().to_string(),
            })?;

        model.set_times(previous.create_time(), Utc::now());
        stored.insert(model.id().to_string(), model);
        Ok(())
    }

    fn delete_many(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut stored = self.models.write().map_err(|_| StoreError::LockError)?;
        if let Some(missing) = ids.iter().find(|id| !stored.contains_key(id.as_str())) {
            return Err(StoreError::NotFound {
                object: M::OBJECT,
                id: missing.clone(),
            });
        }
        for id in ids {
            stored.remove(id);
        }
        Ok(())
    }

    fn list(&self, query: ModelQuery) -> Result<ModelPage<M>, StoreError> {
        let stored = self.models.read().map_err(|_| StoreError::LockError)?;

        let mut entries: Vec<M> = stored
            .values()
            .filter(|model| {
                query
                    .name_pattern
                    .as_deref()
                    .is_none_or(|pattern| model.name().contains(pattern))
            })
            .cloned()
            .collect();

        entries.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));

        let total_count = entries.len();

        // Apply offset and limit
        let entries = entries
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(ModelPage {
            entries,
            total_count,
        })
    }

    fn existing_names(&self, names: &[String]) -> Result<Vec<String>, StoreError> {
        let stored = self.models.read().map_err(|_| StoreError::LockError)?;
        let taken: HashSet<&str> = stored.values().map(|m| m.name()).collect();
        Ok(names
            .iter()
            .filter(|name| taken.contains(name.as_str()))
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let stored = self.models.read().map_err(|_| StoreError::LockError)?;
        Ok(stored.len())
    }
}
