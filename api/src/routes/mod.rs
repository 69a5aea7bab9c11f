//! API route definitions.
//!
//! This module organizes all HTTP routes for the data-model API server, plus
//! the lookup, listing and deletion steps that trace models and objective
//! models share.

mod audit;
mod error;
mod health;
mod objective_models;
mod trace_models;

pub use error::{ApiError, ErrorResponse};
pub use health::health_routes;
pub use objective_models::objective_model_routes;
pub use trace_models::trace_model_routes;

use crate::state::{lock_key, AppState};
use audit::Operation;
use serde::{Deserialize, Serialize};
use shared::error::{ErrorKind, ModelError, ModelResult, INVALID_REQUEST_BODY};
use shared::storage::{ModelQuery, ModelStore, StoredModel};
use shared::sync::Coalescer;

/// Upper bound applied to the `limit` list parameter.
pub const MAX_LIST_LIMIT: usize = 1000;

/// Query parameters for listing models.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-sensitive substring of the model name.
    pub name_pattern: Option<String>,
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
    /// Number of entries to skip.
    pub offset: Option<usize>,
}

impl From<ListParams> for ModelQuery {
    fn from(params: ListParams) -> Self {
        let mut query = ModelQuery::new();
        if let Some(pattern) = params.name_pattern.filter(|p| !p.is_empty()) {
            query = query.with_name_pattern(pattern);
        }
        if let Some(limit) = params.limit {
            query = query.with_limit(limit.min(MAX_LIST_LIMIT));
        }
        if let Some(offset) = params.offset {
            query = query.with_offset(offset);
        }
        query
    }
}

/// One page of models.
#[derive(Debug, Serialize)]
pub struct ListResponse<M> {
    /// Models on this page.
    pub entries: Vec<M>,
    /// Number of models matching the filter.
    pub total_count: usize,
}

/// Id of a created model.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedId {
    /// The assigned or supplied id.
    pub id: String,
}

/// Splits a comma-separated id path segment.
fn parse_ids(raw: &str) -> ModelResult<Vec<String>> {
    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();

    if ids.is_empty() {
        return Err(
            ModelError::with_code(ErrorKind::InvalidParameter, INVALID_REQUEST_BODY)
                .with_details("at least one id is required"),
        );
    }
    Ok(ids)
}

fn empty_batch() -> ModelError {
    ModelError::with_code(ErrorKind::InvalidParameter, INVALID_REQUEST_BODY)
        .with_details("at least one model is required")
}

/// Reads models by id, each under its lock, coalescing concurrent reads.
async fn read_models<M, S>(
    state: &AppState,
    store: &S,
    reads: &Coalescer<ModelResult<M>>,
    ids: &[String],
) -> ModelResult<Vec<M>>
where
    M: StoredModel,
    S: ModelStore<M> + ?Sized,
{
    let mut models = Vec::with_capacity(ids.len());
    for id in ids {
        let key = lock_key(M::OBJECT, id);
        let model = reads
            .run(&key, move || async move {
                let _guard = state.lock_model(M::OBJECT, id).await;
                store.get(id).map_err(ModelError::from)
            })
            .await?;
        models.push(model);
    }
    Ok(models)
}

fn list_models<M, S>(store: &S, params: ListParams) -> ModelResult<ListResponse<M>>
where
    M: StoredModel,
    S: ModelStore<M> + ?Sized,
{
    let page = store.list(params.into())?;
    Ok(ListResponse {
        entries: page.entries,
        total_count: page.total_count,
    })
}

/// Deletes models by id, all or nothing, holding every id's lock.
async fn delete_models<M, S>(state: &AppState, store: &S, ids: &[String]) -> ModelResult<()>
where
    M: StoredModel,
    S: ModelStore<M> + ?Sized,
{
    // Sorted acquisition keeps concurrent multi-id deletes from deadlocking.
    let mut ordered = ids.to_vec();
    ordered.sort();
    ordered.dedup();
    let mut guards = Vec::with_capacity(ordered.len());
    for id in &ordered {
        guards.push(state.lock_model(M::OBJECT, id).await);
    }

    let result = store
        .get_many(&ordered)
        .and_then(|models| store.delete_many(&ordered).map(|()| models))
        .map_err(ModelError::from);

    match result {
        Ok(models) => {
            for model in &models {
                audit::record(Operation::Delete, M::OBJECT, model.id(), model.name(), Ok(()));
            }
            Ok(())
        }
        Err(err) => {
            for id in &ordered {
                audit::record(Operation::Delete, M::OBJECT, id, "", Err(&err));
            }
            Err(err)
        }
    }
}
