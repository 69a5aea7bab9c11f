//! Trace model endpoints.

use super::audit::{self, Operation};
use super::{
    delete_models, empty_batch, list_models, parse_ids, read_models, ApiError, CreatedId,
    ListParams, ListResponse,
};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::error::{ModelError, ModelResult, ObjectKind};
use shared::models::{TraceModel, TraceModelRequest};
use shared::validation::{resolve_trace_model, validate_trace_model, validate_trace_model_names};

const OBJECT: ObjectKind = ObjectKind::TraceModel;

/// Creates the trace model routes.
pub fn trace_model_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/trace-models",
            post(create_trace_models).get(list_trace_models),
        )
        .route(
            "/api/v1/trace-models/{ids}",
            get(get_trace_models)
                .put(update_trace_model)
                .delete(delete_trace_models),
        )
        .with_state(state)
}

fn build_model(request: TraceModelRequest) -> ModelResult<TraceModel> {
    let mut model = resolve_trace_model(request)?;
    validate_trace_model(&mut model)?;
    Ok(model)
}

async fn create_trace_models(
    State(state): State<AppState>,
    payload: Result<Json<Vec<TraceModelRequest>>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<CreatedId>>), ApiError> {
    let Json(requests) = payload?;
    if requests.is_empty() {
        return Err(empty_batch().into());
    }
    let names: Vec<String> = requests.iter().map(|r| r.name.clone()).collect();

    let result = requests
        .into_iter()
        .map(build_model)
        .collect::<ModelResult<Vec<_>>>()
        .and_then(|models| {
            validate_trace_model_names(&models, |names| {
                state.trace_models().existing_names(names).map_err(ModelError::from)
            })?;
            let created_names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
            let ids = state.trace_models().create(models)?;
            Ok(ids.into_iter().zip(created_names).collect::<Vec<_>>())
        });

    match result {
        Ok(created) => {
            for (id, name) in &created {
                audit::record(Operation::Create, OBJECT, id, name, Ok(()));
            }
            let ids = created.into_iter().map(|(id, _)| CreatedId { id }).collect();
            Ok((StatusCode::CREATED, Json(ids)))
        }
        Err(err) => {
            for name in &names {
                audit::record(Operation::Create, OBJECT, "", name, Err(&err));
            }
            Err(err.into())
        }
    }
}

async fn list_trace_models(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListResponse<TraceModel>>, ApiError> {
    let Query(params) = params?;
    Ok(Json(list_models(state.trace_models(), params)?))
}

async fn get_trace_models(
    State(state): State<AppState>,
    ids: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<TraceModel>>, ApiError> {
    let Path(ids) = ids?;
    let ids = parse_ids(&ids)?;
    let models = read_models(&state, state.trace_models(), state.trace_reads(), &ids).await?;
    Ok(Json(models))
}

async fn update_trace_model(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<TraceModelRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(mut request) = payload?;
    request.id.clone_from(&id);
    let name = request.name.clone();

    let _guard = state.lock_model(OBJECT, &id).await;
    let result = update_locked(&state, request);

    audit::record(Operation::Update, OBJECT, &id, &name, result.as_ref().copied());
    result?;
    Ok(StatusCode::NO_CONTENT)
}

fn update_locked(state: &AppState, request: TraceModelRequest) -> ModelResult<()> {
    let existing = state.trace_models().get(&request.id)?;
    let model = build_model(request)?;

    if model.name != existing.name {
        validate_trace_model_names(std::slice::from_ref(&model), |names| {
            state.trace_models().existing_names(names).map_err(ModelError::from)
        })?;
    }

    state.trace_models().update(model)?;
    Ok(())
}

async fn delete_trace_models(
    State(state): State<AppState>,
    ids: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(ids) = ids?;
    let ids = parse_ids(&ids)?;
    delete_models(&state, state.trace_models(), &ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
