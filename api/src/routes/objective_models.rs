//! Objective model endpoints.

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
use shared::models::{ObjectiveModel, ObjectiveModelRequest};
use shared::validation::{validate_objective_model, validate_objective_model_names};

const OBJECT: ObjectKind = ObjectKind::ObjectiveModel;

/// Creates the objective model routes.
pub fn objective_model_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/objective-models",
            post(create_objective_models).get(list_objective_models),
        )
        .route(
            "/api/v1/objective-models/{ids}",
            get(get_objective_models)
                .put(update_objective_model)
                .delete(delete_objective_models),
        )
        .with_state(state)
}

async fn create_objective_models(
    State(state): State<AppState>,
    payload: Result<Json<Vec<ObjectiveModelRequest>>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<CreatedId>>), ApiError> {
    let Json(requests) = payload?;
    if requests.is_empty() {
        return Err(empty_batch().into());
    }
    let names: Vec<String> = requests.iter().map(|r| r.name.clone()).collect();

    let result = requests
        .into_iter()
        .map(validate_objective_model)
        .collect::<ModelResult<Vec<_>>>()
        .and_then(|models| {
            validate_objective_model_names(&models, |names| {
                state.objective_models().existing_names(names).map_err(ModelError::from)
            })?;
            let created_names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
            let ids = state.objective_models().create(models)?;
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

async fn list_objective_models(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListResponse<ObjectiveModel>>, ApiError> {
    let Query(params) = params?;
    Ok(Json(list_models(state.objective_models(), params)?))
}

async fn get_objective_models(
    State(state): State<AppState>,
    ids: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<ObjectiveModel>>, ApiError> {
    let Path(ids) = ids?;
    let ids = parse_ids(&ids)?;
    let models =
        read_models(&state, state.objective_models(), state.objective_reads(), &ids).await?;
    Ok(Json(models))
}

async fn update_objective_model(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ObjectiveModelRequest>, JsonRejection>,
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

fn update_locked(state: &AppState, request: ObjectiveModelRequest) -> ModelResult<()> {
    let existing = state.objective_models().get(&request.id)?;
    let model = validate_objective_model(request)?;

    if model.name != existing.name {
        validate_objective_model_names(std::slice::from_ref(&model), |names| {
            state.objective_models().existing_names(names).map_err(ModelError::from)
        })?;
    }

    state.objective_models().update(model)?;
    Ok(())
}

async fn delete_objective_models(
    State(state): State<AppState>,
    ids: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(ids) = ids?;
    let ids = parse_ids(&ids)?;
    delete_models(&state, state.objective_models(), &ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
