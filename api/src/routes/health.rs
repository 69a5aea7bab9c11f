//! Health check endpoint.
//!
//! Reports liveness plus the number of stored models, so a probe also
//! exercises both stores.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

/// Number of stored models per kind.
#[derive(Debug, Serialize)]
pub struct ModelCounts {
    /// Stored trace models.
    pub trace_models: usize,
    /// Stored objective models.
    pub objective_models: usize,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when a store cannot be read.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Stored model counts; absent when degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<ModelCounts>,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let counts = state
        .trace_models()
        .count()
        .and_then(|trace_models| {
            Ok(ModelCounts {
                trace_models,
                objective_models: state.objective_models().count()?,
            })
        });

    let (status, label, models) = match counts {
        Ok(counts) => (StatusCode::OK, "healthy", Some(counts)),
        Err(err) => {
            tracing::error!(error = %err, "Health check could not read the stores");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", None)
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            service: "datamodel-api",
            version: env!("CARGO_PKG_VERSION"),
            models,
        }),
    )
}
