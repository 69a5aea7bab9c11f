//! HTTP rendering of model errors.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::error::{ErrorKind, ModelError, INVALID_REQUEST_BODY};

/// Error body returned by every model endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Dotted error code, e.g. `DataModel.TraceModel.NullParameter.Name`.
    pub error_code: String,
    /// Short description of the error kind.
    pub description: String,
    /// Details about this occurrence.
    pub error_details: String,
}

/// A [`ModelError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ModelError);

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(invalid_request(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(invalid_request(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(invalid_request(rejection.body_text()))
    }
}

fn invalid_request(details: String) -> ModelError {
    ModelError::with_code(ErrorKind::InvalidParameter, INVALID_REQUEST_BODY).with_details(details)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error_code: self.0.code,
            description: self.0.kind.description().to_string(),
            error_details: self.0.details,
        };
        (status, Json(body)).into_response()
    }
}
