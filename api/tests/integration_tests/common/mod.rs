//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup, HTTP request helpers and request fixtures.

#![allow(dead_code)]

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};

/// Creates a test router with fresh in-memory stores.
///
/// # Returns
///
/// A tuple containing the configured router and the app state.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::with_in_memory_store();
    let router = create_router(state.clone());
    (router, state)
}

/// Sends a request and returns the status and parsed JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_string(&body).unwrap())
        }
        None => Body::empty(),
    };

    let response = tower::ServiceExt::oneshot(app, builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with JSON body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Helper to make a PUT request with JSON body.
pub async fn put_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

/// Helper to make a GET request.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

/// Helper to make a DELETE request.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}

/// A trace model backed by a data view, with a complete set of attributes.
pub fn data_view_trace_model(name: &str) -> Value {
    json!({
        "name": name,
        "tags": [" apm ", "prod"],
        "comment": "checkout traces",
        "span_source_type": "data_view",
        "span_config": {
            "data_view": {"id": "dv-1", "name": "spans"},
            "basic_attributes": {
                "trace_id": {"field_name": "trace_id"},
                "span_id": {"field_names": ["span_id"]},
                "parent_span_id": [{"field_names": ["parent_id"]}],
                "name": {"field_name": "name"},
                "start_time": {"field_name": "start", "field_format": "unix_millis"},
                "service_name": {"field_name": "service"},
                "duration": {"field_name": "duration", "field_unit": "ms"}
            }
        },
        "enabled_related_log": 1,
        "related_log_source_type": "data_view",
        "related_log_config": {
            "data_view": {"id": "dv-logs", "name": "logs"},
            "trace_id": {"field_name": "trace_id"},
            "span_id": {"field_names": ["span_id"]}
        }
    })
}

/// A trace model backed by a data connection.
pub fn data_connection_trace_model(name: &str) -> Value {
    json!({
        "name": name,
        "span_source_type": "data_connection",
        "span_config": {"data_connection": {"id": "dc-1", "name": "apm"}},
        "enabled_related_log": 0
    })
}

/// An SLO objective model with the given objective and period.
pub fn slo_objective_model(name: &str, objective: f64, period: i64) -> Value {
    json!({
        "name": name,
        "objective_type": "slo",
        "objective_config": {
            "objective": objective,
            "period": period,
            "good_metric_model": {"id": "1"},
            "total_metric_model": {"id": "2"}
        },
        "task": {
            "schedule": {"type": "FIX_RATE", "expression": "5m"},
            "steps": ["5m"],
            "index_base": "objective"
        }
    })
}

/// A KPI objective model with the given comprehensive weights.
pub fn kpi_objective_model(name: &str, weights: &[i64]) -> Value {
    let models: Vec<Value> = weights
        .iter()
        .enumerate()
        .map(|(i, weight)| json!({"id": format!("m{i}"), "weight": weight}))
        .collect();

    json!({
        "name": name,
        "objective_type": "kpi",
        "objective_config": {
            "objective": 80.0,
            "unit": "%",
            "comprehensive_metric_models": models
        },
        "task": {
            "schedule": {"type": "CRON", "expression": "0 */5 * * * *"},
            "steps": ["5m", "1h"],
            "index_base": "objective"
        }
    })
}
