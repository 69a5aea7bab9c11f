//! Integration tests for health check and empty-store behavior.

use axum::http::StatusCode;

use super::common::{get, post_json, data_connection_trace_model, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "datamodel-api");
}

#[tokio::test]
async fn test_health_reports_model_counts() {
    let (app, _state) = test_app();

    let (status, _) = post_json(
        app.clone(),
        "/api/v1/trace-models",
        serde_json::json!([data_connection_trace_model("apm")]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, response) = get(app, "/health").await;
    assert_eq!(response["models"]["trace_models"], 1);
    assert_eq!(response["models"]["objective_models"], 0);
}

#[tokio::test]
async fn test_empty_stores_return_empty_results() {
    let (app, _state) = test_app();

    let (status, response) = get(app.clone(), "/api/v1/trace-models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);
    assert!(response["entries"].as_array().unwrap().is_empty());

    let (status, response) = get(app, "/api/v1/objective-models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);
}
