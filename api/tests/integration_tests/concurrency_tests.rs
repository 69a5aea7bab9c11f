//! Integration tests for concurrent access to the same model.

use axum::http::StatusCode;
use serde_json::json;

use super::common::{data_connection_trace_model, get, post_json, put_json, test_app};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_and_reads_of_one_model() {
    let (app, state) = test_app();

    let (status, response) = post_json(
        app.clone(),
        "/api/v1/trace-models",
        json!([data_connection_trace_model("apm")]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = response[0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/trace-models/{id}");

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        let uri = uri.clone();
        handles.push(tokio::spawn(async move {
            let mut model = data_connection_trace_model("apm");
            model["comment"] = json!(format!("revision {i}"));
            put_json(app, &uri, model).await.0
        }));
    }
    for _ in 0..8 {
        let app = app.clone();
        let uri = uri.clone();
        handles.push(tokio::spawn(async move { get(app, &uri).await.0 }));
    }

    for handle in handles {
        let status = handle.await.unwrap();
        assert!(
            status == StatusCode::NO_CONTENT || status == StatusCode::OK,
            "unexpected status {status}"
        );
    }

    let (status, response) = get(app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response[0]["comment"]
        .as_str()
        .unwrap()
        .starts_with("revision "));

    assert_eq!(state.locked_models(), 0);
    assert_eq!(state.trace_reads().inflight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_of_missing_model_all_fail() {
    let (app, _state) = test_app();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { get(app, "/api/v1/trace-models/ghost").await })
        })
        .collect();

    for handle in handles {
        let (status, response) = handle.await.unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response["error_code"], "DataModel.TraceModel.NotFound");
    }
}
