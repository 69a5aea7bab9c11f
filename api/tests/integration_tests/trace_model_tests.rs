//! Integration tests for the trace model endpoints.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{
    data_connection_trace_model, data_view_trace_model, delete, get, post_json, put_json, test_app,
};

async fn create_one(app: axum::Router, model: Value) -> String {
    let (status, response) = post_json(app, "/api/v1/trace-models", json!([model])).await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    response[0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_and_get_data_view_model() {
    let (app, _state) = test_app();
    let id = create_one(app.clone(), data_view_trace_model("checkout")).await;

    let (status, response) = get(app, &format!("/api/v1/trace-models/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let model = &response[0];
    assert_eq!(model["id"], id.as_str());
    assert_eq!(model["name"], "checkout");
    assert_eq!(model["tags"], json!(["apm", "prod"]));
    assert_eq!(model["span_config"]["data_view"]["name"], "spans");
    assert_eq!(model["related_log_source_type"], "data_view");
    assert_eq!(model["related_log_config"]["trace_id"]["field_name"], "trace_id");
}

#[tokio::test]
async fn test_data_connection_model_has_no_basic_attributes() {
    let (app, _state) = test_app();
    let mut model = data_connection_trace_model("apm");
    model["span_config"]["basic_attributes"] = json!({"trace_id": {"field_name": "t"}});

    let id = create_one(app.clone(), model).await;
    let (_, response) = get(app, &format!("/api/v1/trace-models/{id}")).await;

    assert!(response[0]["span_config"].get("basic_attributes").is_none());
    assert_eq!(response[0]["span_config"]["data_connection"]["id"], "dc-1");
}

#[tokio::test]
async fn test_disabled_related_log_is_cleared() {
    let (app, _state) = test_app();
    let mut model = data_view_trace_model("checkout");
    model["enabled_related_log"] = json!(0);

    let id = create_one(app.clone(), model).await;
    let (_, response) = get(app, &format!("/api/v1/trace-models/{id}")).await;

    assert_eq!(response[0]["enabled_related_log"], 0);
    assert_eq!(response[0]["related_log_source_type"], "");
    assert_eq!(response[0]["related_log_config"], json!({}));
}

#[tokio::test]
async fn test_disabling_related_log_on_update_clears_stored_config() {
    let (app, _state) = test_app();
    let id = create_one(app.clone(), data_view_trace_model("checkout")).await;
    let uri = format!("/api/v1/trace-models/{id}");

    let (_, response) = get(app.clone(), &uri).await;
    assert_eq!(response[0]["related_log_source_type"], "data_view");

    let mut model = data_view_trace_model("checkout");
    model["enabled_related_log"] = json!(0);
    let (status, _) = put_json(app.clone(), &uri, model).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, response) = get(app, &uri).await;
    assert_eq!(response[0]["enabled_related_log"], 0);
    assert_eq!(response[0]["related_log_source_type"], "");
    assert_eq!(response[0]["related_log_config"], json!({}));
}

#[tokio::test]
async fn test_both_end_time_and_duration_rejected() {
    let (app, state) = test_app();
    let mut model = data_view_trace_model("checkout");
    model["span_config"]["basic_attributes"]["end_time"] =
        json!({"field_name": "end", "field_format": "unix_millis"});

    let (status, response) = post_json(app, "/api/v1/trace-models", json!([model])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.TraceModel.InvalidBasicAttributeConfig"
    );
    assert!(response["error_details"]
        .as_str()
        .unwrap()
        .contains("Both end_time and duration are configured"));
    assert_eq!(state.trace_models().count().unwrap(), 0);
}

#[tokio::test]
async fn test_field_condition_needs_string_value() {
    let (app, _state) = test_app();
    let mut model = data_view_trace_model("checkout");
    model["span_config"]["basic_attributes"]["parent_span_id"] = json!([{
        "precond": {"name": "kind", "operation": "==", "value_from": "field", "value": 3},
        "field_names": ["parent_id"]
    }]);

    let (status, response) = post_json(app, "/api/v1/trace-models", json!([model])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error_details"]
        .as_str()
        .unwrap()
        .contains("value_from is field"));
}

#[tokio::test]
async fn test_duplicate_names_rejected() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app.clone(),
        "/api/v1/trace-models",
        json!([data_connection_trace_model("apm"), data_connection_trace_model("apm")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.TraceModel.NotUniqueInBatch.ModelName"
    );

    create_one(app.clone(), data_connection_trace_model("apm")).await;
    let (status, response) = post_json(
        app,
        "/api/v1/trace-models",
        json!([data_connection_trace_model("apm")]),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error_code"], "DataModel.TraceModel.Existed.ModelName");
}

#[tokio::test]
async fn test_invalid_id_rejected() {
    let (app, _state) = test_app();
    let mut model = data_connection_trace_model("apm");
    model["id"] = json!("Not Valid!");

    let (status, response) = post_json(app, "/api/v1/trace-models", json!([model])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error_code"], "DataModel.TraceModel.InvalidParameter.ID");
}

#[tokio::test]
async fn test_update_replaces_model() {
    let (app, _state) = test_app();
    let id = create_one(app.clone(), data_connection_trace_model("apm")).await;

    let mut changed = data_connection_trace_model("apm-renamed");
    changed["comment"] = json!("moved");
    let (status, _) = put_json(app.clone(), &format!("/api/v1/trace-models/{id}"), changed).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, response) = get(app, &format!("/api/v1/trace-models/{id}")).await;
    assert_eq!(response[0]["name"], "apm-renamed");
    assert_eq!(response[0]["comment"], "moved");
}

#[tokio::test]
async fn test_update_unknown_model_is_not_found() {
    let (app, _state) = test_app();

    let (status, response) = put_json(
        app,
        "/api/v1/trace-models/ghost",
        data_connection_trace_model("apm"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error_code"], "DataModel.TraceModel.NotFound");
}

#[tokio::test]
async fn test_update_to_taken_name_rejected() {
    let (app, _state) = test_app();
    create_one(app.clone(), data_connection_trace_model("first")).await;
    let id = create_one(app.clone(), data_connection_trace_model("second")).await;

    let (status, response) = put_json(
        app,
        &format!("/api/v1/trace-models/{id}"),
        data_connection_trace_model("first"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error_code"], "DataModel.TraceModel.Existed.ModelName");
}

#[tokio::test]
async fn test_list_filters_by_name() {
    let (app, _state) = test_app();
    let (status, _) = post_json(
        app.clone(),
        "/api/v1/trace-models",
        json!([
            data_connection_trace_model("orders-api"),
            data_connection_trace_model("orders-db"),
            data_connection_trace_model("payments")
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = get(app.clone(), "/api/v1/trace-models?name_pattern=orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 2);

    let (_, response) = get(app, "/api/v1/trace-models?limit=1&offset=2").await;
    assert_eq!(response["total_count"], 3);
    assert_eq!(response["entries"][0]["name"], "payments");
}

#[tokio::test]
async fn test_delete_is_all_or_nothing() {
    let (app, state) = test_app();
    let first = create_one(app.clone(), data_connection_trace_model("a")).await;
    let second = create_one(app.clone(), data_connection_trace_model("b")).await;

    let (status, _) = delete(app.clone(), &format!("/api/v1/trace-models/{first},missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(state.trace_models().count().unwrap(), 2);

    let (status, _) = delete(app.clone(), &format!("/api/v1/trace-models/{first},{second}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.trace_models().count().unwrap(), 0);

    let (status, _) = get(app, &format!("/api/v1/trace-models/{first}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
