//! Integration tests for the objective model endpoints.

use axum::http::StatusCode;
use serde_json::json;

use super::common::{
    delete, get, kpi_objective_model, post_json, put_json, slo_objective_model, test_app,
};

const URI: &str = "/api/v1/objective-models";

#[tokio::test]
async fn test_slo_round_trip() {
    let (app, _state) = test_app();

    let (status, response) =
        post_json(app.clone(), URI, json!([slo_objective_model("availability", 99.0, 90)])).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = response[0]["id"].as_str().unwrap().to_string();

    let (status, response) = get(app, &format!("{URI}/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response[0]["objective_type"], "slo");
    assert_eq!(response[0]["objective_config"]["objective"], 99.0);
    assert_eq!(response[0]["objective_config"]["period"], 90);
    assert_eq!(response[0]["task"]["steps"], json!(["5m"]));
}

#[tokio::test]
async fn test_slo_objective_bounds() {
    let (app, _state) = test_app();

    for objective in [0.0, 100.5] {
        let (status, response) = post_json(
            app.clone(),
            URI,
            json!([slo_objective_model("availability", objective, 90)]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "objective {objective}");
        assert_eq!(
            response["error_code"],
            "DataModel.ObjectiveModel.InvalidParameter.Objective"
        );
    }
}

#[tokio::test]
async fn test_kpi_weights_must_sum_to_hundred() {
    let (app, _state) = test_app();

    let (status, response) =
        post_json(app.clone(), URI, json!([kpi_objective_model("latency", &[40, 40])])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.InvalidParameter.ComprehensiveWeight"
    );

    let (status, _) =
        post_json(app, URI, json!([kpi_objective_model("latency", &[60, 40])])).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_overlapping_status_ranges_rejected() {
    let (app, _state) = test_app();

    let mut model = slo_objective_model("availability", 99.0, 90);
    model["objective_config"]["status_config"] = json!({"ranges": [
        {"status": "good", "from": 99.0},
        {"status": "bad", "to": 95.0},
        {"status": "warn", "from": 94.0, "to": 99.0}
    ]});

    let (status, response) = post_json(app.clone(), URI, json!([model.clone()])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.InvalidParameter.StatusRanges"
    );

    model["objective_config"]["status_config"]["ranges"][2]["from"] = json!(95.0);
    let (status, _) = post_json(app, URI, json!([model])).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_schedule_rules_apply_to_task() {
    let (app, _state) = test_app();

    let mut model = slo_objective_model("availability", 99.0, 90);
    model["task"]["schedule"] = json!({"type": "FIX_RATE", "expression": "25d"});
    let (status, response) = post_json(app.clone(), URI, json!([model.clone()])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.InvalidParameter.ScheduleExpression"
    );

    model["task"]["schedule"] = json!({"type": "CRON", "expression": "0 0 0 1 1 * 2030"});
    let (status, response) = post_json(app.clone(), URI, json!([model.clone()])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.InvalidParameter.ScheduleExpression"
    );

    model["task"]["schedule"] = json!({"type": "FIX_RATE", "expression": "24d"});
    let (status, _) = post_json(app, URI, json!([model])).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_retrace_point_bound() {
    let (app, _state) = test_app();

    let mut model = slo_objective_model("availability", 99.0, 90);
    model["task"]["retrace_duration"] = json!("1000h");
    let (status, response) = post_json(app.clone(), URI, json!([model.clone()])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.InvalidParameter.RetraceDuration"
    );

    model["task"]["retrace_duration"] = json!("24h");
    let (status, _) = post_json(app, URI, json!([model])).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_unsupported_objective_type() {
    let (app, _state) = test_app();

    let mut model = slo_objective_model("availability", 99.0, 90);
    model["objective_type"] = json!("sla");
    let (status, response) = post_json(app, URI, json!([model])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.UnsupportObjectiveType"
    );
}

#[tokio::test]
async fn test_update_and_delete() {
    let (app, state) = test_app();

    let (_, response) =
        post_json(app.clone(), URI, json!([slo_objective_model("availability", 99.0, 90)])).await;
    let id = response[0]["id"].as_str().unwrap().to_string();

    let (status, _) = put_json(
        app.clone(),
        &format!("{URI}/{id}"),
        slo_objective_model("availability", 99.9, 30),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, response) = get(app.clone(), &format!("{URI}/{id}")).await;
    assert_eq!(response[0]["objective_config"]["objective"], 99.9);
    assert_eq!(response[0]["objective_config"]["period"], 30);

    let (status, response) = put_json(
        app.clone(),
        &format!("{URI}/{id}"),
        slo_objective_model("availability", 99.9, 0),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.InvalidParameter.Period"
    );

    let (status, _) = delete(app, &format!("{URI}/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.objective_models().count().unwrap(), 0);
}

#[tokio::test]
async fn test_names_unique_in_batch_and_store() {
    let (app, state) = test_app();
    let model = slo_objective_model("availability", 99.0, 90);

    let (status, response) =
        post_json(app.clone(), URI, json!([model.clone(), model.clone()])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.Duplicated.ModelName"
    );
    assert_eq!(state.objective_models().count().unwrap(), 0);

    let (status, _) = post_json(app.clone(), URI, json!([model.clone()])).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = post_json(app, URI, json!([model])).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.Existed.ModelName"
    );
    assert_eq!(state.objective_models().count().unwrap(), 1);
}

#[tokio::test]
async fn test_repeated_id_in_batch_rejected() {
    let (app, _state) = test_app();
    let mut first = slo_objective_model("availability", 99.0, 90);
    first["id"] = json!("slo-1");
    let mut second = slo_objective_model("latency", 99.0, 90);
    second["id"] = json!("slo-1");

    let (status, response) = post_json(app, URI, json!([first, second])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.Duplicated.ModelID"
    );
}

#[tokio::test]
async fn test_update_to_taken_name_rejected() {
    let (app, _state) = test_app();
    post_json(app.clone(), URI, json!([slo_objective_model("first", 99.0, 90)])).await;
    let (_, response) =
        post_json(app.clone(), URI, json!([slo_objective_model("second", 99.0, 90)])).await;
    let id = response[0]["id"].as_str().unwrap().to_string();

    let (status, response) = put_json(
        app.clone(),
        &format!("{URI}/{id}"),
        slo_objective_model("first", 99.0, 90),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        response["error_code"],
        "DataModel.ObjectiveModel.Existed.ModelName"
    );

    let (status, _) = put_json(
        app,
        &format!("{URI}/{id}"),
        slo_objective_model("second", 99.5, 90),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
