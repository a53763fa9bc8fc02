use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::assessment::report::ReportResolver;
use crate::assessment::router::{assessment_router, record_handler, start_handler, RecordRequest};
use crate::assessment::service::AssessmentService;

fn router() -> axum::Router {
    assessment_router(Arc::new(offline_service()))
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn questions_route_pages_the_battery() {
    let response = router()
        .oneshot(empty_request("GET", "/api/v1/questions?page=2"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["pageCount"], 12);
    assert_eq!(payload["perPage"], 10);
    let questions = payload["questions"].as_array().expect("questions array");
    assert_eq!(questions.len(), 10);
    assert_eq!(questions[0]["id"], 21);
}

#[tokio::test]
async fn questions_route_past_the_end_is_empty() {
    let response = router()
        .oneshot(empty_request("GET", "/api/v1/questions?page=40"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["questions"], json!([]));
}

#[tokio::test]
async fn stack_route_derives_functions() {
    let response = router()
        .oneshot(empty_request("GET", "/api/v1/types/intj/stack"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["typeCode"], "INTJ");
    assert_eq!(payload["stack"]["dominant"], "Ni");
    assert_eq!(payload["stack"]["inferior"], "Se");
    assert_eq!(payload["functions"]["auxiliary"], "Extraverted Thinking");
}

#[tokio::test]
async fn stack_route_rejects_malformed_codes() {
    let response = router()
        .oneshot(empty_request("GET", "/api/v1/types/XYZW/stack"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().expect("message").contains("XYZW"));
}

#[tokio::test]
async fn dimensions_route_lists_sliders_in_order() {
    let response = router()
        .oneshot(empty_request("GET", "/api/v1/dimensions"))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    let labels: Vec<&str> = payload
        .as_array()
        .expect("array")
        .iter()
        .map(|slider| slider["label"].as_str().expect("label"))
        .collect();
    assert_eq!(labels, ["Mind", "Energy", "Nature", "Tactics"]);
}

#[tokio::test]
async fn full_lifecycle_over_http() {
    let router = router();

    let response = router
        .clone()
        .oneshot(empty_request("POST", "/api/v1/assessments"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let session_id = payload["sessionId"].as_str().expect("session id").to_string();
    assert_eq!(payload["session"]["phase"], "reset");

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/assessments/{session_id}/responses"),
            json!({ "questionId": 1, "value": -3 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["phase"], "collecting");
    assert_eq!(payload["answered"], 1);
    assert_eq!(payload["completedPages"], json!([]));

    let response = router
        .clone()
        .oneshot(empty_request(
            "POST",
            &format!("/api/v1/assessments/{session_id}/submit"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["typeCode"], "ENFP");
    assert_eq!(payload["scores"]["Extraversion"], 100);
    assert_eq!(payload["source"], "catalog");
    assert_eq!(payload["report"]["typeCode"], "ENFP");
    assert!(payload["report"]["cognitiveFunctions"]["dominant"].is_string());

    let response = router
        .clone()
        .oneshot(empty_request(
            "POST",
            &format!("/api/v1/assessments/{session_id}/submit"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .clone()
        .oneshot(empty_request(
            "POST",
            &format!("/api/v1/assessments/{session_id}/reset"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["phase"], "reset");
    assert!(payload.get("outcome").is_none());

    let response = router
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/assessments/{session_id}"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["generation"], 1);
}

#[tokio::test]
async fn delete_discards_the_session() {
    let router = router();

    let response = router
        .clone()
        .oneshot(empty_request("POST", "/api/v1/assessments"))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    let session_id = payload["sessionId"].as_str().expect("session id").to_string();
    let uri = format!("/api/v1/assessments/{session_id}");

    let response = router
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .clone()
        .oneshot(empty_request("GET", &uri))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_sessions_return_not_found() {
    let response = router()
        .oneshot(empty_request("GET", "/api/v1/assessments/session-nope"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn record_handler_rejects_out_of_range_values() {
    let service = Arc::new(offline_service());
    let (id, _) = service.start().expect("session starts");

    let response = record_handler::<MemoryRepository>(
        State(service),
        Path(id.0),
        axum::Json(RecordRequest {
            question_id: 1,
            value: 9,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn start_handler_returns_internal_error_on_storage_failure() {
    let service = Arc::new(AssessmentService::new(
        bank(),
        Arc::new(ReportResolver::offline()),
        Arc::new(UnavailableRepository),
    ));

    let response = start_handler::<UnavailableRepository>(State(service)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("message")
        .contains("offline"));
}
