use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::cognitive::{derive_stack, CognitiveStack};
use super::domain::{Dimension, DimensionSlider, Question, TypeCode};
use super::questions::QUESTIONS_PER_PAGE;
use super::report::CognitiveFunctionsBlock;
use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::service::{AssessmentService, AssessmentServiceError};
use super::session::SessionError;

/// Router builder exposing the assessment lifecycle over HTTP.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/questions", get(questions_handler::<S>))
        .route("/api/v1/dimensions", get(dimensions_handler))
        .route("/api/v1/types/:code/stack", get(stack_handler))
        .route("/api/v1/assessments", post(start_handler::<S>))
        .route(
            "/api/v1/assessments/:session_id",
            get(snapshot_handler::<S>).delete(discard_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/responses",
            put(record_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/submit",
            post(submit_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/reset",
            post(reset_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QuestionsQuery {
    pub(crate) page: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionsView<'a> {
    pub(crate) page: Option<usize>,
    pub(crate) page_count: usize,
    pub(crate) per_page: usize,
    pub(crate) questions: &'a [Question],
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordRequest {
    pub(crate) question_id: u32,
    pub(crate) value: i8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StackView {
    pub(crate) type_code: TypeCode,
    pub(crate) stack: CognitiveStack,
    pub(crate) functions: CognitiveFunctionsBlock,
}

pub(crate) async fn questions_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Query(query): Query<QuestionsQuery>,
) -> Response
where
    S: SessionRepository + 'static,
{
    let view = QuestionsView {
        page: query.page,
        page_count: service.bank().page_count(),
        per_page: QUESTIONS_PER_PAGE,
        questions: service.questions(query.page),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn dimensions_handler() -> Json<Vec<DimensionSlider>> {
    Json(
        Dimension::ordered()
            .into_iter()
            .map(Dimension::slider)
            .collect(),
    )
}

pub(crate) async fn stack_handler(Path(code): Path<String>) -> Response {
    match code.parse::<TypeCode>() {
        Ok(type_code) => {
            let stack = derive_stack(type_code);
            let functions = CognitiveFunctionsBlock::from(&stack);
            let view = StackView {
                type_code,
                stack,
                functions,
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

pub(crate) async fn start_handler<S>(State(service): State<Arc<AssessmentService<S>>>) -> Response
where
    S: SessionRepository + 'static,
{
    match service.start() {
        Ok((session_id, snapshot)) => (
            StatusCode::CREATED,
            Json(json!({ "sessionId": session_id, "session": snapshot })),
        )
            .into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionRepository + 'static,
{
    match service.snapshot(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn record_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<RecordRequest>,
) -> Response
where
    S: SessionRepository + 'static,
{
    match service.record(&SessionId(session_id), request.question_id, request.value) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionRepository + 'static,
{
    match service.submit(&SessionId(session_id)).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn reset_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionRepository + 'static,
{
    match service.reset(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn discard_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionRepository + 'static,
{
    match service.discard(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(err: AssessmentServiceError) -> Response {
    let status = match &err {
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_))
        | AssessmentServiceError::Resolution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AssessmentServiceError::Session(SessionError::Response(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessmentServiceError::Session(_) => StatusCode::CONFLICT,
    };
    error_response(status, err.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
