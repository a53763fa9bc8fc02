use crate::assessment::{
    AssessmentServiceError, QuestionBankError, RepositoryError, ResponseImportError,
    SessionError, TypeCodeError,
};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    QuestionBank(QuestionBankError),
    Import(ResponseImportError),
    Assessment(AssessmentServiceError),
    TypeCode(TypeCodeError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::QuestionBank(err) => write!(f, "question bank error: {}", err),
            AppError::Import(err) => write!(f, "answer import error: {}", err),
            AppError::Assessment(err) => write!(f, "assessment error: {}", err),
            AppError::TypeCode(err) => write!(f, "type code error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::QuestionBank(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Assessment(err) => Some(err),
            AppError::TypeCode(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Import(_) | AppError::TypeCode(_) => StatusCode::BAD_REQUEST,
            AppError::Assessment(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Assessment(AssessmentServiceError::Session(SessionError::Response(_))) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Assessment(AssessmentServiceError::Session(_))
            | AppError::Assessment(AssessmentServiceError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::QuestionBank(_)
            | AppError::Assessment(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<QuestionBankError> for AppError {
    fn from(value: QuestionBankError) -> Self {
        Self::QuestionBank(value)
    }
}

impl From<ResponseImportError> for AppError {
    fn from(value: ResponseImportError) -> Self {
        Self::Import(value)
    }
}

impl From<AssessmentServiceError> for AppError {
    fn from(value: AssessmentServiceError) -> Self {
        Self::Assessment(value)
    }
}

impl From<TypeCodeError> for AppError {
    fn from(value: TypeCodeError) -> Self {
        Self::TypeCode(value)
    }
}
