use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::assessment::cognitive::derive_stack;
use crate::assessment::domain::TypeCode;
use crate::assessment::questions::QuestionBank;
use crate::assessment::report::{
    generic_profile, parse_generated, GeneratedReport, GenerationError, GenerationRequest,
    Report, ReportGenerator, ReportResolver,
};
use crate::assessment::repository::{RepositoryError, SessionId, SessionRepository};
use crate::assessment::service::AssessmentService;
use crate::assessment::session::AssessmentSession;

pub(super) fn bank() -> Arc<QuestionBank> {
    Arc::new(QuestionBank::standard().expect("embedded battery parses"))
}

pub(super) fn build_service(
    resolver: ReportResolver,
) -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(bank(), Arc::new(resolver), repository.clone());
    (service, repository)
}

pub(super) fn offline_service() -> AssessmentService<MemoryRepository> {
    build_service(ReportResolver::offline()).0
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, AssessmentSession>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, id: SessionId, session: AssessmentSession) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(id, session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentSession>, RepositoryError> {
        let guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut AssessmentSession) -> T,
    {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        let session = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        Ok(apply(session))
    }

    fn remove(&self, id: &SessionId) -> Result<bool, RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _id: SessionId, _session: AssessmentSession) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<AssessmentSession>, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn modify<T, F>(&self, _id: &SessionId, _apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut AssessmentSession) -> T,
    {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }
}

/// Complete generator payload for `code`, as JSON.
pub(super) fn generated_payload(code: TypeCode) -> Value {
    let report = Report::assemble(code, generic_profile(code), &derive_stack(code));
    serde_json::to_value(report).expect("serialize report")
}

pub(super) fn generated_report(code: TypeCode) -> GeneratedReport {
    GeneratedReport::from(Report::assemble(
        code,
        generic_profile(code),
        &derive_stack(code),
    ))
}

/// How a [`FailingGenerator`] misbehaves.
#[derive(Debug, Clone, Copy)]
pub(super) enum Failure {
    Status,
    Empty,
    Garbled,
    Partial,
    MissingFunctions,
    BlankFunctions,
}

#[derive(Debug)]
pub(super) struct FailingGenerator(pub(super) Failure);

#[async_trait]
impl ReportGenerator for FailingGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedReport, GenerationError> {
        match self.0 {
            Failure::Status => Err(GenerationError::Status(503)),
            Failure::Empty => parse_generated("   "),
            Failure::Garbled => parse_generated("{\"typeName\": "),
            Failure::Partial => parse_generated(r#"{"typeName":"The Partial","summary":"x"}"#),
            Failure::MissingFunctions => {
                let mut payload = generated_payload(request.type_code);
                if let Some(fields) = payload.as_object_mut() {
                    fields.remove("cognitiveFunctions");
                }
                parse_generated(&payload.to_string())
            }
            Failure::BlankFunctions => {
                let mut payload = generated_payload(request.type_code);
                payload["cognitiveFunctions"]["explanation"] = "".into();
                parse_generated(&payload.to_string())
            }
        }
    }
}

/// Answers with a fixed, schema-valid profile and records every request.
#[derive(Debug, Default)]
pub(super) struct ScriptedGenerator {
    pub(super) requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub(super) fn calls(&self) -> usize {
        self.requests.lock().expect("generator mutex poisoned").len()
    }
}

#[async_trait]
impl ReportGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedReport, GenerationError> {
        self.requests
            .lock()
            .expect("generator mutex poisoned")
            .push(request.clone());
        let mut report = generated_report(request.type_code);
        report.profile.type_name = format!("The Generated {}", request.type_code);
        Ok(report)
    }
}

/// Blocks inside `generate` until released, so tests can act while a
/// submission is resolving.
#[derive(Debug, Default)]
pub(super) struct GatedGenerator {
    pub(super) entered: Notify,
    pub(super) release: Notify,
}

#[async_trait]
impl ReportGenerator for GatedGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedReport, GenerationError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(generated_report(request.type_code))
    }
}

pub(super) fn code(value: &str) -> TypeCode {
    value.parse().expect("valid type code")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
