use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::Question;
use super::questions::QuestionBank;
use super::report::ReportResolver;
use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::session::{AssessmentOutcome, AssessmentSession, SessionError, SessionSnapshot};

/// Service composing the question bank, report resolver, and session storage.
pub struct AssessmentService<S> {
    bank: Arc<QuestionBank>,
    resolver: Arc<ReportResolver>,
    sessions: Arc<S>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<S> AssessmentService<S>
where
    S: SessionRepository + 'static,
{
    pub fn new(bank: Arc<QuestionBank>, resolver: Arc<ReportResolver>, sessions: Arc<S>) -> Self {
        Self {
            bank,
            resolver,
            sessions,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn resolver(&self) -> &ReportResolver {
        &self.resolver
    }

    /// Questions on `page`, or the whole battery when `page` is `None`.
    pub fn questions(&self, page: Option<usize>) -> &[Question] {
        match page {
            Some(page) => self.bank.page(page),
            None => self.bank.questions(),
        }
    }

    /// Open a new session in the `Reset` phase.
    pub fn start(&self) -> Result<(SessionId, SessionSnapshot), AssessmentServiceError> {
        let id = next_session_id();
        let session = AssessmentSession::new();
        let snapshot = session.snapshot(&self.bank);
        self.sessions.insert(id.clone(), session)?;
        debug!(session = %id, "assessment session started");
        Ok((id, snapshot))
    }

    /// Upsert one answer.
    pub fn record(
        &self,
        id: &SessionId,
        question_id: u32,
        value: i8,
    ) -> Result<SessionSnapshot, AssessmentServiceError> {
        let bank = &self.bank;
        let snapshot = self.sessions.modify(id, |session| {
            session.record(bank, question_id, value)?;
            Ok::<_, SessionError>(session.snapshot(bank))
        })??;
        Ok(snapshot)
    }

    /// Score, classify, then resolve the report.
    ///
    /// The session is locked in `Resolving` before the report call starts and
    /// the store is not held across the await. Resolution and completion run
    /// on their own task, so a caller that stops waiting does not strand the
    /// session: the task still stores the outcome. A reset during resolution
    /// makes the result stale and it is dropped.
    pub async fn submit(
        &self,
        id: &SessionId,
    ) -> Result<AssessmentOutcome, AssessmentServiceError> {
        let bank = &self.bank;
        let ticket = self
            .sessions
            .modify(id, |session| session.begin_submit(bank))??;
        debug!(
            session = %id,
            code = %ticket.type_code,
            scores = ?ticket.scores,
            "assessment scored"
        );

        let resolver = Arc::clone(&self.resolver);
        let sessions = Arc::clone(&self.sessions);
        let session_id = id.clone();
        let resolution = tokio::spawn(async move {
            let resolution = resolver.resolve(ticket.scores, ticket.type_code).await;
            let outcome = AssessmentOutcome::new(&ticket, resolution);

            let stored = outcome.clone();
            let completion = sessions.modify(&session_id, move |session| {
                session.complete(&ticket, stored)
            })?;
            if let Err(err) = completion {
                warn!(session = %session_id, error = %err, "discarding report resolution");
                return Err(err.into());
            }
            Ok::<_, AssessmentServiceError>(outcome)
        });

        resolution.await?
    }

    /// Drops the session from the store. Returns `NotFound` for unknown ids.
    pub fn discard(&self, id: &SessionId) -> Result<(), AssessmentServiceError> {
        if !self.sessions.remove(id)? {
            return Err(RepositoryError::NotFound.into());
        }
        debug!(session = %id, "assessment session discarded");
        Ok(())
    }

    pub fn reset(&self, id: &SessionId) -> Result<SessionSnapshot, AssessmentServiceError> {
        let bank = &self.bank;
        let snapshot = self.sessions.modify(id, |session| {
            session.reset();
            session.snapshot(bank)
        })?;
        Ok(snapshot)
    }

    pub fn snapshot(&self, id: &SessionId) -> Result<SessionSnapshot, AssessmentServiceError> {
        let session = self
            .sessions
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(session.snapshot(&self.bank))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("report resolution task failed: {0}")]
    Resolution(#[from] tokio::task::JoinError),
}
