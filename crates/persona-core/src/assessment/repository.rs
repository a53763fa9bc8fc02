use super::session::AssessmentSession;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier handed to clients when a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage abstraction so the service can be exercised in isolation.
///
/// `modify` must apply the closure atomically with respect to other calls for
/// the same id.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, id: SessionId, session: AssessmentSession) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentSession>, RepositoryError>;
    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut AssessmentSession) -> T;
    fn remove(&self, id: &SessionId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
