use metrics_exporter_prometheus::PrometheusHandle;
use persona_core::assessment::{
    AssessmentSession, HttpReportGenerator, ReportResolver, RepositoryError, SessionId,
    SessionRepository,
};
use persona_core::config::GeneratorConfig;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, AssessmentSession>>>,
}

impl InMemorySessionRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, AssessmentSession>>, RepositoryError> {
        self.sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store lock poisoned".to_string()))
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, id: SessionId, session: AssessmentSession) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(id, session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentSession>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut AssessmentSession) -> T,
    {
        let mut guard = self.lock()?;
        let session = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        Ok(apply(session))
    }

    fn remove(&self, id: &SessionId) -> Result<bool, RepositoryError> {
        let mut guard = self.lock()?;
        Ok(guard.remove(id).is_some())
    }
}

/// Resolver wired to the configured generator, or catalog-only when none is
/// configured or the client cannot be built.
pub(crate) fn build_resolver(config: &GeneratorConfig) -> ReportResolver {
    if !config.is_enabled() {
        info!("report generator not configured; serving catalog reports");
        return ReportResolver::offline();
    }

    match HttpReportGenerator::from_config(config) {
        Ok(generator) => {
            info!(endpoint = generator.endpoint(), "report generator enabled");
            ReportResolver::with_generator(Arc::new(generator))
        }
        Err(err) => {
            warn!(error = %err, "report generator unavailable; serving catalog reports");
            ReportResolver::offline()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn repository_rejects_duplicate_ids() {
        let repository = InMemorySessionRepository::default();
        let id = SessionId("session-1".to_string());
        repository
            .insert(id.clone(), AssessmentSession::new())
            .expect("first insert");
        assert_eq!(
            repository.insert(id.clone(), AssessmentSession::new()),
            Err(RepositoryError::Conflict)
        );
        assert!(repository.remove(&id).expect("remove"));
        assert!(!repository.remove(&id).expect("remove again"));
    }

    #[test]
    fn modify_reports_missing_sessions() {
        let repository = InMemorySessionRepository::default();
        let missing = SessionId("session-404".to_string());
        assert_eq!(
            repository.modify(&missing, |session| session.generation()),
            Err(RepositoryError::NotFound)
        );
    }

    #[test]
    fn resolver_follows_generator_config() {
        assert!(!build_resolver(&GeneratorConfig::disabled()).has_generator());

        let config = GeneratorConfig {
            endpoint: Some("http://127.0.0.1:9/reports".to_string()),
            api_key: None,
            timeout: Duration::from_secs(2),
        };
        assert!(build_resolver(&config).has_generator());
    }
}
