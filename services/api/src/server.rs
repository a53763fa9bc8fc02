use crate::cli::ServeArgs;
use crate::infra::{build_resolver, AppState, InMemorySessionRepository};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use persona_core::assessment::{AssessmentService, QuestionBank};
use persona_core::config::AppConfig;
use persona_core::error::AppError;
use persona_core::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let bank = Arc::new(QuestionBank::standard()?);
    let resolver = Arc::new(build_resolver(&config.generator));
    let sessions = Arc::new(InMemorySessionRepository::default());
    let assessment_service = Arc::new(AssessmentService::new(bank, resolver, sessions));

    let app = with_service_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "personality assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
