use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use persona_core::assessment::report::generic_profile;
use persona_core::assessment::{
    derive_stack, GenerationError, GenerationRequest, HttpReportGenerator, Report,
    ReportGenerator, ReportResolver, ReportSource, TraitScores, TypeCode,
};
use persona_core::config::GeneratorConfig;
use serde_json::Value;

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server runs");
    });
    addr
}

fn generator_for(addr: SocketAddr) -> HttpReportGenerator {
    HttpReportGenerator::from_config(&GeneratorConfig {
        endpoint: Some(format!("http://{addr}/reports")),
        api_key: Some("test-key".to_string()),
        timeout: Duration::from_secs(5),
    })
    .expect("client builds")
}

fn code() -> TypeCode {
    "INFJ".parse().expect("valid code")
}

#[tokio::test]
async fn posts_scores_and_parses_the_profile() {
    let router = Router::new().route(
        "/reports",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(
                headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok()),
                Some("Bearer test-key")
            );
            assert_eq!(body["typeCode"], "INFJ");
            assert_eq!(body["scores"]["Judging"], 70);
            let code: TypeCode = "INFJ".parse().expect("valid code");
            let mut profile = generic_profile(code);
            profile.type_name = "The Remote Advocate".to_string();
            Json(Report::assemble(code, profile, &derive_stack(code)))
        }),
    );
    let addr = spawn(router).await;

    let mut scores = TraitScores::neutral();
    scores.judging = 70;
    let generated = generator_for(addr)
        .generate(&GenerationRequest::new(scores, code()))
        .await
        .expect("generation succeeds");
    assert_eq!(generated.profile.type_name, "The Remote Advocate");
    assert_eq!(generated.cognitive_functions.dominant, "Introverted Intuition");
}

#[tokio::test]
async fn error_statuses_are_reported() {
    let router = Router::new().route(
        "/reports",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let addr = spawn(router).await;

    let result = generator_for(addr)
        .generate(&GenerationRequest::new(TraitScores::neutral(), code()))
        .await;
    assert!(matches!(result, Err(GenerationError::Status(502))));
}

#[tokio::test]
async fn resolver_falls_back_when_the_service_returns_garbage() {
    let router = Router::new().route("/reports", post(|| async { "<html>oops</html>" }));
    let addr = spawn(router).await;

    let resolver = ReportResolver::with_generator(Arc::new(generator_for(addr)));
    let resolution = resolver.resolve(TraitScores::neutral(), code()).await;

    assert_eq!(resolution.source, ReportSource::Catalog);
    assert!(resolution.report.validate().is_ok());
}

#[tokio::test]
async fn unreachable_endpoints_are_transport_errors() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let result = generator_for(addr)
        .generate(&GenerationRequest::new(TraitScores::neutral(), code()))
        .await;
    assert!(matches!(result, Err(GenerationError::Transport(_))));
}

#[tokio::test]
async fn profiles_without_a_functions_block_fall_back_to_the_catalog() {
    let router = Router::new().route(
        "/reports",
        post(|| async {
            let code: TypeCode = "INFJ".parse().expect("valid code");
            Json(generic_profile(code))
        }),
    );
    let addr = spawn(router).await;

    let resolver = ReportResolver::with_generator(Arc::new(generator_for(addr)));
    let resolution = resolver.resolve(TraitScores::neutral(), code()).await;

    assert_eq!(resolution.source, ReportSource::Catalog);
}
