//! Integration tests for the estimation service

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tizhi_server::{
    config::ServerConfig,
    handlers::{create_router, AppState, ErrorBody, EstimateResponse, HealthResponse, VersionResponse},
};
use tower::ServiceExt; // for oneshot

const TEST_KEY: &str = "test-key-do-not-use-in-production";

/// Helper to create test application state
fn create_test_state() -> AppState {
    AppState::from_config(&ServerConfig::default_test_config())
}

fn estimate_request(key: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/v1/constitution/estimate")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("authorization", format!("Bearer {}", key));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router(create_test_state());

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-trace-id"));

    let health: HealthResponse = response_json(response).await;
    assert!(health.ok);
}

#[tokio::test]
async fn test_version_endpoint() {
    let app = create_router(create_test_state());

    let request = Request::builder()
        .method("GET")
        .uri("/version")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let version: VersionResponse = response_json(response).await;
    assert_eq!(version.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_estimate_without_auth_is_401() {
    let app = create_router(create_test_state());

    let request = estimate_request(None, r#"{"text": "我怕冷"}"#);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-trace-id"));

    let error: ErrorBody = response_json(response).await;
    assert_eq!(error.error.code, "UNAUTHORIZED");
    assert!(!error.error.trace_id.is_empty());
}

#[tokio::test]
async fn test_estimate_with_unknown_key_is_401() {
    let app = create_router(create_test_state());

    let request = estimate_request(Some("wrong-key"), r#"{"text": "我怕冷"}"#);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error: ErrorBody = response_json(response).await;
    assert_eq!(error.error.code, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_estimate_yang_deficiency() {
    let app = create_router(create_test_state());

    let request = estimate_request(Some(TEST_KEY), r#"{"text": "我怕冷，手脚冰凉"}"#);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let estimate: EstimateResponse = response_json(response).await;
    assert_eq!(estimate.primary_type, "阳虚质");
    assert!(estimate.secondary_types.is_empty());
    assert!(estimate.confidence > 0.0);
    assert_eq!(estimate.confidence, 0.474);

    assert_eq!(estimate.evidence.len(), 1);
    let evidence = &estimate.evidence[0];
    assert_eq!(evidence.constitution, "阳虚质");
    assert_eq!(evidence.score, 9.0);
    let keywords: Vec<&str> = evidence.matched.iter().map(|m| m.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["怕冷", "手脚冰凉"]);
    assert_eq!(evidence.matched[0].weight, 5.0);
    assert_eq!(evidence.matched[1].weight, 4.0);

    // Low confidence attaches clarification questions
    assert!(!estimate.questions_to_clarify.is_empty());
    assert!(!estimate.recommendations.lifestyle.is_empty());
    assert!(!estimate.disclaimer.is_empty());
}

#[tokio::test]
async fn test_estimate_vague_text_is_insufficient() {
    let app = create_router(create_test_state());

    let request = estimate_request(Some(TEST_KEY), r#"{"text": "有点不舒服"}"#);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let estimate: EstimateResponse = response_json(response).await;
    assert_eq!(estimate.primary_type, "信息不足");
    assert!(estimate.secondary_types.is_empty());
    assert_eq!(estimate.confidence, 0.0);
    assert!(estimate.evidence.is_empty());
    assert!(!estimate.questions_to_clarify.is_empty());
    assert_eq!(
        estimate.recommendations.when_to_seek_help,
        vec!["请补充更多症状信息后重新判定"]
    );
    assert!(!estimate.disclaimer.is_empty());
}

#[tokio::test]
async fn test_estimate_meta_does_not_affect_result() {
    let app = create_router(create_test_state());

    let plain = estimate_request(Some(TEST_KEY), r#"{"text": "我怕冷，手脚冰凉"}"#);
    let with_meta = estimate_request(
        Some(TEST_KEY),
        r#"{"text": "我怕冷，手脚冰凉", "meta": {"age": 30, "sex": "F", "region": "北京", "notes": "无"}}"#,
    );

    let first: EstimateResponse =
        response_json(app.clone().oneshot(plain).await.unwrap()).await;
    let second: EstimateResponse =
        response_json(app.oneshot(with_meta).await.unwrap()).await;

    assert_eq!(first.primary_type, second.primary_type);
    assert_eq!(first.confidence, second.confidence);
}

#[tokio::test]
async fn test_rate_limit_exhaustion_is_429() {
    let mut config = ServerConfig::default_test_config();
    config.rate_limit_per_minute = 2;
    let app = create_router(AppState::from_config(&config));

    for _ in 0..2 {
        let request = estimate_request(Some(TEST_KEY), r#"{"text": "我怕冷"}"#);
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let request = estimate_request(Some(TEST_KEY), r#"{"text": "我怕冷"}"#);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let error: ErrorBody = response_json(response).await;
    assert_eq!(error.error.code, "RATE_LIMITED");
}

#[tokio::test]
async fn test_unauthenticated_requests_do_not_consume_rate_budget() {
    let mut config = ServerConfig::default_test_config();
    config.rate_limit_per_minute = 1;
    let app = create_router(AppState::from_config(&config));

    // Rejected before the limiter runs
    let request = estimate_request(Some("wrong-key"), r#"{"text": "我怕冷"}"#);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = estimate_request(Some(TEST_KEY), r#"{"text": "我怕冷"}"#);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let app = create_router(create_test_state());

    let request = Request::builder()
        .method("POST")
        .uri("/v1/constitution/estimate")
        .header("content-type", "application/json")
        .header("content-length", "50000")
        .header("authorization", format!("Bearer {}", TEST_KEY))
        .body(Body::from(r#"{"text": "我怕冷"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let error: ErrorBody = response_json(response).await;
    assert_eq!(error.error.code, "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_oversized_body_without_declared_length_is_413_envelope() {
    let mut config = ServerConfig::default_test_config();
    config.max_body_bytes = 256;
    let app = create_router(AppState::from_config(&config));

    // No content-length header: the limit is enforced while the body
    // is read, and the rejection must still carry the error envelope.
    let text = "怕冷".repeat(200);
    let request = Request::builder()
        .method("POST")
        .uri("/v1/constitution/estimate")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", TEST_KEY))
        .body(Body::from(format!(r#"{{"text": "{}"}}"#, text)))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(response.headers().contains_key("x-trace-id"));

    let error: ErrorBody = response_json(response).await;
    assert_eq!(error.error.code, "PAYLOAD_TOO_LARGE");
    assert!(!error.error.trace_id.is_empty());
}

#[tokio::test]
async fn test_empty_text_is_insufficient_not_error() {
    let app = create_router(create_test_state());

    let request = estimate_request(Some(TEST_KEY), r#"{"text": ""}"#);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let estimate: EstimateResponse = response_json(response).await;
    assert_eq!(estimate.primary_type, "信息不足");
    assert!(!estimate.questions_to_clarify.is_empty());
}
