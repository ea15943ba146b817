//! HTTP request handlers for the constitution estimation service.
//!
//! Implements the estimation endpoint plus health and version checks
//! using axum. The boundary authenticates, rate-limits, size-caps, and
//! time-boxes every estimation request before the engine runs; the
//! engine itself never sees authentication or transport state.

use crate::auth::{key_fingerprint, parse_bearer_token, ApiKeySet, AuthError};
use crate::config::ServerConfig;
use crate::ratelimit::RateLimiter;
use crate::recommendations::{self, Recommendation};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tizhi_core::{decide, score, DecisionConfig, EvidenceSummary, Rulebook, Verdict, DISCLAIMER};
use tracing::{debug, info};
use uuid::Uuid;

/// Primary-type marker returned when no category scored high enough
pub const INSUFFICIENT_LABEL: &str = "信息不足";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The rule database, built once at startup and shared read-only
    pub rulebook: Arc<Rulebook>,
    /// Decision-policy thresholds
    pub decision: DecisionConfig,
    /// Accepted API keys
    pub api_keys: Arc<ApiKeySet>,
    /// Per-key sliding-window rate limiter
    pub rate_limiter: Arc<RateLimiter>,
    /// Wall-clock budget around the engine call
    pub request_timeout: Duration,
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
    /// Allowed CORS origins; CORS is disabled when empty
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// Assemble the application state from a loaded configuration
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            rulebook: Arc::new(Rulebook::new()),
            decision: config.decision_config(),
            api_keys: Arc::new(ApiKeySet::new(config.api_keys.clone())),
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit_per_minute)),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            max_body_bytes: config.max_body_bytes,
            allowed_origins: config.allowed_origins.clone(),
        }
    }
}

/// Per-request trace identifier, set by the request middleware
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

/// Optional request metadata, passed through for logging/context only.
/// Never affects scoring.
#[derive(Debug, Deserialize)]
pub struct MetaInfo {
    /// Age in years
    pub age: Option<u32>,
    /// Sex: "M" or "F"
    pub sex: Option<String>,
    /// Region
    pub region: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Constitution estimation request
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    /// Symptom/habit/tongue/pulse description (Chinese)
    pub text: String,
    /// Optional metadata
    #[serde(default)]
    pub meta: Option<MetaInfo>,
}

/// One matched keyword in the evidence list
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchedKeyword {
    /// The configured keyword found in the text
    pub keyword: String,
    /// Its configured weight
    pub weight: f64,
    /// "positive" or "negative"
    pub polarity: String,
}

/// Evidence for one constitution type
#[derive(Debug, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Constitution type label
    #[serde(rename = "type")]
    pub constitution: String,
    /// The type's raw score, rounded to two decimals
    pub score: f64,
    /// Keywords that fired
    pub matched: Vec<MatchedKeyword>,
}

impl EvidenceItem {
    fn from_summary(summary: &EvidenceSummary) -> Self {
        Self {
            constitution: summary.constitution.label().to_string(),
            score: round2(summary.raw_score),
            matched: summary
                .matched
                .iter()
                .map(|m| MatchedKeyword {
                    keyword: m.keyword.to_string(),
                    weight: m.weight,
                    polarity: m.polarity.as_str().to_string(),
                })
                .collect(),
        }
    }
}

/// Recommendation texts attached to the response
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsDto {
    /// Daily-routine and exercise suggestions
    pub lifestyle: Vec<String>,
    /// Dietary suggestions
    pub diet: Vec<String>,
    /// When to escalate to a professional
    pub when_to_seek_help: Vec<String>,
}

impl From<Recommendation> for RecommendationsDto {
    fn from(rec: Recommendation) -> Self {
        Self {
            lifestyle: rec.lifestyle.iter().map(|s| s.to_string()).collect(),
            diet: rec.diet.iter().map(|s| s.to_string()).collect(),
            when_to_seek_help: rec.when_to_seek_help.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Constitution estimation response
#[derive(Debug, Serialize, Deserialize)]
pub struct EstimateResponse {
    /// Primary type label, or the insufficient-evidence marker
    pub primary_type: String,
    /// Secondary candidate labels, at most two
    pub secondary_types: Vec<String>,
    /// Confidence in [0, 1), rounded to three decimals
    pub confidence: f64,
    /// Evidence for the primary and secondary types
    pub evidence: Vec<EvidenceItem>,
    /// Lifestyle/diet/escalation texts for the primary type
    pub recommendations: RecommendationsDto,
    /// Questions to ask when evidence is weak; possibly empty
    pub questions_to_clarify: Vec<String>,
    /// Fixed disclaimer, always present
    pub disclaimer: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Liveness flag
    pub ok: bool,
}

/// Version response
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    /// Crate version
    pub version: String,
}

/// Error detail in the error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Trace id of the failed request
    pub trace_id: String,
}

/// Error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The error detail
    pub error: ErrorDetail,
}

/// Application error, mapped to distinct HTTP status codes
#[derive(Debug)]
pub struct ApiError {
    kind: ApiErrorKind,
    trace_id: String,
}

#[derive(Debug)]
enum ApiErrorKind {
    Unauthorized(String),
    RateLimited(String),
    PayloadTooLarge(String),
    Timeout,
    Internal(String),
}

impl ApiError {
    fn unauthorized(message: impl Into<String>, trace_id: &TraceId) -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized(message.into()),
            trace_id: trace_id.0.clone(),
        }
    }

    fn rate_limited(message: impl Into<String>, trace_id: &TraceId) -> Self {
        Self {
            kind: ApiErrorKind::RateLimited(message.into()),
            trace_id: trace_id.0.clone(),
        }
    }

    fn payload_too_large(message: impl Into<String>, trace_id: &TraceId) -> Self {
        Self {
            kind: ApiErrorKind::PayloadTooLarge(message.into()),
            trace_id: trace_id.0.clone(),
        }
    }

    fn timeout(trace_id: &TraceId) -> Self {
        Self {
            kind: ApiErrorKind::Timeout,
            trace_id: trace_id.0.clone(),
        }
    }

    fn internal(message: impl Into<String>, trace_id: &TraceId) -> Self {
        Self {
            kind: ApiErrorKind::Internal(message.into()),
            trace_id: trace_id.0.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self.kind {
            ApiErrorKind::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiErrorKind::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg),
            ApiErrorKind::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg)
            }
            ApiErrorKind::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                "请求处理超时".to_string(),
            ),
            ApiErrorKind::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let body = Json(ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                trace_id: self.trace_id,
            },
        });
        (status, body).into_response()
    }
}

/// POST /v1/constitution/estimate - Classify a symptom description
///
/// Authenticates the caller, applies the rate limit, and runs the
/// scoring engine under the configured wall-clock budget. Insufficient
/// evidence is a success-shaped response, not an error.
async fn estimate_constitution(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    headers: axum::http::HeaderMap,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let token = parse_bearer_token(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    )
    .ok_or(AuthError::MissingToken)
    .and_then(|token| state.api_keys.verify(token))
    .map_err(|e| ApiError::unauthorized(e.to_string(), &trace_id))?;

    state
        .rate_limiter
        .check(token)
        .map_err(|e| ApiError::rate_limited(e.to_string(), &trace_id))?;

    debug!(api_key_hash = %key_fingerprint(token), trace_id = %trace_id.0, "authenticated");
    if let Some(meta) = &request.meta {
        debug!(age = ?meta.age, sex = ?meta.sex, region = ?meta.region, "request meta");
    }

    // The engine is synchronous and bounded by text length; the timeout
    // is a safety net, not a normal path.
    let rulebook = Arc::clone(&state.rulebook);
    let decision = state.decision.clone();
    let text = request.text;
    let verdict = tokio::time::timeout(
        state.request_timeout,
        tokio::task::spawn_blocking(move || {
            let scores = score(&rulebook, &text);
            decide(&rulebook, &scores, &decision)
        }),
    )
    .await
    .map_err(|_| ApiError::timeout(&trace_id))?
    .map_err(|e| ApiError::internal(e.to_string(), &trace_id))?;

    Ok(Json(build_response(verdict)))
}

/// Map a verdict to the wire shape
fn build_response(verdict: Verdict) -> EstimateResponse {
    match verdict {
        Verdict::Insufficient { questions } => EstimateResponse {
            primary_type: INSUFFICIENT_LABEL.to_string(),
            secondary_types: Vec::new(),
            confidence: 0.0,
            evidence: Vec::new(),
            recommendations: recommendations::INSUFFICIENT_EVIDENCE.into(),
            questions_to_clarify: questions.iter().map(|q| q.to_string()).collect(),
            disclaimer: DISCLAIMER.to_string(),
        },
        Verdict::Decided {
            primary,
            secondary,
            confidence,
            evidence,
            questions,
        } => EstimateResponse {
            primary_type: primary.label().to_string(),
            secondary_types: secondary.iter().map(|c| c.label().to_string()).collect(),
            confidence: round3(confidence),
            evidence: evidence.iter().map(EvidenceItem::from_summary).collect(),
            recommendations: recommendations::for_constitution(primary).into(),
            questions_to_clarify: questions.iter().map(|q| q.to_string()).collect(),
            disclaimer: DISCLAIMER.to_string(),
        },
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// GET /health - Liveness check (open, for platform health probes)
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// GET /version - Version information (open)
async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Request middleware: trace id, body-size gate, request logging.
///
/// Assigns a trace id to every request, rejects bodies whose declared
/// length exceeds the limit before the handler reads them, logs one
/// line per request, and stamps the trace id on the response.
async fn request_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let trace_id = TraceId(Uuid::new_v4().to_string());
    request.extensions_mut().insert(trace_id.clone());

    let path = request.uri().path().to_string();
    let start = Instant::now();

    let declared_len = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    let method = request.method();
    let has_body = method == Method::POST || method == Method::PUT || method == Method::PATCH;
    let oversized = has_body && declared_len.is_some_and(|len| len > state.max_body_bytes);

    let mut response = if oversized {
        ApiError::payload_too_large(
            format!("请求体大小超过限制 {} 字节", state.max_body_bytes),
            &trace_id,
        )
        .into_response()
    } else {
        next.run(request).await
    };

    // Bodies with no declared length are caught by DefaultBodyLimit
    // instead, which answers in plain text. Rewrite that rejection into
    // the standard error envelope.
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json_response(&response) {
        response = ApiError::payload_too_large(
            format!("请求体大小超过限制 {} 字节", state.max_body_bytes),
            &trace_id,
        )
        .into_response();
    }

    info!(
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        trace_id = %trace_id.0,
        "request"
    );

    if let Ok(value) = HeaderValue::from_str(&trace_id.0) {
        response.headers_mut().insert("x-trace-id", value);
    }
    response
}

fn is_json_response(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let cors = cors_layer(&state.allowed_origins);

    // DefaultBodyLimit backstops the content-length gate in the
    // middleware for requests without a declared length.
    let router = AxumRouter::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
        .route("/v1/constitution/estimate", post(estimate_constitution))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_middleware,
        ))
        .with_state(state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(allowed_origins: &[String]) -> Option<tower_http::cors::CorsLayer> {
    use tower_http::cors::{AllowOrigin, CorsLayer};

    if allowed_origins.is_empty() {
        return None;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
