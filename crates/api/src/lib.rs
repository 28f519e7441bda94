mod config;
mod error;
mod payload;

use std::sync::Arc;
use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::{Json, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use bankdesk_core::{ChatbotReply, RuleTable};
use bankdesk_observability::AppMetrics;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::{AllowedOrigins, ChatbotConfig, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT};
pub use error::{ApiError, ConfigError};

pub const HEALTH_PATH: &str = "/api/chatbot/health";
pub const MESSAGE_PATH: &str = "/api/chatbot/message";
pub const RULES_PATH: &str = "/api/chatbot/rules";
pub const METRICS_PATH: &str = "/api/chatbot/metrics";

#[derive(Clone)]
pub struct ApiState {
    pub rules: Arc<RuleTable>,
    pub metrics: Arc<AppMetrics>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn build_app(config: &ChatbotConfig) -> Router {
    let state = ApiState {
        rules: Arc::new(RuleTable::new(config.bill_policy)),
        metrics: AppMetrics::shared(),
    };

    build_router(state, config)
}

pub fn build_router(state: ApiState, config: &ChatbotConfig) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(MESSAGE_PATH, post(message))
        .route(RULES_PATH, get(rules))
        .route(METRICS_PATH, get(metrics))
        .layer(build_cors_layer(&config.allowed_origins))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

async fn message(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatbotReply>, ApiError> {
    let started = Instant::now();
    state.metrics.inc_request();

    let incoming = match payload::parse_incoming(&headers, &body) {
        Ok(incoming) => incoming,
        Err(error) => {
            state.metrics.inc_rejected();
            warn!(error = %error, "chatbot message rejected");
            return Err(error);
        }
    };

    let classification = state.rules.classify(incoming.as_deref());
    state
        .metrics
        .record_classification(classification.intent, started.elapsed());
    info!(intent = %classification.intent, "chatbot message classified");

    Ok(Json(ChatbotReply {
        reply: classification.reply.to_string(),
    }))
}

async fn rules(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.rules.catalog()))
}

async fn metrics(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.metrics.snapshot()))
}

fn build_cors_layer(allowed_origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match allowed_origins {
        AllowedOrigins::Any => layer.allow_origin(AllowOrigin::any()),
        AllowedOrigins::List(origins) => {
            let origins = origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect::<Vec<_>>();
            layer.allow_origin(AllowOrigin::list(origins))
        }
    }
}

async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response.headers_mut().insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("DENY"),
    );
    response.headers_mut().insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'; base-uri 'none'"),
    );

    response
}

