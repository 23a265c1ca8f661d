//! Router assembly: bridge HTTP endpoints, agent messaging endpoints, CORS, panic
//! recovery, and HTTP tracing.

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

use crate::error::ApiError;
use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - bridge API: `/health`, `/learn`, `/quiz`, `/chat`, `/agent-status`
/// - agent messaging: `/submit` (enveloped, one-shot) and `/ws`
/// - CORS (allow any origin/method/headers)
/// - panic recovery into a 500 `{error}` so one bad request never takes the process down
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Bridge
        .route("/health", get(http::http_health))
        .route("/learn", post(http::http_post_learn))
        .route("/quiz", post(http::http_post_quiz))
        .route("/chat", post(http::http_post_chat))
        .route("/agent-status", get(http::http_agent_status))
        // Agent
        .route("/submit", post(http::http_post_submit))
        .route("/ws", get(ws::ws_upgrade))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(target: "superlearn_backend", %detail, "Handler panicked");
    ApiError::Internal("Internal error while handling the request".into()).into_response()
}
