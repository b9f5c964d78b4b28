//! Axum routes for the chat surface.

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{get_history, health, send_message, stream_message, AppState};

/// Creates routes for chat endpoints.
///
/// - POST /chat - one conversation turn
/// - POST /chat/stream - raw token streaming (SSE)
/// - GET /chat/:conversation_id/history - transcript
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(send_message))
        .route("/chat/stream", post(stream_message))
        .route("/chat/:conversation_id/history", get(get_history))
}

/// Combined application router with middleware applied.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([http::header::CONTENT_TYPE]);

    Router::new()
        .nest("/api/v1", chat_routes())
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(120)))
        .with_state(state)
}
