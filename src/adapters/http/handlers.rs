//! HTTP handlers for the chat surface.
//!
//! These handlers connect axum routes to the dialogue orchestrator. The
//! streaming endpoint is a deliberately degenerate path: tokens go straight
//! from the backend to the caller without touching the state machine.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, Stream, StreamExt};
use http::StatusCode;

use crate::application::{ChatError, ChatService};
use crate::ports::{ChatRole, CompletionRequest, LlmProvider, TokenStream};

use super::dto::{
    ChatReply, ChatRequest, ChatStreamRequest, ErrorResponse, HealthResponse, HistoryResponse,
    MessageView,
};

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct AppState {
    /// The dialogue orchestrator.
    pub chat: Arc<ChatService>,
    /// Backend handle for the raw streaming pass-through.
    pub llm: Arc<dyn LlmProvider>,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(chat: Arc<ChatService>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { chat, llm }
    }
}

/// API-level errors mapped to HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    /// Infrastructure failure; the turn produced no reply.
    Unavailable(String),
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Store(e) => ApiError::Unavailable(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unavailable(error) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse { error }),
            )
                .into_response(),
        }
    }
}

/// POST /api/v1/chat - Handle one conversation turn.
///
/// # Errors
/// - 503 Service Unavailable: session store unreachable
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let reply = state
        .chat
        .handle_message(&request.conversation_id, &request.message)
        .await?;
    Ok(Json(ChatReply { reply }))
}

/// POST /api/v1/chat/stream - Raw token streaming.
///
/// Stateless pass-through from the generative backend: no classification,
/// no session, no history. Each `data` event carries one JSON-encoded text
/// fragment (fragments may contain newlines, which raw SSE data cannot);
/// failures produce an `error` event and the stream always ends with `done`.
pub async fn stream_message(
    State(state): State<AppState>,
    Json(request): Json<ChatStreamRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let completion = CompletionRequest::new().with_message(ChatRole::User, request.message);

    let tokens: TokenStream = match state.llm.stream_complete(completion).await {
        Ok(stream) => stream,
        Err(err) => Box::pin(stream::once(async move { Err(err) })),
    };

    let events = tokens
        .map(|fragment| -> Result<Event, Infallible> {
            match fragment {
                Ok(delta) => Ok(Event::default()
                    .json_data(delta)
                    .unwrap_or_else(|_| Event::default().event("error").data("encoding failed"))),
                // Provider error bodies can span lines; SSE data cannot.
                Err(err) => Ok(Event::default()
                    .event("error")
                    .data(err.to_string().replace(['\r', '\n'], " "))),
            }
        })
        .chain(stream::once(async {
            Ok(Event::default().event("done").data(""))
        }));

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// GET /api/v1/chat/:conversation_id/history - Conversation transcript.
pub async fn get_history(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let messages = state.chat.history(&conversation_id).await?;
    Ok(Json(HistoryResponse {
        messages: messages.into_iter().map(MessageView::from).collect(),
    }))
}

/// GET /health - Liveness probe including the session store.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.chat.ping().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
