//! Request/response DTOs for the chat HTTP surface.

use serde::{Deserialize, Serialize};

use crate::ports::{ChatMessage, ChatRole};

/// Request body for the chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Opaque caller-supplied conversation identifier.
    pub conversation_id: String,
    /// User message text.
    pub message: String,
}

/// Response body for the chat endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    /// Assistant reply text.
    pub reply: String,
}

/// Request body for the raw streaming endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatStreamRequest {
    /// User message text, passed straight to the backend.
    pub message: String,
}

/// One history entry.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub role: String,
    pub content: String,
}

impl From<ChatMessage> for MessageView {
    fn from(message: ChatMessage) -> Self {
        Self {
            role: match message.role {
                ChatRole::System => "system",
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            }
            .to_string(),
            content: message.content,
        }
    }
}

/// Response body for the history endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<MessageView>,
}

/// Response body for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_deserializes() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"conversation_id": "c-42", "message": "PNR 1234567890"}"#,
        )
        .unwrap();

        assert_eq!(request.conversation_id, "c-42");
        assert_eq!(request.message, "PNR 1234567890");
    }

    #[test]
    fn chat_reply_serializes() {
        let json = serde_json::to_string(&ChatReply {
            reply: "done".to_string(),
        })
        .unwrap();

        assert_eq!(json, r#"{"reply":"done"}"#);
    }

    #[test]
    fn message_view_maps_roles() {
        let view = MessageView::from(ChatMessage::assistant("hi"));
        assert_eq!(view.role, "assistant");
        assert_eq!(view.content, "hi");

        let view = MessageView::from(ChatMessage::user("hello"));
        assert_eq!(view.role, "user");
    }
}
