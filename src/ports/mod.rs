//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue engine and the outside world. Adapters implement these ports.
//!
//! - `LlmProvider` - generative text backend (classification, extraction,
//!   formatting, raw streaming)
//! - `SessionStore` - per-conversation state and history with sliding TTL
//! - `TravelDataApi` - downstream travel-data operations

mod llm_provider;
mod session_store;
mod travel_api;

pub use llm_provider::{
    ChatMessage, ChatRole, CompletionRequest, LlmError, LlmProvider, TokenStream,
};
pub use session_store::{SessionStore, StoreError};
pub use travel_api::{TravelApiError, TravelDataApi};
