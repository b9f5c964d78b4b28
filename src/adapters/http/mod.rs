//! HTTP surface adapter.
//!
//! A thin axum layer over the dialogue orchestrator; user authentication and
//! account management are handled outside this service.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{ApiError, AppState};
pub use routes::{app_router, chat_routes};
