//! HTTP API server for SAHPAATHI.
//!
//! The routing layer between the browser frontend and the dual-mode session
//! store. Handlers only ever observe domain-level results from the store;
//! transport failures never cross this boundary. The LLM client is optional:
//! without an API key the chat endpoints report 503 and everything else
//! keeps working.

pub mod api_error;
mod api_types;
mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;

use sahpaathi_llm::LlmClient;
use sahpaathi_store::ChatStore;

pub use api_types::*;

/// Shared application state for all HTTP handlers.
///
/// Wrapped in `Arc` for thread-safe sharing across handlers.
pub struct AppState {
    /// The dual-mode session store.
    pub store: Arc<ChatStore>,
    /// LLM client; `None` when no API key is configured.
    pub llm: Option<Arc<LlmClient>>,
    /// System instruction used when no teacher persona is selected.
    pub instruction: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/test-llm", get(handlers::chat::test_llm))
        .route("/api/history", get(handlers::sessions::get_history))
        .route("/api/clear", post(handlers::sessions::clear_history))
        .route(
            "/api/sessions",
            post(handlers::sessions::create_session).get(handlers::sessions::list_sessions),
        )
        .route("/api/sessions/{id}/rename", put(handlers::sessions::rename_session))
        .route(
            "/api/teachers",
            post(handlers::teachers::create_teacher).get(handlers::teachers::list_teachers),
        )
        .route(
            "/api/teachers/{id}",
            get(handlers::teachers::get_teacher).delete(handlers::teachers::delete_teacher),
        )
        .route("/api/teachers/{id}/prompt", put(handlers::teachers::update_teacher_prompt))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
