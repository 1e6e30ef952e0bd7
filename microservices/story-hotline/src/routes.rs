//! Router configuration for the Story Hotline

use axum::{routing::get, Router};

use crate::handlers;
use crate::AppState;

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        // Call start
        .route("/", get(handlers::welcome).post(handlers::welcome))
        .route("/welcome", get(handlers::welcome).post(handlers::welcome))
        // Menu digit
        .route("/handle-key", get(handlers::handle_key).post(handlers::handle_key))
        .route("/menu", get(handlers::handle_key).post(handlers::handle_key))
        // Recording complete
        .route(
            "/handle-recording",
            get(handlers::handle_recording).post(handlers::handle_recording),
        )
        // Inbound text
        .route(
            "/handle-message",
            get(handlers::handle_message).post(handlers::handle_message),
        )
        .route("/sms", get(handlers::handle_message).post(handlers::handle_message))
        .with_state(state)
}
