//! Error types for the Story Hotline

use axum::response::{IntoResponse, Response};

use crate::call_flow::FlowError;
use crate::messaging::MessagingError;
use crate::twiml::VoiceResponse;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Spoken when a webhook cannot be served normally
pub const APOLOGY: &str = "Sorry, something went wrong. Please call again later.";

/// Story Hotline error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Messaging failure: {0}")]
    MessagingFailure(#[from] MessagingError),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Call flow error: {0}")]
    Flow(#[from] FlowError),
}

impl From<storyline_kv::KvError> for Error {
    fn from(err: storyline_kv::KvError) -> Self {
        Error::StorageUnavailable(err.to_string())
    }
}

/// Webhook errors still answer the provider with a valid document,
/// otherwise the caller is left on a dead line.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::MalformedRequest(_) => tracing::warn!("Rejected webhook: {}", self),
            _ => tracing::error!("Webhook error: {:?}", self),
        }

        VoiceResponse::new().say(APOLOGY).hangup().into_response()
    }
}
