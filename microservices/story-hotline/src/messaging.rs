//! Outbound messaging API client
//!
//! Sends text messages through the telephony provider's REST API.
//! Sends are fire-and-forget: the returned SID is only logged.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use storyline_core::{CallerId, MessageSid};

use crate::config::MessagingConfig;

/// Sends a text message to a caller
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, to: &CallerId, from: &str, body: &str) -> Result<MessageSid, MessagingError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("Messaging credentials not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// REST client for the provider's Messages resource
pub struct TwilioMessenger {
    account_sid: String,
    auth_token: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl TwilioMessenger {
    pub fn new(config: &MessagingConfig) -> Result<Self, MessagingError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MessagingError::Network(e.to_string()))?;

        Ok(Self {
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/Accounts/{}/Messages.json", self.base_url, self.account_sid)
    }
}

#[async_trait]
impl Messenger for TwilioMessenger {
    #[instrument(skip(self, to, body), fields(to = %to))]
    async fn send(&self, to: &CallerId, from: &str, body: &str) -> Result<MessageSid, MessagingError> {
        if self.account_sid.is_empty() || self.auth_token.is_empty() {
            return Err(MessagingError::NotConfigured);
        }

        let params = [("To", to.as_str()), ("From", from), ("Body", body)];

        let response = self
            .http_client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| MessagingError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MessagingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let created: MessageResponse = response
            .json()
            .await
            .map_err(|e| MessagingError::Parse(e.to_string()))?;

        debug!(sid = %created.sid, "Message accepted");
        Ok(MessageSid(created.sid))
    }
}
