//! Configuration for the Story Hotline service

use std::fmt;
use std::str::FromStr;

use storyline_core::{Result, ServiceConfig, StorylineError};
use storyline_kv::PoolConfig;

/// Story Hotline configuration
#[derive(Debug, Clone)]
pub struct HotlineConfig {
    /// Service name and HTTP listener settings
    pub service: ServiceConfig,
    /// Outbound messaging API settings
    pub messaging: MessagingConfig,
    /// Which key-value backend holds caller media records
    pub store_backend: StoreBackend,
    /// Connection settings for the LumaDB backend
    pub store: PoolConfig,
}

impl HotlineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            service: ServiceConfig::from_env()?,
            messaging: MessagingConfig::from_env()?,
            store_backend: std::env::var("STORE_BACKEND")
                .unwrap_or_else(|_| "lumadb".to_string())
                .parse()?,
            store: PoolConfig::from_env(),
        })
    }
}

/// Credentials and endpoint of the messaging API
#[derive(Clone)]
pub struct MessagingConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number for confirmation texts
    pub from_number: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl MessagingConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            account_sid: std::env::var("ACCOUNT_SID").unwrap_or_default(),
            auth_token: std::env::var("AUTH_TOKEN").unwrap_or_default(),
            from_number: std::env::var("FROM_NUMBER")
                .unwrap_or_else(|_| "+14152003278".to_string()),
            api_url: std::env::var("MESSAGING_API_URL")
                .unwrap_or_else(|_| "https://api.twilio.com/2010-04-01".to_string()),
            timeout_secs: std::env::var("MESSAGING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|e| {
                    StorylineError::Config(format!("Invalid MESSAGING_TIMEOUT_SECS: {}", e))
                })?,
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty()
    }
}

impl fmt::Debug for MessagingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagingConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Key-value backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    LumaDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = StorylineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lumadb" | "postgres" => Ok(Self::LumaDb),
            "memory" => Ok(Self::Memory),
            other => Err(StorylineError::Config(format!(
                "Invalid STORE_BACKEND: {}",
                other
            ))),
        }
    }
}
