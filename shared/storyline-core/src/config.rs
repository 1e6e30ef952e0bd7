//! Configuration management for services

use crate::error::{Result, StorylineError};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub host: String,
    pub http_port: u16,
    pub log_level: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "story-hotline".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|e| StorylineError::Config(format!("Invalid PORT: {}", e)))?,
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Address the HTTP listener binds to
    pub fn http_bind(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_bind() {
        let config = ServiceConfig {
            service_name: "story-hotline".to_string(),
            host: "127.0.0.1".to_string(),
            http_port: 8080,
            log_level: "info".to_string(),
        };
        assert_eq!(config.http_bind(), "127.0.0.1:8080");
    }
}
