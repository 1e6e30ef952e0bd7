//! Core domain types shared across the hotline

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StorylineError};

/// Caller ID as supplied by the telephony provider (e.g. "+14155550100").
///
/// Used verbatim as the storage key for the caller's media record, so no
/// normalisation beyond trimming surrounding whitespace is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallerId(String);

impl CallerId {
    pub fn parse(value: impl AsRef<str>) -> Result<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(StorylineError::Validation("caller id is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CallerId {
    type Error = StorylineError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<CallerId> for String {
    fn from(id: CallerId) -> Self {
        id.0
    }
}

/// Provider-assigned identifier of an outbound message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageSid(pub String);

impl MessageSid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
