//! Webhook request parameters
//!
//! The provider sends parameters in the query string for GET callbacks and
//! as a form-encoded body for POST callbacks. Both are merged here; when a
//! name appears in both, the query string wins.

use axum::{
    extract::{FromRequest, Query, Request},
    http::{header, Method},
    Form,
};
use std::collections::HashMap;

use storyline_core::CallerId;

use crate::Error;

/// Merged query and form parameters of one webhook call
#[derive(Debug, Clone, Default)]
pub struct WebhookParams {
    values: HashMap<String, String>,
}

impl WebhookParams {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parameter value, with blank values treated as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Caller ID from `From`; required by every media webhook
    pub fn caller_id(&self) -> Result<CallerId, Error> {
        let from = self
            .get("From")
            .ok_or_else(|| Error::MalformedRequest("missing From".to_string()))?;
        CallerId::parse(from).map_err(|e| Error::MalformedRequest(e.to_string()))
    }

    pub fn digits(&self) -> Option<&str> {
        self.get("Digits")
    }

    pub fn recording_url(&self) -> Option<&str> {
        self.get("RecordingUrl")
    }

    /// First media attachment of an inbound text
    pub fn media_url(&self) -> Option<&str> {
        self.get("MediaUrl0")
    }

    pub fn body(&self) -> Option<&str> {
        self.get("Body")
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

impl<S> FromRequest<S> for WebhookParams
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(mut values) = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map_err(|e| Error::MalformedRequest(e.body_text()))?;

        let has_body = req.method() != Method::GET && req.method() != Method::HEAD;
        if has_body && is_form(&req) {
            let Form(form) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| Error::MalformedRequest(e.body_text()))?;
            for (name, value) in form {
                values.entry(name).or_insert(value);
            }
        }

        Ok(Self { values })
    }
}
