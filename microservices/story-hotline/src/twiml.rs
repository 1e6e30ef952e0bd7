//! Voice response documents
//!
//! Builds the XML document the telephony provider executes after each
//! webhook: speak text, gather digits, record audio, redirect, hang up.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::fmt::Write;

/// HTTP method the provider uses for a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Collect touch-tone digits, then call `action` with the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gather {
    pub num_digits: u8,
    pub action: String,
    pub method: Method,
    /// Spoken while waiting for input
    pub prompts: Vec<String>,
}

/// Record the caller, then call `action` with the recording URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub max_length_secs: u32,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Say(String),
    Gather(Gather),
    Record(Record),
    Redirect { url: String, method: Method },
    Hangup,
}

/// Ordered list of verbs rendered as a `<Response>` document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say(text.into()));
        self
    }

    pub fn gather(mut self, gather: Gather) -> Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    pub fn record(mut self, max_length_secs: u32, action: impl Into<String>) -> Self {
        self.verbs.push(Verb::Record(Record {
            max_length_secs,
            action: action.into(),
        }));
        self
    }

    pub fn redirect(mut self, url: impl Into<String>, method: Method) -> Self {
        self.verbs.push(Verb::Redirect {
            url: url.into(),
            method,
        });
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for verb in &self.verbs {
            write_verb(&mut out, verb);
        }
        out.push_str("</Response>");
        out
    }
}

fn write_verb(out: &mut String, verb: &Verb) {
    // Writing into a String cannot fail
    let _ = match verb {
        Verb::Say(text) => write!(out, "<Say>{}</Say>", escape(text)),
        Verb::Gather(gather) => {
            let _ = write!(
                out,
                r#"<Gather numDigits="{}" action="{}" method="{}">"#,
                gather.num_digits,
                escape(&gather.action),
                gather.method.as_str()
            );
            for prompt in &gather.prompts {
                let _ = write!(out, "<Say>{}</Say>", escape(prompt));
            }
            write!(out, "</Gather>")
        }
        Verb::Record(record) => write!(
            out,
            r#"<Record maxLength="{}" action="{}"/>"#,
            record.max_length_secs,
            escape(&record.action)
        ),
        Verb::Redirect { url, method } => write!(
            out,
            r#"<Redirect method="{}">{}</Redirect>"#,
            method.as_str(),
            escape(url)
        ),
        Verb::Hangup => write!(out, "<Hangup/>"),
    };
}

/// Escape text for use in XML content and attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl IntoResponse for VoiceResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            self.to_xml(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response() {
        assert_eq!(
            VoiceResponse::new().to_xml(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#
        );
    }

    #[test]
    fn test_gather_with_nested_prompt() {
        let xml = VoiceResponse::new()
            .say("Hello")
            .gather(Gather {
                num_digits: 1,
                action: "/handle-key".to_string(),
                method: Method::Post,
                prompts: vec!["Press 1".to_string()],
            })
            .to_xml();

        assert!(xml.contains("<Say>Hello</Say>"));
        assert!(xml.contains(
            r#"<Gather numDigits="1" action="/handle-key" method="POST"><Say>Press 1</Say></Gather>"#
        ));
    }

    #[test]
    fn test_record_redirect_hangup() {
        let xml = VoiceResponse::new()
            .record(60, "/handle-recording")
            .redirect("/", Method::Post)
            .hangup()
            .to_xml();

        assert!(xml.contains(r#"<Record maxLength="60" action="/handle-recording"/>"#));
        assert!(xml.contains(r#"<Redirect method="POST">/</Redirect>"#));
        assert!(xml.ends_with("<Hangup/></Response>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = VoiceResponse::new()
            .say("Tom & Jerry's <show>")
            .redirect("/next?a=1&b=\"2\"", Method::Get)
            .to_xml();

        assert!(xml.contains("<Say>Tom &amp; Jerry&apos;s &lt;show&gt;</Say>"));
        assert!(xml.contains(r#"<Redirect method="GET">/next?a=1&amp;b=&quot;2&quot;</Redirect>"#));
    }

    #[test]
    fn test_into_response_is_xml() {
        let response = VoiceResponse::new().hangup().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/xml"
        );
    }
}
