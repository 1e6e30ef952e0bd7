//! HTTP handlers for the Story Hotline webhooks

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, info, warn};

use storyline_core::{CallerId, HealthStatus, ReadinessStatus};

use crate::call_flow::{Action, CallEvent, CallState, FlowError};
use crate::params::WebhookParams;
use crate::twiml::{Gather, Method, VoiceResponse};
use crate::{AppState, Error, Result};

pub const GREETING: &str = "Hello, thanks for calling SFSPCA's Twilio app";
pub const MENU_PROMPT: &str =
    "Press 1 to record your awesome story. Press any other key to start over.";
pub const RECORDING_PROMPT: &str =
    "Record your story after the tone. Please keep your recording to under a minute";
pub const RECORDING_THANKS: &str =
    "Thanks for sharing your story, you will receive a text, please respond to it with a photo";
pub const GOODBYE: &str = "Goodbye.";
pub const PHOTO_THANKS: &str = "Thanks for sharing the photo with us!";

/// Maximum recording length in seconds
pub const MAX_RECORDING_SECS: u32 = 60;

/// Plain-text reply to an inbound message; an empty body sends nothing back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsReply(pub String);

impl SmsReply {
    pub fn empty() -> Self {
        Self(String::new())
    }
}

impl IntoResponse for SmsReply {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], self.0).into_response()
    }
}

fn callback(state: CallState) -> &'static str {
    state.callback_path().unwrap_or("/")
}

// ============================================
// Voice Webhooks
// ============================================

/// Call connected: greet and ask for a menu digit
pub async fn welcome(params: WebhookParams) -> Result<VoiceResponse> {
    let step = CallState::Welcome.on(&CallEvent::CallStarted)?;
    info!(from = params.get("From").unwrap_or("unknown"), "Call started");

    Ok(VoiceResponse::new().say(GREETING).gather(Gather {
        num_digits: 1,
        action: callback(step.next).to_string(),
        method: Method::Post,
        prompts: vec![MENU_PROMPT.to_string()],
    }))
}

/// Menu digit received
pub async fn handle_key(params: WebhookParams) -> Result<VoiceResponse> {
    let digits = params.digits().map(str::to_string);
    let step = CallState::MenuWait.on(&CallEvent::DigitPressed(digits))?;

    let response = match step.action {
        Action::PromptRecording => VoiceResponse::new()
            .say(RECORDING_PROMPT)
            .record(MAX_RECORDING_SECS, callback(step.next)),
        _ => VoiceResponse::new().redirect(callback(step.next), Method::Post),
    };

    Ok(response)
}

/// Persist the media URL the action names, then text the caller.
///
/// Storage failures are logged and swallowed so the provider still gets its
/// normal response.
pub async fn save_and_confirm(
    state: &AppState,
    action: Action,
    caller: &CallerId,
    params: &WebhookParams,
) -> Result<()> {
    let (recording_url, image_url) = match action {
        Action::SaveRecording => (params.recording_url(), None),
        Action::SaveImage => (None, params.media_url()),
        other => return Err(FlowError::UnsupportedAction(other).into()),
    };

    if let Err(e) = state
        .accumulator
        .save_media(caller, recording_url, image_url)
        .await
    {
        error!(caller = %caller, action = ?action, error = %e, "Media not saved");
    }
    state.accumulator.send_confirmation_text(caller).await;

    Ok(())
}

/// Recording finished: store its URL, text the caller, say goodbye
pub async fn handle_recording(
    State(state): State<AppState>,
    params: WebhookParams,
) -> Result<VoiceResponse> {
    let step = CallState::Recording.on(&CallEvent::RecordingFinished)?;
    let caller = params.caller_id()?;

    save_and_confirm(&state, step.action, &caller, &params).await?;

    Ok(VoiceResponse::new().say(RECORDING_THANKS).say(GOODBYE))
}

/// Inbound text message, usually carrying the caller's photo
pub async fn handle_message(
    State(state): State<AppState>,
    params: std::result::Result<WebhookParams, Error>,
) -> Result<SmsReply> {
    let params = match params {
        Ok(params) => params,
        Err(e) => {
            warn!("Rejected message webhook: {}", e);
            return Ok(SmsReply::empty());
        }
    };

    let step = CallState::MessageWait.on(&CallEvent::MessageReceived)?;
    let caller = match params.caller_id() {
        Ok(caller) => caller,
        Err(e) => {
            warn!("Rejected message webhook: {}", e);
            return Ok(SmsReply::empty());
        }
    };

    debug!(
        caller = %caller,
        has_image = params.media_url().is_some(),
        body = params.body().unwrap_or_default(),
        "Message received"
    );
    save_and_confirm(&state, step.action, &caller, &params).await?;

    Ok(match params.media_url() {
        Some(_) => SmsReply(PHOTO_THANKS.to_string()),
        None => SmsReply::empty(),
    })
}

// ============================================
// Health Handlers
// ============================================

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health_status())
}

pub async fn ready(State(state): State<AppState>) -> Json<ReadinessStatus> {
    Json(state.readiness_status().await)
}
