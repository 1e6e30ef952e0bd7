//! Call Flow State Machine
//!
//! The provider carries call state between webhooks by calling whichever
//! URL the previous response pointed at. Each webhook therefore knows the
//! state it runs in; this module makes the states and their transitions
//! explicit.

/// Digit that starts a recording from the menu
pub const RECORD_DIGIT: &str = "1";

/// Where a caller is in the hotline flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Call just connected
    Welcome,
    /// Greeting played, waiting for a menu digit
    MenuWait,
    /// Recording in progress
    Recording,
    /// Waiting for a text message (photo) from the caller
    MessageWait,
    /// Nothing left to do
    Terminal,
}

/// Input that drives a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    CallStarted,
    /// Gather finished; `None` when it timed out without a digit
    DigitPressed(Option<String>),
    RecordingFinished,
    MessageReceived,
}

/// What the webhook does while taking a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Speak the greeting and gather one digit
    Greet,
    /// Speak the recording prompt and start recording
    PromptRecording,
    /// Send the caller back to the welcome webhook
    RestartMenu,
    /// Persist the recording URL, confirm by text, say goodbye
    SaveRecording,
    /// Persist the image URL, confirm by text, reply
    SaveImage,
}

/// Outcome of applying an event to a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub action: Action,
    pub next: CallState,
}

impl CallState {
    /// Webhook path the provider calls while in this state
    pub fn callback_path(self) -> Option<&'static str> {
        match self {
            CallState::Welcome => Some("/"),
            CallState::MenuWait => Some("/handle-key"),
            CallState::Recording => Some("/handle-recording"),
            CallState::MessageWait => Some("/handle-message"),
            CallState::Terminal => None,
        }
    }

    /// Apply `event`, returning the action to perform and the next state
    pub fn on(self, event: &CallEvent) -> Result<Step, FlowError> {
        let (action, next) = match (self, event) {
            (CallState::Welcome, CallEvent::CallStarted) => (Action::Greet, CallState::MenuWait),
            (CallState::MenuWait, CallEvent::DigitPressed(Some(digit)))
                if digit.trim() == RECORD_DIGIT =>
            {
                (Action::PromptRecording, CallState::Recording)
            }
            (CallState::MenuWait, CallEvent::DigitPressed(_)) => {
                (Action::RestartMenu, CallState::Welcome)
            }
            (CallState::Recording, CallEvent::RecordingFinished) => {
                (Action::SaveRecording, CallState::Terminal)
            }
            (CallState::MessageWait, CallEvent::MessageReceived) => {
                (Action::SaveImage, CallState::Terminal)
            }
            (state, event) => {
                return Err(FlowError::InvalidTransition {
                    state,
                    event: event.clone(),
                })
            }
        };

        Ok(Step { action, next })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Event {event:?} is not valid in state {state:?}")]
    InvalidTransition { state: CallState, event: CallEvent },

    #[error("Action {0:?} cannot be performed by this webhook")]
    UnsupportedAction(Action),
}
