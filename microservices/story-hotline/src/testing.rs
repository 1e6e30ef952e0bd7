//! Test doubles for the store and messenger seams

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use storyline_core::{CallerId, MessageSid};
use storyline_kv::{KvError, KvStore};

use crate::messaging::{Messenger, MessagingError};

/// Store whose every call fails as if the backend were down
pub struct FailingStore;

#[async_trait]
impl KvStore for FailingStore {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, _key: &str) -> storyline_kv::Result<Option<Vec<u8>>> {
        Err(KvError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &[u8]) -> storyline_kv::Result<()> {
        Err(KvError::Unavailable("connection refused".to_string()))
    }

    async fn is_healthy(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub from: String,
    pub body: String,
}

/// Messenger that records sends instead of calling the API
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<SentMessage>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingMessenger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, to: &CallerId, from: &str, body: &str) -> Result<MessageSid, MessagingError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MessagingError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }

        self.sent.lock().unwrap().push(SentMessage {
            to: to.to_string(),
            from: from.to_string(),
            body: body.to_string(),
        });
        Ok(MessageSid(format!("SM{attempt:032}")))
    }
}
