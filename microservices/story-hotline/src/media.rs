//! Per-caller media accumulation
//!
//! Each caller has one record in the key-value store, keyed by caller ID,
//! holding every recording URL and image URL received from them in arrival
//! order. Records only grow; nothing here deletes them.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, instrument, warn};

use storyline_core::CallerId;
use storyline_kv::KvStore;

use crate::messaging::Messenger;
use crate::{Error, Result};

/// Body of the text sent after media is captured
pub const CONFIRMATION_TEXT: &str =
    "Thanks for sharing your story, please respond with a photo, if available";

/// Stored value for one caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerMediaRecord {
    #[serde(default)]
    pub recordings: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CallerMediaRecord {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::StorageUnavailable(format!("malformed media record: {}", e)))
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| Error::StorageUnavailable(format!("unencodable media record: {}", e)))
    }

    /// Append whichever URLs are present; duplicates are kept
    pub fn append(&mut self, recording_url: Option<&str>, image_url: Option<&str>) {
        if let Some(url) = recording_url {
            self.recordings.push(url.to_string());
        }
        if let Some(url) = image_url {
            self.images.push(url.to_string());
        }
    }
}

/// Persists caller media and sends the confirmation text
pub struct MediaAccumulator {
    store: Arc<dyn KvStore>,
    messenger: Arc<dyn Messenger>,
    sender: String,
    key_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MediaAccumulator {
    pub fn new(store: Arc<dyn KvStore>, messenger: Arc<dyn Messenger>, sender: impl Into<String>) -> Self {
        Self {
            store,
            messenger,
            sender: sender.into(),
            key_locks: DashMap::new(),
        }
    }

    /// Append the given URLs to the caller's record and write it back.
    ///
    /// With both URLs absent the record is still written unchanged (or
    /// created empty). Saves for the same caller are serialised within this
    /// process; writers in other processes can still overwrite each other.
    #[instrument(skip(self, caller), fields(caller = %caller))]
    pub async fn save_media(
        &self,
        caller: &CallerId,
        recording_url: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<CallerMediaRecord> {
        let key = caller.as_str();
        let lease = self.lease(key);

        let result = {
            let _guard = lease.acquire().await;
            self.read_append_write(key, recording_url, image_url).await
        };
        drop(lease);

        let record = result?;
        info!(
            caller = %caller,
            recordings = record.recordings.len(),
            images = record.images.len(),
            "Media saved"
        );
        Ok(record)
    }

    async fn read_append_write(
        &self,
        key: &str,
        recording_url: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<CallerMediaRecord> {
        let mut record = match self.store.get(key).await? {
            Some(bytes) => CallerMediaRecord::decode(&bytes)?,
            None => CallerMediaRecord::default(),
        };

        record.append(recording_url, image_url);
        self.store.set(key, &record.encode()?).await?;

        Ok(record)
    }

    /// Current record for a caller, if any media was ever saved
    pub async fn fetch(&self, caller: &CallerId) -> Result<Option<CallerMediaRecord>> {
        match self.store.get(caller.as_str()).await? {
            Some(bytes) => Ok(Some(CallerMediaRecord::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Text the caller a fixed confirmation. Failures are logged, never raised.
    pub async fn send_confirmation_text(&self, caller: &CallerId) {
        match self
            .messenger
            .send(caller, &self.sender, CONFIRMATION_TEXT)
            .await
        {
            Ok(sid) => info!(caller = %caller, sid = %sid, "Confirmation text sent"),
            Err(e) => {
                let err = Error::from(e);
                warn!(caller = %caller, error = %err, "Confirmation text not sent");
            }
        }
    }

    fn lease<'a>(&'a self, key: &'a str) -> KeyLease<'a> {
        let lock = self
            .key_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        KeyLease {
            locks: &self.key_locks,
            key,
            lock: Some(lock),
        }
    }
}

/// Share of one caller's lock; dropping the last share removes the entry,
/// including when the owning request is cancelled while waiting.
struct KeyLease<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
    lock: Option<Arc<Mutex<()>>>,
}

impl KeyLease<'_> {
    async fn acquire(&self) -> Option<MutexGuard<'_, ()>> {
        Some(self.lock.as_ref()?.lock().await)
    }
}

impl Drop for KeyLease<'_> {
    // Shares are cloned under the map's shard lock, so once ours is released
    // a count of one means nobody else holds or waits on the key.
    fn drop(&mut self) {
        drop(self.lock.take());
        self.locks
            .remove_if(self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
