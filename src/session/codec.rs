//! Snapshot persistence: the message log and the aggregate are written as two
//! independent JSON blobs. Either write may fail without affecting the other,
//! and neither failure reaches the caller.

use crate::error::{CodecError, StoreError};
use crate::session::stats::StatsAggregate;
use crate::session::store::KeyValueStore;
use crate::session::Message;

pub const MESSAGES_KEY: &str = "chatMessages";
pub const STATS_KEY: &str = "messageStats";

/// Outcome of one best-effort save. `None` means the half was written.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub messages: Option<String>,
    pub stats: Option<String>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.messages.is_none() && self.stats.is_none()
    }

    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().chain(self.stats.iter()).map(String::as_str)
    }
}

/// A loaded snapshot. Each half is `None` when missing, empty or unparsable.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadedSnapshot {
    pub messages: Option<Vec<Message>>,
    pub stats: Option<StatsAggregate>,
}

impl LoadedSnapshot {
    pub fn is_empty(&self) -> bool {
        self.messages.is_none() && self.stats.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
enum PersistError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct SnapshotCodec<S> {
    store: S,
}

impl<S: KeyValueStore> SnapshotCodec<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&mut self, messages: &[Message], stats: &StatsAggregate) -> SaveReport {
        SaveReport {
            messages: self.write(MESSAGES_KEY, messages).err(),
            stats: self.write(STATS_KEY, stats).err(),
        }
    }

    fn write<T: serde::Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<(), String> {
        let result = serde_json::to_string(value)
            .map_err(|source| CodecError::Serialize { key, source })
            .map_err(PersistError::from)
            .and_then(|json| self.store.set(key, &json).map_err(PersistError::from));

        result.map_err(|err| {
            tracing::warn!(key, error = %err, "snapshot write failed");
            err.to_string()
        })
    }

    pub fn load(&self) -> LoadedSnapshot {
        LoadedSnapshot {
            messages: self.read(MESSAGES_KEY),
            stats: self.read(STATS_KEY),
        }
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return None,
            Err(err) => {
                tracing::warn!(key, error = %err, "snapshot read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(source) => {
                let err = CodecError::Deserialize { key, source };
                tracing::warn!(key, error = %err, "ignoring malformed snapshot");
                None
            }
        }
    }
}
