//! Player state persistence
//!
//! A small JSON snapshot (volume, repeat mode, shuffle flag, and where
//! playback was) survives page loads. The shuffle permutation itself is never
//! stored, only the flag.

use crate::error::{PlaybackError, Result};
use crate::types::{RepeatMode, TrackId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Persisted player state
///
/// Every field is optional on load; missing or unusable fields fall back to
/// defaults instead of discarding the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Track playing when the snapshot was taken
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_song_id: Option<TrackId>,

    /// Playback position in seconds
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_time: Option<f64>,

    /// Volume as a 0.0-1.0 fraction
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume: Option<f64>,

    /// Repeat mode; unknown strings are ignored
    #[serde(
        default,
        deserialize_with = "lenient_repeat_mode",
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_mode: Option<RepeatMode>,

    /// Shuffle flag
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_shuffled: Option<bool>,
}

/// Decode one field, treating a value of the wrong shape as absent
fn lenient<'de, D, V>(deserializer: D) -> std::result::Result<Option<V>, D::Error>
where
    D: Deserializer<'de>,
    V: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::debug!("Ignoring unusable snapshot field: {}", e);
            None
        }
    }))
}

fn lenient_repeat_mode<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<RepeatMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(RepeatMode::from_str))
}

/// Decode a stored snapshot
///
/// Malformed input is logged and treated as "no prior state".
pub fn decode_snapshot(raw: &str) -> Option<PlayerSnapshot> {
    match serde_json::from_str(raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!("Ignoring malformed player snapshot: {}", e);
            None
        }
    }
}

/// Encode a snapshot for storage
pub fn encode_snapshot(snapshot: &PlayerSnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Snapshot storage capability
pub trait StateStore {
    /// Load the last saved snapshot, if any
    fn load(&self) -> Option<PlayerSnapshot>;

    /// Replace the saved snapshot
    fn save(&mut self, snapshot: &PlayerSnapshot) -> Result<()>;
}

/// In-process key-value store
///
/// Mirrors browser local storage: snapshots are kept as JSON text under a key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    key: String,
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: HashMap::new(),
        }
    }

    /// Seed the store with raw text, as if a previous page had written it
    pub fn with_raw(key: impl Into<String>, raw: impl Into<String>) -> Self {
        let mut store = Self::new(key);
        store.entries.insert(store.key.clone(), raw.into());
        store
    }

    /// Raw JSON text currently stored under the key
    pub fn raw(&self) -> Option<&str> {
        self.entries.get(&self.key).map(String::as_str)
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Option<PlayerSnapshot> {
        self.raw().and_then(decode_snapshot)
    }

    fn save(&mut self, snapshot: &PlayerSnapshot) -> Result<()> {
        let raw = encode_snapshot(snapshot)?;
        self.entries.insert(self.key.clone(), raw);
        Ok(())
    }
}

/// JSON file on disk, for native hosts
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Option<PlayerSnapshot> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode_snapshot(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read player snapshot {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn save(&mut self, snapshot: &PlayerSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let raw = encode_snapshot(snapshot)?;
        std::fs::write(&self.path, raw).map_err(|e| {
            PlaybackError::storage(format!("cannot write {}: {}", self.path.display(), e))
        })
    }
}
