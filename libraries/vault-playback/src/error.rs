//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Transport commands never surface these; they are returned only by
/// construction, configuration parsing and snapshot storage.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue has no tracks
    #[error("Queue is empty")]
    EmptyQueue,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Snapshot storage backend failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid player configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON encoding/decoding error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlaybackError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
