//! Core types for playback management

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Unique track identifier
///
/// The hosting page supplies numeric database ids while stored snapshots may
/// carry either form, so both JSON numbers and strings deserialize into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TrackId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// A single playable item, supplied by the hosting page
///
/// Field names follow the page's queue JSON (`audio_url`, `cover_url`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Source URL handed to the media sink
    pub audio_url: String,

    /// Cover art URL (optional)
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl Track {
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            audio_url: audio_url.into(),
            cover_url: None,
        }
    }

    #[must_use]
    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }
}

/// Repeat mode
///
/// Cycles `Off -> All -> One -> Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }

    /// Next mode in the repeat cycle
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Position (seconds) past which "previous" restarts the current track
    #[serde(default = "default_previous_restart_threshold_secs")]
    pub previous_restart_threshold_secs: f64,

    /// Seek to the saved position when the saved track is the initial one
    #[serde(default)]
    pub restore_position: bool,

    /// Key used by key-value snapshot stores
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Start playing the initial track on `start()`
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,

    /// Volume level (0-100) used when no snapshot provides one
    #[serde(default = "default_volume")]
    pub default_volume: u8,
}

impl PlayerConfig {
    /// Parse a (possibly partial) JSON configuration object
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let threshold = self.previous_restart_threshold_secs;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(PlaybackError::invalid_config(format!(
                "previous_restart_threshold_secs must be a non-negative number, got {}",
                threshold
            )));
        }

        if self.default_volume > 100 {
            return Err(PlaybackError::invalid_config(format!(
                "default_volume must be within 0-100, got {}",
                self.default_volume
            )));
        }

        Ok(())
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            previous_restart_threshold_secs: default_previous_restart_threshold_secs(),
            restore_position: false,
            storage_key: default_storage_key(),
            autoplay: default_autoplay(),
            default_volume: default_volume(),
        }
    }
}

// Default values
fn default_previous_restart_threshold_secs() -> f64 {
    3.0
}

fn default_storage_key() -> String {
    "musicVaultPlayerState".to_string()
}

fn default_autoplay() -> bool {
    true
}

fn default_volume() -> u8 {
    100
}
