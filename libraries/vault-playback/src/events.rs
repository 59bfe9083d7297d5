//! Player Events
//!
//! Event-based communication for UI synchronization. The controller queues
//! an event at every observable change; the host drains them after each call
//! and updates title, cover, icons, progress bar and queue highlight.

use crate::types::{RepeatMode, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// A track was loaded into the media sink
    TrackLoaded {
        /// Position in the order currently in effect
        index: usize,
        /// ID of the loaded track
        track_id: TrackId,
        /// Title to display
        title: String,
        /// Cover art to display, if the track has one
        cover_url: Option<String>,
    },

    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackStatus,
    },

    /// Queue order changed (shuffle toggled)
    QueueReordered {
        /// Track ids in the new order
        order: Vec<TrackId>,
        /// Index of the now-playing track in the new order
        current_index: usize,
    },

    /// Shuffle flag changed
    ShuffleChanged { shuffled: bool },

    /// Repeat mode changed
    RepeatModeChanged { mode: RepeatMode },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
    },

    /// Position update, driven by the sink's time updates
    PositionUpdate {
        position_secs: f64,
        /// `None` until metadata is known
        duration_secs: Option<f64>,
        /// Fraction of the track played (0.0-1.0)
        progress: f64,
    },

    /// Track metadata arrived and the duration is now known
    DurationKnown { duration_secs: f64 },

    /// The media sink refused to start playback
    PlaybackFailed {
        /// Track whose playback failed
        track_id: TrackId,
        /// Error reported by the sink
        message: String,
    },
}

/// Playback state for events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// Playing audio
    Playing,
    /// Paused, or stopped at the end of the queue
    Paused,
}

/// Fraction of the track played, 0.0 while the duration is unknown
pub fn progress(position_secs: f64, duration_secs: Option<f64>) -> f64 {
    match duration_secs {
        Some(duration) if duration.is_finite() && duration > 0.0 && position_secs.is_finite() => {
            (position_secs / duration).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

/// Render seconds as `m:ss`
///
/// Unknown values (NaN, infinite, negative) render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}
