//! MusicVault Player - Playback Management
//!
//! Queue and playback state machine for the MusicVault web player.
//!
//! This crate provides:
//! - Play queue with shuffle (Fisher-Yates) and repeat modes (Off, All, One)
//! - Next/previous/jump navigation with restart-on-previous
//! - Seek (fraction of duration or progress-bar click) and volume (0-100%)
//! - Persistence of volume, repeat mode and shuffle flag across page loads
//! - Keyboard shortcut mapping
//! - Observer events for UI synchronization
//!
//! # Architecture
//!
//! `vault-playback` is platform-agnostic:
//! - The playback engine is abstracted as [`MediaSink`]
//! - Persistent storage is abstracted as [`StateStore`]
//! - Browser implementations of both live behind the `wasm` feature
//!
//! The controller never blocks. `play()` completes asynchronously and its
//! outcome is handed back with the [`LoadToken`] of the load that issued it.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use vault_playback::{
//!     LoadToken, MediaSink, MemoryStore, PlaybackController, PlayerConfig, Track,
//! };
//!
//! // A sink that does nothing, standing in for an audio element
//! #[derive(Default)]
//! struct SilentSink {
//!     paused: bool,
//!     position: f64,
//! }
//!
//! impl MediaSink for SilentSink {
//!     fn set_source(&mut self, _url: &str) {
//!         self.position = 0.0;
//!     }
//!     fn load(&mut self) {}
//!     fn play(&mut self, _token: LoadToken) {
//!         self.paused = false;
//!     }
//!     fn pause(&mut self) {
//!         self.paused = true;
//!     }
//!     fn is_paused(&self) -> bool {
//!         self.paused
//!     }
//!     fn set_current_time(&mut self, seconds: f64) {
//!         self.position = seconds;
//!     }
//!     fn current_time(&self) -> f64 {
//!         self.position
//!     }
//!     fn duration(&self) -> Option<f64> {
//!         Some(180.0)
//!     }
//!     fn set_volume(&mut self, _fraction: f64) {}
//! }
//!
//! let tracks = vec![
//!     Track::new("1", "Intro", "/media/songs/intro.mp3"),
//!     Track::new("2", "Theme", "/media/songs/theme.mp3"),
//! ];
//!
//! let mut player = PlaybackController::new(
//!     tracks,
//!     0,
//!     SilentSink::default(),
//!     MemoryStore::new("musicVaultPlayerState"),
//!     PlayerConfig::default(),
//! )?;
//!
//! player.start();
//! player.set_volume(80);
//! player.play_next();
//! assert_eq!(player.current_track().title, "Theme");
//!
//! // Hosts render from events
//! for event in player.drain_events() {
//!     println!("{:?}", event);
//! }
//! # Ok::<(), vault_playback::PlaybackError>(())
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust,ignore
//! player.toggle_shuffle(); // same track keeps playing, order changes
//! player.cycle_repeat();   // off -> all
//! player.cycle_repeat();   // all -> one
//! ```

pub mod controller;
pub mod error;
pub mod events;
pub mod queue;
pub mod shortcuts;
pub mod shuffle;
pub mod sink;
pub mod store;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use controller::{PlayResult, PlaybackController};
pub use error::{PlaybackError, Result};
pub use events::{format_time, PlaybackStatus, PlayerEvent};
pub use queue::QueueState;
pub use shortcuts::{action_for_key, ShortcutAction};
pub use sink::{LoadToken, MediaSink};
pub use store::{FileStore, MemoryStore, PlayerSnapshot, StateStore};
pub use types::{PlayerConfig, RepeatMode, Track, TrackId};
pub use volume::Volume;
