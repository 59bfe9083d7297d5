//! Playback controller - core orchestration
//!
//! Translates user commands and media signals into queue transitions and
//! media sink commands, keeping the two consistent. Every observable change
//! is queued as a [`PlayerEvent`]; durable changes are flushed to the
//! [`StateStore`].

use crate::{
    error::Result,
    events::{progress, PlaybackStatus, PlayerEvent},
    queue::{Advance, QueueState, Retreat},
    shortcuts::ShortcutAction,
    sink::{LoadToken, MediaSink},
    store::{PlayerSnapshot, StateStore},
    types::{PlayerConfig, RepeatMode, Track},
    volume::Volume,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Outcome of an asynchronous `play()` request, as reported by the sink
pub type PlayResult = std::result::Result<(), String>;

/// Queue/playback state machine over an injected media sink and state store
pub struct PlaybackController<S, T>
where
    S: MediaSink,
    T: StateStore,
{
    queue: QueueState,
    sink: S,
    store: T,
    config: PlayerConfig,
    volume: Volume,
    rng: StdRng,

    // Token of the most recent load; play outcomes carrying any other are stale
    load_token: LoadToken,

    // Load issued by `start()`, so its rejection can be reported as blocked autoplay
    autoplay_token: Option<LoadToken>,

    // Saved position to seek to once the initial track's duration is known
    pending_restore: Option<f64>,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl<S, T> PlaybackController<S, T>
where
    S: MediaSink,
    T: StateStore,
{
    /// Create a controller for one page load
    ///
    /// Overlays the stored snapshot (volume, repeat mode, shuffle flag) on the
    /// page-supplied queue. Fails on an empty queue or invalid configuration.
    pub fn new(
        tracks: Vec<Track>,
        start_index: usize,
        sink: S,
        store: T,
        config: PlayerConfig,
    ) -> Result<Self> {
        Self::with_rng(tracks, start_index, sink, store, config, StdRng::from_entropy())
    }

    /// Create a controller with an explicit shuffle RNG
    pub fn with_rng(
        tracks: Vec<Track>,
        start_index: usize,
        sink: S,
        store: T,
        config: PlayerConfig,
        rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;
        let queue = QueueState::new(tracks, start_index)?;

        let mut controller = Self {
            queue,
            sink,
            store,
            volume: Volume::new(config.default_volume),
            config,
            rng,
            load_token: LoadToken::first(),
            autoplay_token: None,
            pending_restore: None,
            pending_events: Vec::new(),
        };

        controller.restore_snapshot();
        controller.sink.set_volume(controller.volume.fraction());

        tracing::info!(
            "Player ready: {} tracks, starting at {} (repeat {}, shuffle {})",
            controller.queue.len(),
            controller.queue.current_index(),
            controller.queue.repeat_mode(),
            controller.queue.is_shuffled()
        );

        Ok(controller)
    }

    fn restore_snapshot(&mut self) {
        let Some(snapshot) = self.store.load() else {
            return;
        };

        if let Some(volume) = snapshot.volume.and_then(Volume::from_fraction) {
            self.volume = volume;
            self.emit_volume_changed();
        }

        if let Some(mode) = snapshot.repeat_mode {
            self.queue.set_repeat_mode(mode);
            self.emit_repeat_mode_changed();
        }

        // Only the flag is stored; draw a fresh permutation around the initial track
        if snapshot.is_shuffled == Some(true) && self.queue.set_shuffled(true, &mut self.rng) {
            self.emit_shuffle_changed();
            self.emit_queue_reordered();
        }

        if self.config.restore_position
            && snapshot.current_song_id.as_ref() == Some(&self.queue.current().id)
        {
            self.pending_restore = snapshot
                .current_time
                .filter(|t| t.is_finite() && *t > 0.0);
        }
    }

    // ===== Playback Control =====

    /// Page-load entry point
    ///
    /// Loads the initial track and, when autoplay is configured, starts it.
    /// A rejected autoplay is logged by [`Self::on_play_result`] and otherwise
    /// ignored.
    pub fn start(&mut self) {
        let autoplay = self.config.autoplay;
        self.load_track(autoplay);
        self.autoplay_token = autoplay.then_some(self.load_token);
    }

    /// Load the current track into the sink and start playing it
    pub fn load_current(&mut self) {
        self.pending_restore = None;
        self.load_track(true);
    }

    fn load_track(&mut self, play: bool) {
        let index = self.queue.current_index();
        let track = self.queue.current().clone();
        tracing::info!("Loading track {} \"{}\" at index {}", track.id, track.title, index);

        self.sink.set_source(&track.audio_url);
        self.sink.load();
        self.load_token = self.load_token.next();
        if play {
            self.sink.play(self.load_token);
        }

        self.pending_events.push(PlayerEvent::TrackLoaded {
            index,
            track_id: track.id,
            title: track.title,
            cover_url: track.cover_url,
        });
        self.emit_state_changed(if play {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        });

        self.persist();
    }

    /// Play when paused, pause when playing
    pub fn toggle_play_pause(&mut self) {
        if self.sink.is_paused() {
            // A user-initiated play is no longer an autoplay attempt
            self.autoplay_token = None;
            self.sink.play(self.load_token);
            self.emit_state_changed(PlaybackStatus::Playing);
        } else {
            self.sink.pause();
            self.emit_state_changed(PlaybackStatus::Paused);
        }
    }

    /// Skip to next track
    ///
    /// Repeat-one restarts the current track. Past the end, repeat-all wraps
    /// to the first track; otherwise playback pauses on the last track.
    pub fn play_next(&mut self) {
        match self.queue.advance() {
            Advance::RestartCurrent => self.restart_current(),
            Advance::Moved(_) | Advance::Wrapped(_) => self.load_current(),
            Advance::EndOfQueue => {
                tracing::debug!("End of queue reached, pausing");
                self.sink.pause();
                self.emit_state_changed(PlaybackStatus::Paused);
            }
        }
    }

    /// Go to previous track
    ///
    /// Past the restart threshold the current track restarts instead. At the
    /// first track, repeat-all wraps to the last; otherwise the current track
    /// rewinds without reloading.
    pub fn play_previous(&mut self) {
        let position = self.sink.current_time();
        if position > self.config.previous_restart_threshold_secs {
            tracing::debug!("Restarting current track from {:.1}s", position);
            self.sink.set_current_time(0.0);
            return;
        }

        match self.queue.retreat() {
            Retreat::Moved(_) | Retreat::Wrapped(_) => self.load_current(),
            Retreat::StartOfQueue => self.sink.set_current_time(0.0),
        }
    }

    /// Jump to a position in the current order
    ///
    /// Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) {
        match self.queue.jump_to(index) {
            Ok(()) => self.load_current(),
            Err(e) => {
                tracing::debug!("Ignoring jump in queue of {} tracks: {}", self.queue.len(), e);
            }
        }
    }

    /// Handle the sink's "ended" signal
    pub fn on_track_ended(&mut self) {
        if self.queue.repeat_mode() == RepeatMode::One {
            self.restart_current();
        } else {
            self.play_next();
        }
    }

    fn restart_current(&mut self) {
        self.autoplay_token = None;
        self.sink.set_current_time(0.0);
        self.sink.play(self.load_token);
        self.emit_state_changed(PlaybackStatus::Playing);
    }

    /// Run the transport command bound to a keyboard shortcut
    pub fn handle_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::PlayPause => self.toggle_play_pause(),
            ShortcutAction::Next => self.play_next(),
            ShortcutAction::Previous => self.play_previous(),
        }
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle, keeping the now-playing track current
    ///
    /// Does not reload the sink.
    pub fn toggle_shuffle(&mut self) {
        let shuffled = self.queue.toggle_shuffle(&mut self.rng);
        tracing::info!("Shuffle {}", if shuffled { "on" } else { "off" });

        self.emit_shuffle_changed();
        self.emit_queue_reordered();
        self.persist();
    }

    /// Advance repeat mode `off -> all -> one -> off`
    pub fn cycle_repeat(&mut self) {
        let mode = self.queue.cycle_repeat();
        tracing::info!("Repeat mode: {}", mode);

        self.emit_repeat_mode_changed();
        self.persist();
    }

    // ===== Seek =====

    /// Seek to a fraction of the track (0.0 = start, 1.0 = end)
    pub fn seek(&mut self, fraction: f64) {
        if fraction.is_nan() {
            tracing::debug!("Ignoring seek to NaN");
            return;
        }

        match self.known_duration() {
            Some(duration) => self.sink.set_current_time(fraction.clamp(0.0, 1.0) * duration),
            None => tracing::debug!("Ignoring seek before duration is known"),
        }
    }

    /// Seek from a click at `offset_x` on a progress bar `width` pixels wide
    pub fn seek_to_click(&mut self, offset_x: f64, width: f64) {
        if !width.is_finite() || width <= 0.0 {
            tracing::debug!("Ignoring seek on progress bar of width {}", width);
            return;
        }
        self.seek(offset_x / width);
    }

    fn known_duration(&self) -> Option<f64> {
        self.sink
            .duration()
            .filter(|d| d.is_finite() && *d > 0.0)
    }

    // ===== Volume =====

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.sink.set_volume(self.volume.fraction());

        self.emit_volume_changed();
        self.persist();
    }

    // ===== Media Signals =====

    /// Handle the sink's periodic position update
    pub fn on_time_update(&mut self) {
        let position_secs = self.sink.current_time();
        let duration_secs = self.known_duration();
        self.pending_events.push(PlayerEvent::PositionUpdate {
            position_secs,
            duration_secs,
            progress: progress(position_secs, duration_secs),
        });
    }

    /// Handle the sink's "metadata loaded" signal
    ///
    /// Also applies an opt-in saved position, once, for the initial track.
    pub fn on_duration_known(&mut self) {
        let Some(duration_secs) = self.known_duration() else {
            tracing::debug!("Duration signal without a usable duration");
            return;
        };

        self.pending_events
            .push(PlayerEvent::DurationKnown { duration_secs });

        if let Some(position) = self.pending_restore.take() {
            if position < duration_secs {
                tracing::info!("Restoring saved position {:.1}s", position);
                self.sink.set_current_time(position);
            } else {
                tracing::debug!(
                    "Saved position {:.1}s past track end {:.1}s, not restoring",
                    position,
                    duration_secs
                );
            }
        }
    }

    /// Handle completion of an asynchronous `play()` request
    ///
    /// Outcomes from superseded loads are dropped. A failure is logged and
    /// reported; the queue position is not rolled back.
    pub fn on_play_result(&mut self, token: LoadToken, result: PlayResult) {
        if token != self.load_token {
            tracing::debug!(
                "Ignoring stale play outcome {} (current load {})",
                token,
                self.load_token
            );
            return;
        }

        let Err(message) = result else {
            return;
        };

        if self.autoplay_token == Some(token) {
            tracing::warn!("Auto-play prevented: {}", message);
        } else {
            tracing::warn!("Playback error: {}", message);
        }

        self.pending_events.push(PlayerEvent::PlaybackFailed {
            track_id: self.queue.current().id.clone(),
            message,
        });
        self.emit_state_changed(PlaybackStatus::Paused);
    }

    // ===== State Queries =====

    pub fn queue(&self) -> &QueueState {
        &self.queue
    }

    pub fn current_index(&self) -> usize {
        self.queue.current_index()
    }

    pub fn current_track(&self) -> &Track {
        self.queue.current()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.queue.repeat_mode()
    }

    pub fn is_shuffled(&self) -> bool {
        self.queue.is_shuffled()
    }

    /// Volume level (0-100)
    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    pub fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    /// Token of the most recent load
    pub fn load_token(&self) -> LoadToken {
        self.load_token
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable sink access, for hosts that drive the sink's clock
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    /// Durable state as it would be persisted now
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_song_id: Some(self.queue.current().id.clone()),
            current_time: Some(self.sink.current_time()),
            volume: Some(self.volume.fraction()),
            repeat_mode: Some(self.queue.repeat_mode()),
            is_shuffled: Some(self.queue.is_shuffled()),
        }
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.store.save(&snapshot) {
            tracing::warn!("Failed to persist player state: {}", e);
        }
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events that have been queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn emit_state_changed(&mut self, state: PlaybackStatus) {
        self.pending_events.push(PlayerEvent::StateChanged { state });
    }

    fn emit_shuffle_changed(&mut self) {
        self.pending_events.push(PlayerEvent::ShuffleChanged {
            shuffled: self.queue.is_shuffled(),
        });
    }

    fn emit_queue_reordered(&mut self) {
        self.pending_events.push(PlayerEvent::QueueReordered {
            order: self.queue.order_ids(),
            current_index: self.queue.current_index(),
        });
    }

    fn emit_repeat_mode_changed(&mut self) {
        self.pending_events.push(PlayerEvent::RepeatModeChanged {
            mode: self.queue.repeat_mode(),
        });
    }

    fn emit_volume_changed(&mut self) {
        self.pending_events.push(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
        });
    }
}
