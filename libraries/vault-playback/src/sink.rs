//! Platform-agnostic media sink trait
//!
//! Abstracts the playback engine (an HTML audio element in the browser, a
//! recording fake in tests). The controller only issues commands and reads
//! the playback clock; decoding and buffering stay on the other side.

use std::fmt;

/// Identifies one `load_current` request
///
/// `play()` completes asynchronously. The sink hands the token back with the
/// outcome so the controller can drop completions from superseded loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadToken(u64);

impl LoadToken {
    pub(crate) fn first() -> Self {
        Self(0)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Playback engine capability
///
/// Implementors must not block. `play()` is fire-and-forget: a failure is
/// reported later through `PlaybackController::on_play_result` with the same
/// token.
pub trait MediaSink {
    /// Point the engine at a new source URL
    fn set_source(&mut self, url: &str);

    /// Begin loading the current source
    fn load(&mut self);

    /// Request playback; the outcome arrives asynchronously
    fn play(&mut self, token: LoadToken);

    /// Pause playback, keeping the source loaded
    fn pause(&mut self);

    /// Whether the engine is currently paused
    fn is_paused(&self) -> bool;

    /// Move the playback position (seconds from start)
    fn set_current_time(&mut self, seconds: f64);

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Track duration in seconds, `None` until metadata is known
    fn duration(&self) -> Option<f64>;

    /// Set output volume as a linear 0.0-1.0 fraction
    fn set_volume(&mut self, fraction: f64);
}

/// Recording sink for unit tests
///
/// Keeps a log of every command and lets tests drive the playback clock.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub commands: Vec<SinkCommand>,
    pub source: Option<String>,
    pub paused: bool,
    pub position: f64,
    pub duration: Option<f64>,
    pub volume: f64,
    pub play_tokens: Vec<LoadToken>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SinkCommand {
    SetSource(String),
    Load,
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self {
            paused: true,
            volume: 1.0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl MediaSink for RecordingSink {
    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.position = 0.0;
        self.duration = None;
        self.commands.push(SinkCommand::SetSource(url.to_string()));
    }

    fn load(&mut self) {
        self.commands.push(SinkCommand::Load);
    }

    fn play(&mut self, token: LoadToken) {
        self.paused = false;
        self.play_tokens.push(token);
        self.commands.push(SinkCommand::Play);
    }

    fn pause(&mut self) {
        self.paused = true;
        self.commands.push(SinkCommand::Pause);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds;
        self.commands.push(SinkCommand::Seek(seconds));
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_volume(&mut self, fraction: f64) {
        self.volume = fraction;
        self.commands.push(SinkCommand::Volume(fraction));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase() {
        let first = LoadToken::first();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 1);
        assert_eq!(second.to_string(), "#1");
    }

    #[test]
    fn recording_sink_resets_clock_on_new_source() {
        let mut sink = RecordingSink::new();
        sink.position = 42.0;
        sink.duration = Some(180.0);

        sink.set_source("/media/songs/a.mp3");
        assert_eq!(sink.current_time(), 0.0);
        assert_eq!(sink.duration(), None);
        assert_eq!(
            sink.commands,
            vec![SinkCommand::SetSource("/media/songs/a.mp3".to_string())]
        );
    }
}
