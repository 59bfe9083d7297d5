//! Shared fixtures for integration tests

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use vault_playback::{
    LoadToken, MediaSink, MemoryStore, PlaybackController, PlayerConfig, StateStore, Track,
};

/// Command issued to the fake sink
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetSource(String),
    Load,
    Play(LoadToken),
    Pause,
    Seek(f64),
    Volume(f64),
}

/// Media sink that records commands and exposes a settable clock
#[derive(Debug)]
pub struct FakeSink {
    pub commands: Vec<Command>,
    pub source: Option<String>,
    pub paused: bool,
    pub position: f64,
    pub duration: Option<f64>,
    pub volume: f64,
}

impl Default for FakeSink {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            source: None,
            paused: true,
            position: 0.0,
            duration: None,
            volume: 1.0,
        }
    }
}

impl FakeSink {
    /// Tokens passed to `play()`, oldest first
    pub fn play_tokens(&self) -> Vec<LoadToken> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Play(token) => Some(*token),
                _ => None,
            })
            .collect()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Seek(s) => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl MediaSink for FakeSink {
    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.position = 0.0;
        self.duration = None;
        self.commands.push(Command::SetSource(url.to_string()));
    }

    fn load(&mut self) {
        self.commands.push(Command::Load);
    }

    fn play(&mut self, token: LoadToken) {
        self.paused = false;
        self.commands.push(Command::Play(token));
    }

    fn pause(&mut self) {
        self.paused = true;
        self.commands.push(Command::Pause);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds;
        self.commands.push(Command::Seek(seconds));
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_volume(&mut self, fraction: f64) {
        self.volume = fraction;
        self.commands.push(Command::Volume(fraction));
    }
}

pub const STORAGE_KEY: &str = "musicVaultPlayerState";

pub fn create_test_track(id: &str) -> Track {
    Track::new(id, format!("Song {}", id), format!("/media/songs/{}.mp3", id))
        .with_cover(format!("/media/covers/{}.jpg", id))
}

/// Tracks with ids "0", "1", ... "n-1"
pub fn numbered_tracks(n: usize) -> Vec<Track> {
    (0..n).map(|i| create_test_track(&i.to_string())).collect()
}

pub fn abc() -> Vec<Track> {
    vec![create_test_track("A"), create_test_track("B"), create_test_track("C")]
}

pub fn build<T: StateStore>(
    tracks: Vec<Track>,
    start: usize,
    store: T,
    config: PlayerConfig,
) -> PlaybackController<FakeSink, T> {
    PlaybackController::with_rng(
        tracks,
        start,
        FakeSink::default(),
        store,
        config,
        StdRng::seed_from_u64(0x5eed),
    )
    .expect("valid controller")
}

pub fn player(tracks: Vec<Track>, start: usize) -> PlaybackController<FakeSink, MemoryStore> {
    build(tracks, start, MemoryStore::new(STORAGE_KEY), PlayerConfig::default())
}

/// Install a fmt subscriber so `RUST_LOG=debug cargo test` shows controller logs
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
