//! WASM-compatible PlaybackController wrapper

use super::log;
use super::sink::{HtmlAudioSink, PlayOutcomes};
use super::store::LocalStorageStore;
use crate::{format_time, shortcuts, PlaybackController, PlaybackError, PlayerConfig, Track};
use js_sys::Function;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

type Controller = PlaybackController<HtmlAudioSink, LocalStorageStore>;

/// WASM-compatible player
///
/// Wraps the core controller with a JavaScript-friendly API. Every call, and
/// every settled `play()` promise, hands pending `play()` outcomes to the
/// controller and then forwards queued events to the registered callback.
#[wasm_bindgen]
pub struct WasmPlayer {
    shared: Rc<Shared>,
}

/// State reachable from both JavaScript calls and settled `play()` promises
struct Shared {
    inner: RefCell<Controller>,
    outcomes: PlayOutcomes,
    on_event: RefCell<Option<Function>>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player for the page's audio element and queue
    ///
    /// `queue` is the page's track array (`id`, `title`, `audio_url`,
    /// `cover_url`). `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        audio: HtmlAudioElement,
        queue: JsValue,
        start_index: usize,
        config: JsValue,
    ) -> Result<WasmPlayer, JsValue> {
        // Enable panic hooks and logging for better error messages in console
        console_error_panic_hook::set_once();
        log::init();

        let tracks: Vec<Track> = serde_wasm_bindgen::from_value(queue)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse queue: {}", e)))?;

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };

        let sink = HtmlAudioSink::new(audio);
        let outcomes = sink.outcomes();
        let store = LocalStorageStore::new(config.storage_key.clone());
        let inner =
            PlaybackController::new(tracks, start_index, sink, store, config).map_err(to_js)?;

        let shared = Rc::new(Shared {
            inner: RefCell::new(inner),
            outcomes,
            on_event: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        shared
            .inner
            .borrow_mut()
            .sink_mut()
            .set_on_settled(Rc::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.flush();
                }
            }));

        Ok(Self { shared })
    }

    // ===== Playback Control =====

    /// Load the initial track and autoplay it if configured
    pub fn start(&self) {
        self.with_inner(Controller::start);
    }

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) {
        self.with_inner(Controller::toggle_play_pause);
    }

    #[wasm_bindgen(js_name = playNext)]
    pub fn play_next(&self) {
        self.with_inner(Controller::play_next);
    }

    #[wasm_bindgen(js_name = playPrevious)]
    pub fn play_previous(&self) {
        self.with_inner(Controller::play_previous);
    }

    /// Jump to a queue index; out-of-range indices are ignored
    #[wasm_bindgen(js_name = jumpTo)]
    pub fn jump_to(&self, index: usize) {
        self.with_inner(|p| p.jump_to(index));
    }

    // ===== Shuffle & Repeat =====

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&self) {
        self.with_inner(Controller::toggle_shuffle);
    }

    #[wasm_bindgen(js_name = cycleRepeat)]
    pub fn cycle_repeat(&self) {
        self.with_inner(Controller::cycle_repeat);
    }

    // ===== Seek & Volume =====

    /// Seek to a fraction (0.0 - 1.0) of the track
    pub fn seek(&self, fraction: f64) {
        self.with_inner(|p| p.seek(fraction));
    }

    /// Seek from a progress-bar click (`event.offsetX`, bar `offsetWidth`)
    #[wasm_bindgen(js_name = seekToClick)]
    pub fn seek_to_click(&self, offset_x: f64, width: f64) {
        self.with_inner(|p| p.seek_to_click(offset_x, width));
    }

    /// Set volume (0-100)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, level: u8) {
        self.with_inner(|p| p.set_volume(level));
    }

    // ===== Media Signals =====

    /// Forward the audio element's `ended` event
    #[wasm_bindgen(js_name = onTrackEnded)]
    pub fn on_track_ended(&self) {
        self.with_inner(Controller::on_track_ended);
    }

    /// Forward the audio element's `timeupdate` event
    #[wasm_bindgen(js_name = onTimeUpdate)]
    pub fn on_time_update(&self) {
        self.with_inner(Controller::on_time_update);
    }

    /// Forward the audio element's `loadedmetadata` event
    #[wasm_bindgen(js_name = onDurationKnown)]
    pub fn on_duration_known(&self) {
        self.with_inner(Controller::on_duration_known);
    }

    /// Hand settled `play()` outcomes to the controller
    ///
    /// Outcomes are already handled as each promise settles; kept for hosts
    /// that poll.
    #[wasm_bindgen(js_name = processPlayResults)]
    pub fn process_play_results(&self) {
        self.shared.flush();
    }

    /// Handle a `keydown` event
    ///
    /// Returns true when the key was handled and the page should call
    /// `preventDefault()`.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, code: &str, in_text_input: bool) -> bool {
        let Some(action) = shortcuts::action_for_key(code, in_text_input) else {
            return false;
        };
        self.with_inner(|p| p.handle_shortcut(action));
        true
    }

    // ===== State Queries =====

    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.shared.inner.borrow().current_index()
    }

    /// Current repeat mode ("off" | "all" | "one")
    #[wasm_bindgen(js_name = repeatMode)]
    pub fn repeat_mode(&self) -> String {
        self.shared.inner.borrow().repeat_mode().as_str().to_string()
    }

    #[wasm_bindgen(js_name = isShuffled)]
    pub fn is_shuffled(&self) -> bool {
        self.shared.inner.borrow().is_shuffled()
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> bool {
        self.shared.inner.borrow().is_paused()
    }

    /// Current volume (0-100)
    pub fn volume(&self) -> u8 {
        self.shared.inner.borrow().volume()
    }

    /// Track ids in the order currently in effect
    #[wasm_bindgen(js_name = queueOrder)]
    pub fn queue_order(&self) -> JsValue {
        let order = self.shared.inner.borrow().queue().order_ids();
        serde_wasm_bindgen::to_value(&order).unwrap_or(JsValue::NULL)
    }

    // ===== Event Listeners =====

    /// Register the event callback; receives one event object per call
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        *self.shared.on_event.borrow_mut() = Some(callback);
    }
}

impl WasmPlayer {
    fn with_inner(&self, f: impl FnOnce(&mut Controller)) {
        match self.shared.inner.try_borrow_mut() {
            Ok(mut inner) => f(&mut inner),
            Err(_) => {
                tracing::warn!("Ignoring re-entrant player call");
                return;
            }
        }
        self.shared.flush();
    }
}

impl Shared {
    fn flush(&self) {
        let events = {
            // Busy means a call is in progress; its own flush picks the outcomes up
            let Ok(mut inner) = self.inner.try_borrow_mut() else {
                return;
            };
            let settled: Vec<_> = self.outcomes.borrow_mut().drain(..).collect();
            for (token, result) in settled {
                inner.on_play_result(token, result);
            }
            inner.drain_events()
        };

        let callback = self.on_event.borrow().clone();
        let Some(cb) = callback else {
            return;
        };
        for event in events {
            match serde_wasm_bindgen::to_value(&event) {
                Ok(js_event) => {
                    cb.call1(&JsValue::NULL, &js_event).ok();
                }
                Err(e) => tracing::warn!("Failed to serialize {:?}: {}", event, e),
            }
        }
    }
}

/// Render seconds as `m:ss` for the time labels
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time_js(seconds: f64) -> String {
    format_time(seconds)
}

fn to_js(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
