//! `MediaSink` over an HTML audio element

use crate::controller::PlayResult;
use crate::sink::{LoadToken, MediaSink};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// Settled `play()` promises, waiting to be handed to the controller
pub type PlayOutcomes = Rc<RefCell<VecDeque<(LoadToken, PlayResult)>>>;

/// Called after a `play()` promise settles and its outcome is queued
pub type SettledHook = Rc<dyn Fn()>;

/// Media sink backed by the page's `<audio>` element
pub struct HtmlAudioSink {
    audio: HtmlAudioElement,
    outcomes: PlayOutcomes,
    on_settled: Option<SettledHook>,
}

impl HtmlAudioSink {
    pub fn new(audio: HtmlAudioElement) -> Self {
        Self {
            audio,
            outcomes: Rc::new(RefCell::new(VecDeque::new())),
            on_settled: None,
        }
    }

    /// Shared handle to the outcome queue
    pub fn outcomes(&self) -> PlayOutcomes {
        Rc::clone(&self.outcomes)
    }

    /// Run `hook` each time a `play()` promise settles
    pub fn set_on_settled(&mut self, hook: SettledHook) {
        self.on_settled = Some(hook);
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.audio
    }
}

impl MediaSink for HtmlAudioSink {
    fn set_source(&mut self, url: &str) {
        self.audio.set_src(url);
    }

    fn load(&mut self) {
        self.audio.load();
    }

    fn play(&mut self, token: LoadToken) {
        let promise = match self.audio.play() {
            Ok(promise) => promise,
            Err(e) => {
                self.outcomes
                    .borrow_mut()
                    .push_back((token, Err(describe_js_error(&e))));
                return;
            }
        };

        let outcomes = Rc::clone(&self.outcomes);
        let on_settled = self.on_settled.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match JsFuture::from(promise).await {
                Ok(_) => Ok(()),
                Err(e) => {
                    let message = describe_js_error(&e);
                    tracing::debug!("play() for load {} rejected: {}", token, message);
                    Err(message)
                }
            };
            outcomes.borrow_mut().push_back((token, result));
            if let Some(hook) = on_settled {
                hook();
            }
        });
    }

    fn pause(&mut self) {
        if let Err(e) = self.audio.pause() {
            tracing::warn!("Failed to pause audio element: {}", describe_js_error(&e));
        }
    }

    fn is_paused(&self) -> bool {
        self.audio.paused()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.audio.set_current_time(seconds);
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn duration(&self) -> Option<f64> {
        // NaN until metadata loads, Infinity for live streams
        let duration = self.audio.duration();
        duration.is_finite().then_some(duration)
    }

    fn set_volume(&mut self, fraction: f64) {
        self.audio.set_volume(fraction);
    }
}

fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", String::from(error.name()), String::from(error.message()));
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
