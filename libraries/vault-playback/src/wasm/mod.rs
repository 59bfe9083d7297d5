//! WASM bindings for vault-playback
//!
//! Browser implementations of the sink and store capabilities, plus the
//! JavaScript-facing [`WasmPlayer`]. DOM wiring (listeners, icons, queue
//! highlight) stays in the hosting page.

pub mod log;
pub mod player;
pub mod sink;
pub mod store;

pub use player::WasmPlayer;
pub use sink::{HtmlAudioSink, PlayOutcomes};
pub use store::LocalStorageStore;
