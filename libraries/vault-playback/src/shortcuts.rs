//! Keyboard shortcuts
//!
//! Maps `KeyboardEvent.code` values to transport actions. The hosting page
//! listens for `keydown`, asks [`action_for_key`] what to do, calls
//! `preventDefault()` when an action comes back, and hands the action to
//! `PlaybackController::handle_shortcut`.
//!
//! # Example
//!
//! ```rust
//! use vault_playback::shortcuts::{action_for_key, ShortcutAction};
//!
//! assert_eq!(action_for_key("Space", false), Some(ShortcutAction::PlayPause));
//! // Typing a space into the search box must not pause the music
//! assert_eq!(action_for_key("Space", true), None);
//! assert_eq!(action_for_key("ArrowRight", true), Some(ShortcutAction::Next));
//! ```

use serde::{Deserialize, Serialize};

/// Available shortcut actions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    /// Play or pause playback
    PlayPause,
    /// Skip to next track
    Next,
    /// Skip to previous track
    Previous,
}

impl ShortcutAction {
    /// Convert action to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayPause => "play_pause",
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }

    /// Parse action from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "play_pause" => Some(Self::PlayPause),
            "next" => Some(Self::Next),
            "previous" => Some(Self::Previous),
            _ => None,
        }
    }
}

/// A key bound to an action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Action triggered by this key
    pub action: ShortcutAction,
    /// `KeyboardEvent.code` value (e.g., `Space`, `ArrowRight`)
    pub code: String,
    /// Whether the key is ignored while focus is in a text input
    pub ignore_in_text_input: bool,
}

/// Built-in key bindings
pub fn default_bindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding {
            action: ShortcutAction::PlayPause,
            code: "Space".to_string(),
            ignore_in_text_input: true,
        },
        KeyBinding {
            action: ShortcutAction::Next,
            code: "ArrowRight".to_string(),
            ignore_in_text_input: false,
        },
        KeyBinding {
            action: ShortcutAction::Previous,
            code: "ArrowLeft".to_string(),
            ignore_in_text_input: false,
        },
    ]
}

/// Resolve a key press against the built-in bindings
pub fn action_for_key(code: &str, in_text_input: bool) -> Option<ShortcutAction> {
    default_bindings()
        .into_iter()
        .find(|binding| binding.code == code)
        .filter(|binding| !(in_text_input && binding.ignore_in_text_input))
        .map(|binding| binding.action)
}
