//! OS key-event injection for macro actions.
//!
//! One primitive: resolve the configured identifier to a key and click it.
//! The action kind records intent only — all four kinds execute identically.

use crate::{CoreResult, PadError, registry::Action};

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::{debug, instrument};

/// Maps actions to OS-level key events.
///
/// Injection is synchronous and may involve small platform sleeps; run it
/// off any latency-sensitive thread (e.g. under `spawn_blocking`).
pub struct MacroExecutor;

impl MacroExecutor {
    /// Create an executor.
    pub fn new() -> Self {
        Self
    }

    /// Inject the key event for `action`.
    ///
    /// An unrecognized identifier or input-backend failure surfaces as
    /// [`PadError::Injection`] — reportable, never fatal.
    ///
    /// A fresh `Enigo` is created per call: it is not `Send`, construction
    /// is cheap, and this keeps the executor usable from blocking tasks on
    /// any thread.
    #[track_caller]
    #[instrument(skip(self, action), fields(kind = %action.kind, value = %action.value))]
    pub fn execute(&self, action: &Action) -> CoreResult<()> {
        let key = lookup_key(&action.value).ok_or_else(|| {
            PadError::injection(format!(
                "unrecognized key identifier '{}' for {}",
                action.value, action.kind
            ))
        })?;

        let mut enigo = Enigo::new(&Settings::default())
            .map_err(|e| PadError::injection(format!("failed to initialize input backend: {e}")))?;

        enigo
            .key(key, Direction::Click)
            .map_err(|e| PadError::injection(format!("failed to send '{}': {e}", action.value)))?;

        debug!("Key injected");

        Ok(())
    }
}

impl Default for MacroExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a configured key identifier to an injectable key.
///
/// Identifiers are case-insensitive. Single characters map to themselves;
/// everything else goes through the name table.
pub(crate) fn lookup_key(value: &str) -> Option<Key> {
    let name = value.trim().to_lowercase();

    if let Some(key) = named_key(&name) {
        return Some(key);
    }
    if let Some(key) = function_key(&name) {
        return Some(key);
    }
    if let Some(key) = media_key(&name) {
        return Some(key);
    }

    // Single printable character, as typed.
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(Key::Unicode(c)),
        _ => None,
    }
}

fn named_key(name: &str) -> Option<Key> {
    let key = match name {
        "enter" | "return" => Key::Return,
        "space" => Key::Space,
        "tab" => Key::Tab,
        "esc" | "escape" => Key::Escape,
        "backspace" => Key::Backspace,
        "del" | "delete" => Key::Delete,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" | "page up" => Key::PageUp,
        "pagedown" | "page down" => Key::PageDown,
        "up" => Key::UpArrow,
        "down" => Key::DownArrow,
        "left" => Key::LeftArrow,
        "right" => Key::RightArrow,
        "capslock" | "caps lock" => Key::CapsLock,
        "ctrl" | "control" => Key::Control,
        "alt" => Key::Alt,
        "shift" => Key::Shift,
        "win" | "meta" | "cmd" | "super" => Key::Meta,
        _ => return None,
    };
    Some(key)
}

fn function_key(name: &str) -> Option<Key> {
    let key = match name {
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        _ => return None,
    };
    Some(key)
}

// Media key injection uses virtual-key codes that enigo only exposes on
// Windows; elsewhere these identifiers report as unrecognized.
#[cfg(windows)]
fn media_key(name: &str) -> Option<Key> {
    let key = match name {
        "play/pause" | "playpause" => Key::MediaPlayPause,
        "next track" | "nexttrack" => Key::MediaNextTrack,
        "prev track" | "prevtrack" => Key::MediaPrevTrack,
        "volume up" | "volumeup" => Key::VolumeUp,
        "volume down" | "volumedown" => Key::VolumeDown,
        "mute" => Key::VolumeMute,
        _ => return None,
    };
    Some(key)
}

#[cfg(not(windows))]
fn media_key(_name: &str) -> Option<Key> {
    None
}
