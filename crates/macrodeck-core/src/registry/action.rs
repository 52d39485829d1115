use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a macro's configured value.
///
/// All four kinds execute through the same key-injection primitive; the kind
/// records configuration intent and constrains the value set offered at
/// configuration time. Serialized with the human-readable labels the macro
/// file has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// A plain keyboard key or single character.
    #[serde(rename = "Keyboard Key")]
    KeyboardKey,
    /// A media transport or volume key.
    #[serde(rename = "Media Control")]
    MediaControl,
    /// One of the function keys F1..F12.
    #[serde(rename = "Function Key")]
    FunctionKey,
    /// A modifier key pressed and released on its own.
    #[serde(rename = "Modifier Key")]
    ModifierKey,
}

impl ActionKind {
    /// The label used in the macro file and in status messages.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::KeyboardKey => "Keyboard Key",
            ActionKind::MediaControl => "Media Control",
            ActionKind::FunctionKey => "Function Key",
            ActionKind::ModifierKey => "Modifier Key",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed macro action: what to inject when its command arrives.
///
/// `value` is not validated at registration time; an unrecognized identifier
/// surfaces as an injection failure at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Kind of key this action injects.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Key identifier, e.g. `a`, `f5`, `play/pause`, `alt`.
    #[serde(rename = "action")]
    pub value: String,
}

impl Action {
    /// Convenience constructor.
    pub fn new(kind: ActionKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
