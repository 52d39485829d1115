use serde::{Deserialize, Serialize};

/// One `[[encoder]]` entry: which application a rotary encoder controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Encoder id as reported by the device (`Enc<id>: …`).
    pub id: u32,
    /// Process name of the application whose volume this encoder adjusts.
    /// Unset means incoming commands for this encoder are dropped.
    #[serde(default)]
    pub app: Option<String>,
    /// Indicator color pushed to the device after connecting, as `[r, g, b]`.
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}
