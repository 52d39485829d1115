use crate::config::EncoderConfig;

use std::collections::HashMap;

/// Per-encoder application selection, built from the `[[encoder]]` config
/// entries. This is the mapping the dispatcher consults when an encoder
/// command arrives; an unmapped encoder drops the command.
#[derive(Debug, Default)]
pub struct EncoderMap {
    apps: HashMap<u32, String>,
    colors: Vec<(u32, [u8; 3])>,
}

impl EncoderMap {
    /// Build the map from configuration. Later entries for the same encoder
    /// id win, matching the registry's last-write-wins convention.
    pub fn from_config(encoders: &[EncoderConfig]) -> Self {
        let mut apps = HashMap::new();
        let mut colors = Vec::new();

        for entry in encoders {
            if let Some(app) = &entry.app {
                apps.insert(entry.id, app.clone());
            }
            if let Some(color) = entry.color {
                colors.push((entry.id, color));
            }
        }

        Self { apps, colors }
    }

    /// Application name mapped to `encoder`, if any.
    pub fn app_for(&self, encoder: u32) -> Option<&str> {
        self.apps.get(&encoder).map(String::as_str)
    }

    /// Configured indicator colors, pushed to the device after connecting.
    pub fn colors(&self) -> &[(u32, [u8; 3])] {
        &self.colors
    }
}
