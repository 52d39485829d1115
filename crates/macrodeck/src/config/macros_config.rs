use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Macro persistence section of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacrosConfig {
    /// Override for the macro file location. Defaults to `macros.json`
    /// inside the platform data directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
}
