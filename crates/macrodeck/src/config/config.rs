//! Configuration management for macrodeck.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{EncoderConfig, MacrosConfig, SerialConfig},
};

use std::{fs, io::Write, panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Serial connection settings.
    pub serial: SerialConfig,
    /// Per-encoder application mappings and indicator colors.
    #[serde(default, rename = "encoder")]
    pub encoders: Vec<EncoderConfig>,
    /// Macro persistence settings.
    #[serde(default)]
    pub macros: MacrosConfig,
}

impl Config {
    /// Load configuration from disk, creating a default if not found.
    ///
    /// The configured serial port is not probed here — `SerialLink::start`
    /// reports an unreachable port at connect time, and the app keeps
    /// running so the operator can fix the config and restart the link.
    #[track_caller]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .and_then(|()| temp_file.sync_all())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Path of the macro file, honoring the `[macros] file` override.
    ///
    /// Ensures the parent directory exists so a later registry save cannot
    /// fail on a missing directory.
    #[track_caller]
    pub fn macros_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.macros.file {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            return Ok(path.clone());
        }

        let proj_dirs = Self::project_dirs()?;
        let data_dir = proj_dirs.data_dir();
        fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("macros.json"))
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "macrodeck", "MacroDeck").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let config = Config {
            serial: SerialConfig {
                port: default_port().to_string(),
                baud_rate: crate::config::DEFAULT_BAUD_RATE,
                read_timeout_ms: crate::config::DEFAULT_READ_TIMEOUT_MS,
            },
            encoders: Vec::new(),
            macros: MacrosConfig::default(),
        };

        config.save()?;

        warn!(
            port = %config.serial.port,
            "Default config created. Set the serial port and encoder mappings before use."
        );

        Ok(config)
    }
}

fn default_port() -> &'static str {
    #[cfg(windows)]
    {
        "COM20"
    }
    #[cfg(not(windows))]
    {
        "/dev/ttyACM0"
    }
}
