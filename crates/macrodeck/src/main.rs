//! MacroDeck: host-side service for a serial macro keypad — replays
//! configured key macros and adjusts per-application playback volume.

mod app;
mod config;
mod device_command;
mod encoder_map;
mod error;
mod serial_bridge;
mod status;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    encoder_map::EncoderMap,
    error::{AppError, Result as AppResult},
    status::StatusSink,
};

use crate::config::Config;

use std::sync::Arc;

use macrodeck_core::{MacroExecutor, MacroRegistry, SerialLink, VolumeController};
use tokio::sync::{Mutex, Semaphore};
use tracing::{error, info, warn};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("macrodeck=debug,macrodeck_core=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let macros_path = match config.macros_path() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to resolve macro file path: {:?}", e);
            std::process::exit(1);
        }
    };

    let status = StatusSink::log_only();

    let mut registry = MacroRegistry::new(macros_path);
    match registry.reload() {
        Ok(loaded) => info!(count = loaded.len(), "Macros loaded"),
        // Corrupt file: keep running with the in-memory (empty) map rather
        // than halting; the operator sees the cause and can fix the file.
        Err(e) => status.report(format!("Failed to load macros: {e}")),
    }

    let (callback, line_rx) = serial_bridge::line_channel(256);

    let mut serial = SerialLink::new(config.serial.settings(), callback);
    if let Err(e) = serial.start() {
        warn!(error = %e, "Serial port unavailable; fix [serial] config and restart");
    }

    let app = App {
        serial: Arc::new(Mutex::new(serial)),
        registry: Arc::new(Mutex::new(registry)),
        volume: Arc::new(VolumeController::new()),
        executor: Arc::new(MacroExecutor::new()),
        encoders: EncoderMap::from_config(&config.encoders),
        status,
        line_rx,
        volume_permits: Arc::new(Semaphore::new(app::MAX_CONCURRENT_VOLUME_TASKS)),
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(app.run()) {
        error!(error = ?e, "App error");
    }
}
