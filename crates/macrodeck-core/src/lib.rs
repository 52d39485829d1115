//! MacroDeck Core Library
//!
//! Transport and device-facing subsystems for a serial macro keypad:
//! serial line reader, macro registry, per-application volume control, and
//! key injection.
//!
//! # Example
//!
//! ```no_run
//! use macrodeck_core::{Action, ActionKind, MacroExecutor, MacroRegistry};
//!
//! use std::path::PathBuf;
//!
//! fn main() -> macrodeck_core::CoreResult<()> {
//!     let mut registry = MacroRegistry::new(PathBuf::from("macros.json"));
//!     registry.reload()?;
//!     registry.set("play_button", Action::new(ActionKind::MediaControl, "play/pause"));
//!     registry.save()?;
//!
//!     if let Some(action) = registry.get("play_button") {
//!         MacroExecutor::new().execute(action)?;
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod inject;
mod registry;
mod serial;
mod volume;

pub use {
    error::{PadError, Result as CoreResult},
    inject::MacroExecutor,
    registry::{Action, ActionKind, MacroRegistry},
    serial::{LineCallback, SerialLink, SerialSettings},
    volume::{AudioSessionBackend, VOLUME_STEP, VolumeAdjustment, VolumeController},
};

#[cfg(test)]
mod tests;
