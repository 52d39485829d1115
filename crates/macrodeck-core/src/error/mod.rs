use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors raised by the macrodeck core subsystems.
///
/// All variants include `ErrorLocation` for call-site tracking.
///
/// Expected environmental conditions (target application not running, macro
/// not yet configured) are *not* errors — they are ordinary outcomes modelled
/// in the respective return types.
#[derive(Error, Debug)]
pub enum PadError {
    /// Serial port could not be opened, or an open connection failed.
    ///
    /// Non-fatal: the link stays down until an explicit restart.
    #[error("Serial connection error: {reason} {location}")]
    Connection {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Write attempted while no serial connection is open.
    #[error("Serial port not connected {location}")]
    NotConnected {
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Macro file could not be written.
    #[error("Failed to persist macros: {reason} {location}")]
    Persistence {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Macro file exists but its contents could not be parsed.
    ///
    /// The in-memory map is left untouched; the caller decides whether to
    /// keep stale state or halt.
    #[error("Macro file is corrupt: {reason} {location}")]
    CorruptData {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Delete requested for a command with no registered macro.
    #[error("No macro found for command '{command}' {location}")]
    MacroNotFound {
        /// The command the caller tried to delete.
        command: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Key injection failed (unrecognized identifier or input backend error).
    #[error("Key injection failed: {reason} {location}")]
    Injection {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl PadError {
    /// Build a [`PadError::Connection`] from a reason string at the caller's
    /// location.
    #[track_caller]
    pub(crate) fn connection(reason: impl Into<String>) -> Self {
        PadError::Connection {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Build a [`PadError::Injection`] from a reason string at the caller's
    /// location.
    #[track_caller]
    pub(crate) fn injection(reason: impl Into<String>) -> Self {
        PadError::Injection {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using [`PadError`].
pub type Result<T> = StdResult<T, PadError>;
