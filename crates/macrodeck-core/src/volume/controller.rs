//! Bounded-step volume adjustment against per-process audio sessions.

use crate::volume::{AudioSessionBackend, platform_backend};

use tracing::{debug, instrument};

/// Fixed adjustment step on the 0.0–1.0 volume scale.
pub const VOLUME_STEP: f32 = 0.1;

/// Outcome of a volume adjustment request.
///
/// A missing session is a common, expected result (application closed, name
/// mismatch) and is therefore a value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeAdjustment {
    /// The session volume was changed; `percent` is the new value 0–100.
    Applied {
        /// New volume as an integer percentage.
        percent: u8,
    },
    /// No active audio session matched the target application.
    NoSession,
}

/// Queries and mutates application audio sessions.
///
/// Operations hit the OS audio subsystem live and may be slow; callers must
/// run them off any latency-sensitive thread. Concurrent adjustments to the
/// same application race read-modify-write with last-write-wins — accepted,
/// the device display simply shows whichever reply completed last.
pub struct VolumeController {
    backend: Box<dyn AudioSessionBackend>,
}

impl VolumeController {
    /// Controller over the OS audio subsystem of this platform.
    pub fn new() -> Self {
        Self {
            backend: platform_backend(),
        }
    }

    /// Controller over an explicit backend (tests, alternate platforms).
    pub fn with_backend(backend: Box<dyn AudioSessionBackend>) -> Self {
        Self { backend }
    }

    /// Deduplicated, sorted names of processes with an active audio session.
    ///
    /// Read-only; used to populate selection lists.
    #[instrument(skip(self))]
    pub fn get_available_processes(&self) -> Vec<String> {
        let mut names = self.backend.active_process_names();
        names.sort();
        names.dedup();
        names
    }

    /// Step the volume of `app_name`'s audio session up or down.
    ///
    /// Reads the current level, applies [`VOLUME_STEP`] clamped to
    /// `[0.0, 1.0]`, writes it back, and reports the new level as a
    /// percentage. First session matching the process name wins.
    #[instrument(skip(self))]
    pub fn adjust_volume(&self, app_name: &str, increase: bool) -> VolumeAdjustment {
        let Some(current) = self.backend.session_volume(app_name) else {
            debug!(app = app_name, "No audio session found");
            return VolumeAdjustment::NoSession;
        };

        let new_level = if increase {
            (current + VOLUME_STEP).min(1.0)
        } else {
            (current - VOLUME_STEP).max(0.0)
        };

        // Session may vanish between read and write; treat as no session.
        if !self.backend.set_session_volume(app_name, new_level) {
            debug!(app = app_name, "Audio session disappeared before write");
            return VolumeAdjustment::NoSession;
        }

        let percent = (new_level * 100.0).round() as u8;
        debug!(app = app_name, increase, percent, "Volume adjusted");

        VolumeAdjustment::Applied { percent }
    }
}

impl Default for VolumeController {
    fn default() -> Self {
        Self::new()
    }
}
