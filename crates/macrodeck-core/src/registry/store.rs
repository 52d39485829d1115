//! Macro persistence: command string → typed action, backed by a JSON file.
//!
//! The in-memory map is authoritative between explicit saves. Deletions
//! persist immediately (rare corrective actions); additions are batched
//! until the caller saves.

use crate::{CoreResult, PadError, registry::Action};

use std::{collections::HashMap, fs, io::Write, panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// In-memory macro map with explicit JSON persistence.
///
/// Keys are unique; `set` on an existing command overwrites (last write
/// wins). One instance owns the map — lookups and mutations go through it,
/// no ambient global state.
pub struct MacroRegistry {
    path: PathBuf,
    entries: HashMap<String, Action>,
}

impl MacroRegistry {
    /// Create an empty registry backed by `path`. Call
    /// [`MacroRegistry::reload`] to populate it from disk.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: HashMap::new(),
        }
    }

    /// Insert or overwrite the macro for `command`. In-memory only;
    /// call [`MacroRegistry::save`] to persist.
    pub fn set(&mut self, command: impl Into<String>, action: Action) {
        self.entries.insert(command.into(), action);
    }

    /// Look up the macro for `command`.
    pub fn get(&self, command: &str) -> Option<&Action> {
        self.entries.get(command)
    }

    /// Iterate over all registered macros, e.g. for a selection list.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Action)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered macros.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no macros.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the full map to the backing file.
    ///
    /// Atomic write (temp file + rename) so a crash mid-write cannot corrupt
    /// the previous file. Failures surface as [`PadError::Persistence`] —
    /// never swallowed.
    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.path))]
    pub fn save(&self) -> CoreResult<()> {
        let contents = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            PadError::Persistence {
                reason: format!("failed to serialize macros: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let temp_path = self.path.with_extension("json.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| PadError::Persistence {
            reason: format!("failed to create {}: {e}", temp_path.display()),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .and_then(|()| temp_file.sync_all())
            .map_err(|e| PadError::Persistence {
                reason: format!("failed to write {}: {e}", temp_path.display()),
                location: ErrorLocation::from(Location::caller()),
            })?;

        fs::rename(&temp_path, &self.path).map_err(|e| PadError::Persistence {
            reason: format!("failed to replace {}: {e}", self.path.display()),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(count = self.entries.len(), "Macros saved");

        Ok(())
    }

    /// Read the backing file and merge its contents into the in-memory map.
    ///
    /// This is a union, not a replace: in-memory entries absent from disk
    /// are retained; per key, the on-disk entry wins. Returns the on-disk
    /// snapshot for display purposes.
    ///
    /// Missing file is an ordinary outcome (empty snapshot, warning log).
    /// Malformed contents fail with [`PadError::CorruptData`] and leave the
    /// map untouched.
    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.path))]
    pub fn reload(&mut self) -> CoreResult<HashMap<String, Action>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = ?self.path, "Macro file not found, starting empty");
                return Ok(HashMap::new());
            }
            Err(e) => {
                return Err(PadError::Persistence {
                    reason: format!("failed to read {}: {e}", self.path.display()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let loaded: HashMap<String, Action> =
            serde_json::from_str(&contents).map_err(|e| PadError::CorruptData {
                reason: format!("{}: {e}", self.path.display()),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.entries.extend(loaded.clone());

        debug!(count = loaded.len(), "Macros reloaded");

        Ok(loaded)
    }

    /// Remove the macro for `command` and persist immediately.
    ///
    /// An absent command fails with [`PadError::MacroNotFound`] and leaves
    /// the map unchanged — the caller needs to know the deletion target
    /// didn't exist.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete(&mut self, command: &str) -> CoreResult<()> {
        if self.entries.remove(command).is_none() {
            warn!(command, "Attempted to delete a non-existent macro");
            return Err(PadError::MacroNotFound {
                command: command.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.save()
    }
}
