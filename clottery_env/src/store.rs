//! Persistence collaborator for the weight table.

use crate::error::EnvError;
use crate::types::ProgramState;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used when no explicit state path is configured.
pub const DEFAULT_STATE_FILE: &str = "program_state.json";

/// Trait for persistent program state storage.
///
/// The core never touches storage itself; callers load a record, rehydrate
/// a table from it, and save a record back after mutating.
pub trait StateStore: Send + Sync {
    /// Loads the persisted record, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<ProgramState>, EnvError>;

    /// Replaces the persisted record.
    fn save(&self, state: &ProgramState) -> Result<(), EnvError>;
}

/// JSON file backed state store.
///
/// Writes UTF-8 with non-ASCII names kept verbatim and 4-space indentation.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the given file path. The file need not exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<ProgramState>, EnvError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(EnvError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let state: ProgramState = serde_json::from_str(&text).map_err(EnvError::serialization)?;
        debug!(path = %self.path.display(), entrants = state.names.len(), "Loaded program state");
        Ok(Some(state))
    }

    fn save(&self, state: &ProgramState) -> Result<(), EnvError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        state
            .serialize(&mut serializer)
            .map_err(EnvError::serialization)?;

        fs::write(&self.path, &buf).map_err(|e| {
            EnvError::storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), entrants = state.names.len(), "Saved program state");
        Ok(())
    }
}
