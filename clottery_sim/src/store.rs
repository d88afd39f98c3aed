//! In-memory state store for simulation and tests.

use clottery_env::{EnvError, ProgramState, StateStore};
use std::sync::Mutex;

/// Keeps the persisted record in memory.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<Option<ProgramState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with a record.
    pub fn with_state(state: ProgramState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }

    /// Returns a copy of the last saved record.
    pub fn current(&self) -> Option<ProgramState> {
        self.state.lock().unwrap().clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<ProgramState>, EnvError> {
        Ok(self.current())
    }

    fn save(&self, state: &ProgramState) -> Result<(), EnvError> {
        *self.state.lock().unwrap() = Some(state.clone());
        Ok(())
    }
}
