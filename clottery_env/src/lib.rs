//! CLottery Environment Abstraction Layer
//!
//! This crate keeps everything non-deterministic or stateful out of the
//! weight engine, so the same draw logic runs against **Production**
//! (OS entropy, wall clock, JSON file) and **Simulation** (seeded RNG,
//! virtual clock, in-memory store) environments.
//!
//! # Intercepted Concerns
//!
//! - Randomness (`roll_percent()`, `roll_index()`)
//! - Time (`now()`, `sleep()`) for the reveal delay of a draw
//! - Persistence (`StateStore::load()`, `StateStore::save()`)
//!
//! A simulated context derives all entropy from one 64-bit seed, so any
//! surprising draw sequence is reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use clottery_env::{JsonFileStore, LotteryContext, OsContext, StateStore};
//!
//! let ctx = OsContext::shared();
//! let store = JsonFileStore::new("program_state.json");
//!
//! let state = store.load()?.unwrap_or_default();
//! let roll = ctx.roll_percent();
//! ```

mod context;
mod error;
mod os_impl;
mod store;
mod types;

pub use context::LotteryContext;
pub use error::EnvError;
pub use os_impl::OsContext;
pub use store::{JsonFileStore, StateStore, DEFAULT_STATE_FILE};
pub use types::ProgramState;
