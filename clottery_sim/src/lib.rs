//! CLottery Simulation Harness and Front End
//!
//! Runs the weight engine in a controlled environment:
//! - **Randomness**: every roll derived from a single 64-bit seed
//! - **Time**: the reveal delay advances a virtual clock instead of blocking
//! - **Storage**: an in-memory store stands in for the JSON file
//!
//! The `clottery` binary sits on top of this crate. It drives table
//! commands against a JSON state file and can verify draw frequencies
//! over seeded batches.
//!
//! # Usage
//!
//! ```ignore
//! use clottery_sim::{ScenarioId, TrialRunner};
//!
//! let report = TrialRunner::new(42).run(ScenarioId::Skewed)?;
//! assert!(report.passed);
//! ```

mod context;
mod store;
mod runner;
pub mod commands;
pub mod config;
pub mod scenarios;

pub use commands::{execute, load_table, run_draw, AppError, TableCommand};
pub use config::AppConfig;
pub use context::SimContext;
pub use runner::{EntrantTally, TrialReport, TrialRunner};
pub use scenarios::ScenarioId;
pub use store::MemoryStore;
