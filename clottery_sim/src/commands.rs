//! Table commands and the draw flow, wired to a state store.
//!
//! Every mutating command follows the same cycle: load the persisted record,
//! apply one table operation, save the record back. A failed operation
//! saves nothing.

use clottery_core::{DrawSession, LotteryError, SessionConfig, Snapshot, WeightTable};
use clottery_env::{EnvError, LotteryContext, StateStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by the front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Lottery(#[from] LotteryError),

    #[error(transparent)]
    Env(#[from] EnvError),
}

/// A single table mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum TableCommand {
    Add(String),
    Remove(String),
    SetWeight { name: String, value: f64 },
    Equalize,
    Normalize,
}

impl TableCommand {
    /// Applies the command to a table.
    pub fn apply(&self, table: &mut WeightTable) -> Result<(), LotteryError> {
        match self {
            TableCommand::Add(name) => table.add(name),
            TableCommand::Remove(name) => table.remove(name),
            TableCommand::SetWeight { name, value } => table.set_weight(name, *value),
            TableCommand::Equalize => {
                table.equalize();
                Ok(())
            }
            TableCommand::Normalize => {
                table.normalize();
                Ok(())
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            TableCommand::Add(name) => format!("Added entrant: {}", name.trim()),
            TableCommand::Remove(name) => format!("Removed entrant: {}", name),
            TableCommand::SetWeight { name, value } => format!("Set {} to {:.2}%", name, value),
            TableCommand::Equalize => "Weights equalized".to_string(),
            TableCommand::Normalize => "Weights normalized".to_string(),
        }
    }
}

/// Loads the persisted table, or an empty one if nothing was saved yet.
pub fn load_table(store: &dyn StateStore) -> Result<WeightTable, AppError> {
    match store.load()? {
        Some(state) => Ok(WeightTable::from_record(state)?),
        None => Ok(WeightTable::new()),
    }
}

/// Loads, mutates and saves the table. Returns the updated table.
pub fn execute(store: &dyn StateStore, command: &TableCommand) -> Result<WeightTable, AppError> {
    let mut table = load_table(store)?;
    command.apply(&mut table)?;
    store.save(&table.to_record())?;

    info!("{}", command.describe());
    Ok(table)
}

/// Runs one full draw cycle: fix the winner, wait out the reveal while
/// flashing names, then disclose.
pub async fn run_draw<Ctx, F>(
    ctx: Arc<Ctx>,
    snapshot: Snapshot,
    config: SessionConfig,
    on_flash: F,
) -> Result<String, AppError>
where
    Ctx: LotteryContext,
    F: FnMut(&str),
{
    let mut session = DrawSession::new(ctx, config);
    session.begin(snapshot)?;

    // begin() succeeded, so the session is Drawing and reveal yields a winner
    let winner = session
        .reveal(on_flash)
        .await
        .ok_or(LotteryError::EmptyPool)?;
    session.finish();

    info!("Winner: {}", winner);
    Ok(winner)
}
