//! The Drawer - single weighted random selection over a snapshot
//!
//! A roll `r` is taken uniformly from `[0, 100)` and entrants are walked in
//! insertion order, accumulating weights. The first entrant whose cumulative
//! sum is `>= r` wins, so a roll landing exactly on a boundary goes to the
//! earlier entrant.
//!
//! If the weights sum to less than 100 (a table after `remove`), rolls past
//! the last interval land on the **last** entrant.

use crate::error::LotteryError;
use crate::weight_table::{Snapshot, TOTAL_WEIGHT};
use clottery_env::LotteryContext;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves a roll in `[0, 100)` against a snapshot.
///
/// Returns the first entrant whose cumulative weight reaches `roll`. A
/// leading zero-weight entrant therefore wins a roll of exactly 0.
///
/// Pure and deterministic: the same snapshot and roll always give the same
/// entrant.
pub fn select(snapshot: &Snapshot, roll: f64) -> Result<&str, LotteryError> {
    let last = snapshot
        .order()
        .last()
        .map(String::as_str)
        .ok_or(LotteryError::EmptyPool)?;

    let mut cumulative = 0.0;
    for (name, weight) in snapshot.iter() {
        cumulative += weight;
        if roll <= cumulative {
            return Ok(name);
        }
    }

    warn!(
        roll,
        total = cumulative,
        winner = last,
        "Roll past cumulative weight, falling back to last entrant"
    );
    Ok(last)
}

/// Effective probability of each entrant under [`select`], in `[0, 1]`.
///
/// Differs from `weight / 100` only when the table is not normalized: a
/// shortfall is credited to the last entrant, and intervals reaching past
/// 100 are cut off.
pub fn expected_shares(snapshot: &Snapshot) -> Vec<(String, f64)> {
    let mut shares = Vec::with_capacity(snapshot.len());
    let mut before = 0.0_f64;

    for (name, weight) in snapshot.iter() {
        let start = before.min(TOTAL_WEIGHT);
        let end = (before + weight).min(TOTAL_WEIGHT);
        shares.push((name.to_string(), (end - start).max(0.0) / TOTAL_WEIGHT));
        before += weight;
    }

    if let Some((_, last)) = shares.last_mut() {
        let shortfall = (TOTAL_WEIGHT - before).max(0.0);
        *last += shortfall / TOTAL_WEIGHT;
    }
    shares
}

/// Weighted drawer bound to an environment context.
///
/// Generic over the context so the same code draws with OS entropy in
/// production or a seeded generator in simulation.
pub struct Drawer<Ctx: LotteryContext> {
    ctx: Arc<Ctx>,
}

impl<Ctx: LotteryContext> Drawer<Ctx> {
    pub fn new(ctx: Arc<Ctx>) -> Self {
        Self { ctx }
    }

    /// Returns the context this drawer rolls against.
    pub fn context(&self) -> &Arc<Ctx> {
        &self.ctx
    }

    /// Draws a single winner. The snapshot is only read.
    pub fn draw(&self, snapshot: &Snapshot) -> Result<String, LotteryError> {
        if snapshot.is_empty() {
            return Err(LotteryError::EmptyPool);
        }
        let roll = self.ctx.roll_percent();
        let winner = select(snapshot, roll)?;

        debug!(roll, winner, seed = self.ctx.seed(), "Drew winner");
        Ok(winner.to_string())
    }

    /// Picks a uniformly random entrant, ignoring weights.
    ///
    /// Used for the flicker shown while a result is pending. Has no bearing
    /// on who wins.
    pub fn flash(&self, snapshot: &Snapshot) -> Option<String> {
        if snapshot.is_empty() {
            return None;
        }
        let idx = self.ctx.roll_index(snapshot.len());
        snapshot.order().get(idx).cloned()
    }
}
