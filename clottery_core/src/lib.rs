//! CLottery Core - Weighted Name Drawing Engine
//!
//! Draws one winner from a named pool, where each entrant's chance is an
//! editable percentage weight:
//! 1. **WeightTable**: ordered entrants, weights kept summing to 100 by
//!    equal-split redistribution
//! 2. **Drawer**: a single weighted random pick over a table snapshot
//! 3. **DrawSession**: the `Idle -> Drawing -> Resulted` cycle a front end
//!    drives when it wants a delayed, animated reveal
//!
//! Randomness, time and persistence come from `clottery_env`.

pub mod drawer;
pub mod session;
pub mod weight_table;
mod error;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use drawer::{expected_shares, select, Drawer};
pub use error::LotteryError;
pub use session::{DrawPhase, DrawSession, SessionConfig};
pub use weight_table::{Snapshot, WeightTable, TOTAL_WEIGHT, WEIGHT_TOLERANCE};
