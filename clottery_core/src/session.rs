//! Draw Session - the draw-with-presentation state machine.
//!
//! ```text
//!            begin()               reveal()                finish()
//!   Idle ─────────────► Drawing ─────────────► Resulted ─────────────► Idle
//!                          │
//!                          └──── cancel() ────► Idle
//! ```
//!
//! The winner is drawn once, synchronously, inside `begin()`. The reveal
//! delay only defers *disclosure*: flicker names shown while waiting come
//! from a separate uniform pick and cannot change the outcome.

use crate::drawer::Drawer;
use crate::error::LotteryError;
use crate::weight_table::Snapshot;
use clottery_env::LotteryContext;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Where a session is in its draw cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPhase {
    Idle,
    Drawing,
    Resulted,
}

/// Timing for the reveal of a draw.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long the result is held back (default: 3s)
    pub reveal_delay: Duration,

    /// Time between flicker names while the result is held (default: 100ms)
    pub flash_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(3000),
            flash_interval: Duration::from_millis(100),
        }
    }
}

/// One draw at a time, with a held-back reveal.
pub struct DrawSession<Ctx: LotteryContext> {
    drawer: Drawer<Ctx>,
    config: SessionConfig,
    phase: DrawPhase,

    /// Pool the flicker picks from while Drawing
    pool: Option<Snapshot>,

    /// Winner, fixed at `begin()`
    winner: Option<String>,
}

impl<Ctx: LotteryContext> DrawSession<Ctx> {
    pub fn new(ctx: Arc<Ctx>, config: SessionConfig) -> Self {
        Self {
            drawer: Drawer::new(ctx),
            config,
            phase: DrawPhase::Idle,
            pool: None,
            winner: None,
        }
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    /// Starts a draw and fixes the winner immediately.
    ///
    /// Fails with `DrawInProgress` unless Idle, and with `EmptyPool` (staying
    /// Idle) when the snapshot has no entrants.
    pub fn begin(&mut self, snapshot: Snapshot) -> Result<(), LotteryError> {
        if self.phase != DrawPhase::Idle {
            return Err(LotteryError::DrawInProgress);
        }

        let winner = self.drawer.draw(&snapshot)?;
        self.winner = Some(winner);
        self.pool = Some(snapshot);
        self.phase = DrawPhase::Drawing;

        debug!(entrants = self.pool.as_ref().map_or(0, Snapshot::len), "Draw started");
        Ok(())
    }

    /// Waits out the reveal delay, then discloses the winner.
    ///
    /// `on_flash` receives a flicker name every `flash_interval`. Returns
    /// `None` if the session is not Drawing.
    pub async fn reveal<F>(&mut self, mut on_flash: F) -> Option<String>
    where
        F: FnMut(&str),
    {
        if self.phase != DrawPhase::Drawing {
            return None;
        }

        let ctx = Arc::clone(self.drawer.context());
        let delay = self.config.reveal_delay;
        let interval = self.config.flash_interval;

        if interval.is_zero() {
            ctx.sleep(delay).await;
        } else {
            let mut elapsed = Duration::ZERO;
            while elapsed < delay {
                if let Some(name) = self.pool.as_ref().and_then(|pool| self.drawer.flash(pool)) {
                    on_flash(&name);
                }
                let step = interval.min(delay - elapsed);
                ctx.sleep(step).await;
                elapsed += step;
            }
        }

        self.phase = DrawPhase::Resulted;
        debug!(winner = ?self.winner, "Result revealed");
        self.winner.clone()
    }

    /// Abandons a pending draw. Returns false if nothing was pending.
    pub fn cancel(&mut self) -> bool {
        if self.phase != DrawPhase::Drawing {
            return false;
        }
        self.reset();
        debug!("Draw cancelled before reveal");
        true
    }

    /// Acknowledges a revealed result and returns to Idle.
    pub fn finish(&mut self) -> Option<String> {
        if self.phase != DrawPhase::Resulted {
            return None;
        }
        let winner = self.winner.take();
        self.reset();
        winner
    }

    /// The revealed winner. Hidden until the session reaches Resulted.
    pub fn winner(&self) -> Option<&str> {
        match self.phase {
            DrawPhase::Resulted => self.winner.as_deref(),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.phase = DrawPhase::Idle;
        self.pool = None;
        self.winner = None;
    }
}
