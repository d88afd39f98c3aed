//! Runtime configuration for the command-line front end.

use clottery_core::SessionConfig;
use clottery_env::DEFAULT_STATE_FILE;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a CLottery run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the weight table is persisted
    pub state_path: PathBuf,

    /// Master seed (0 = OS entropy)
    pub seed: u64,

    /// Reveal timing for interactive draws
    pub session: SessionConfig,

    /// Draws per simulated scenario
    pub trials: u64,

    /// Allowed deviation of observed shares in simulation
    pub tolerance: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
            seed: 0,
            session: SessionConfig::default(),
            trials: 100_000,
            tolerance: 0.01,
        }
    }
}

impl AppConfig {
    /// Sets the reveal delay and flicker interval in milliseconds.
    pub fn with_reveal_ms(mut self, delay_ms: u64, flash_ms: u64) -> Self {
        self.session = SessionConfig {
            reveal_delay: Duration::from_millis(delay_ms),
            flash_interval: Duration::from_millis(flash_ms),
        };
        self
    }

    /// True if draws should come from the seeded simulation context.
    pub fn is_seeded(&self) -> bool {
        self.seed != 0
    }
}
