//! Production implementation of LotteryContext using OS entropy and Tokio.

use crate::LotteryContext;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Production context backed by Tokio and OS entropy.
///
/// The RNG is seeded once from the operating system when the context is
/// created, so every process start draws a fresh sequence. It is not a
/// cryptographically secure source and is not meant to be.
pub struct OsContext {
    /// Start time for monotonic duration calculations
    start: Instant,

    /// Process-wide pseudo-random generator
    rng: Mutex<StdRng>,
}

impl OsContext {
    /// Creates a new OsContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for OsContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LotteryContext for OsContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn roll_percent(&self) -> f64 {
        self.rng.lock().unwrap().gen_range(0.0..100.0)
    }

    fn roll_index(&self, len: usize) -> usize {
        self.rng.lock().unwrap().gen_range(0..len)
    }

    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}
