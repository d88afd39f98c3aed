//! Simulation context implementing LotteryContext for deterministic runs.

use async_trait::async_trait;
use clottery_env::LotteryContext;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Simulation context backed by deterministic time and RNG.
///
/// This implements `LotteryContext` using:
/// - A virtual clock that can be advanced manually
/// - A seeded ChaCha8 RNG for every roll
/// - Simulated sleep that advances virtual time instead of blocking
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,

    /// Current virtual time (nanoseconds since simulation start)
    virtual_time_ns: Arc<Mutex<u64>>,

    /// Deterministic RNG for draws and flicker
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            virtual_time_ns: Arc::new(Mutex::new(0)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        let mut time = self.virtual_time_ns.lock().unwrap();
        *time += duration.as_nanos() as u64;
    }

    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        *self.virtual_time_ns.lock().unwrap()
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
            rng: Arc::clone(&self.rng),
        }
    }
}

#[async_trait]
impl LotteryContext for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    async fn sleep(&self, duration: Duration) {
        // In simulation, sleep advances virtual time
        self.advance_time(duration);
    }

    fn roll_percent(&self) -> f64 {
        self.rng.lock().unwrap().gen_range(0.0..100.0)
    }

    fn roll_index(&self, len: usize) -> usize {
        self.rng.lock().unwrap().gen_range(0..len)
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_context_time() {
        let ctx = SimContext::new(42);
        assert_eq!(ctx.now(), Duration::ZERO);

        ctx.advance_time(Duration::from_secs(1));
        assert_eq!(ctx.now(), Duration::from_secs(1));

        ctx.advance_time(Duration::from_millis(500));
        assert_eq!(ctx.now(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_sim_sleep_is_virtual() {
        let ctx = SimContext::new(42);
        ctx.sleep(Duration::from_secs(3600)).await;
        assert_eq!(ctx.now(), Duration::from_secs(3600));
    }

    #[test]
    fn test_sim_context_deterministic_rolls() {
        let ctx1 = SimContext::new(42);
        let ctx2 = SimContext::new(42);

        let rolls1: Vec<f64> = (0..16).map(|_| ctx1.roll_percent()).collect();
        let rolls2: Vec<f64> = (0..16).map(|_| ctx2.roll_percent()).collect();
        assert_eq!(rolls1, rolls2);

        let ctx3 = SimContext::new(43);
        let rolls3: Vec<f64> = (0..16).map(|_| ctx3.roll_percent()).collect();
        assert_ne!(rolls1, rolls3);
    }

    #[test]
    fn test_sim_context_seed() {
        let ctx = SimContext::new(12345);
        assert_eq!(ctx.seed(), 12345);
    }

    #[test]
    fn test_sim_context_clone_shares_state() {
        let ctx1 = SimContext::new(42);
        let ctx2 = ctx1.clone();

        ctx1.advance_time(Duration::from_secs(5));
        assert_eq!(ctx1.now(), ctx2.now());

        // Shared RNG: the clone continues the same stream
        let fresh = SimContext::new(42);
        let first = fresh.roll_percent();
        let second = fresh.roll_percent();
        assert_eq!(ctx1.roll_percent(), first);
        assert_eq!(ctx2.roll_percent(), second);
    }
}
