//! Deterministic context for unit tests.

use async_trait::async_trait;
use clottery_env::LotteryContext;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Seeded context with a virtual clock and optional scripted rolls.
///
/// Scripted rolls are served first, in order; once exhausted, rolls come
/// from the seeded generator.
pub(crate) struct TestContext {
    seed: u64,
    virtual_time_ns: Mutex<u64>,
    rng: Mutex<ChaCha8Rng>,
    scripted: Mutex<VecDeque<f64>>,
}

impl TestContext {
    pub(crate) fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self {
            seed,
            virtual_time_ns: Mutex::new(0),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            scripted: Mutex::new(VecDeque::new()),
        })
    }

    pub(crate) fn push_rolls(&self, rolls: &[f64]) {
        self.scripted.lock().unwrap().extend(rolls.iter().copied());
    }
}

#[async_trait]
impl LotteryContext for TestContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(*self.virtual_time_ns.lock().unwrap())
    }

    async fn sleep(&self, duration: Duration) {
        *self.virtual_time_ns.lock().unwrap() += duration.as_nanos() as u64;
    }

    fn roll_percent(&self) -> f64 {
        if let Some(roll) = self.scripted.lock().unwrap().pop_front() {
            return roll;
        }
        self.rng.lock().unwrap().gen_range(0.0..100.0)
    }

    fn roll_index(&self, len: usize) -> usize {
        self.rng.lock().unwrap().gen_range(0..len)
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}
