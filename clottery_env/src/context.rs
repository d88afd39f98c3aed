//! Core environment context trait for CLottery draws.

use async_trait::async_trait;
use std::time::Duration;

/// The central interface for environment interaction.
///
/// This trait abstracts the "real world" so that the draw engine can run
/// in both production (OS entropy) and simulation (seeded) environments.
///
/// # Implementations
///
/// - **Production**: `OsContext` - wraps `tokio::time`, `StdRng` from entropy
/// - **Simulation**: `SimContext` - virtual clock, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// All methods that would normally introduce non-determinism
/// (time, randomness) are controlled by the implementation.
#[async_trait]
pub trait LotteryContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);

    /// Returns a uniform random value in `[0, 100)`.
    ///
    /// This is the roll a weighted draw is resolved against.
    fn roll_percent(&self) -> f64;

    /// Returns a uniform random index in `[0, len)`.
    ///
    /// # Panics
    /// Implementations may panic when `len == 0`; callers check first.
    fn roll_index(&self, len: usize) -> usize;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    fn seed(&self) -> u64;
}
