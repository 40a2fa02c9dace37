//! Process-wide random number generator for resampling
//!
//! Random-resampling truncation must be reproducible from a seed, so the
//! generator is a single process-wide `StdRng` behind a mutex with an
//! explicit reseed. It is only touched inside `shrink`, never on the
//! producer hot path.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

static GLOBAL_RNG: Lazy<Mutex<StdRng>> = Lazy::new(|| Mutex::new(StdRng::from_entropy()));

/// Reseed the process-wide generator.
///
/// Tests reseed before exercising random resampling so that sampled states
/// are reproducible.
pub fn reseed(seed: u64) {
    *GLOBAL_RNG.lock() = StdRng::seed_from_u64(seed);
}

/// Run `f` with exclusive access to the process-wide generator.
pub(crate) fn with_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    f(&mut GLOBAL_RNG.lock())
}

/// Serializes tests that reseed the process-wide generator; the harness
/// runs tests in parallel and reseeds must not interleave.
#[cfg(test)]
pub(crate) fn test_lock() -> parking_lot::MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock()
}
