//! Repeated application of the diffusion operator `Λ·I − H`
//!
//! Each iteration maps the source state through `Λ·I − H` into a fresh
//! target state, truncates the target back to the soft size bound, and
//! normalizes it. Repeated application suppresses every eigencomponent
//! relative to the lowest one (for `Λ` above the spectrum), so the state
//! drifts toward the ground state of `H`.

use crate::error::{Result, SimError};
use crate::hamiltonian::Operator;
use num_complex::Complex64;
use spindrift_state::{ShardedState, StateBuilder};
use std::time::{Duration, Instant};
use tracing::debug;

/// Apply `Λ·I − H` once, without truncation or normalization.
///
/// The target state inherits the source's shape, with the allocation hint
/// taken from the source's current bucket usage.
pub fn diffusion_step(
    lambda: f64,
    hamiltonian: &impl Operator,
    source: &ShardedState,
) -> Result<ShardedState> {
    let mut target = ShardedState::new(source.next_options())?;
    let mut builder = StateBuilder::new(&mut target);
    builder.start();
    for (spin, coeff) in source.iter() {
        hamiltonian.apply(spin, -*coeff, &builder);
        builder.push(*coeff * lambda, *spin);
    }
    builder.stop()?;
    drop(builder);
    Ok(target)
}

/// Progress record handed to the observer after each completed iteration
#[derive(Debug, Clone, Copy)]
pub struct IterationStats {
    /// 1-based index of the completed iteration
    pub iteration: usize,

    /// Total number of iterations in the run
    pub iterations: usize,

    /// Entries in the state after growth, before truncation
    pub grown_size: usize,

    /// Entries in the state after truncation
    pub size: usize,

    /// Wall-clock time of the iteration
    pub elapsed: Duration,
}

/// Iterate `|ψ⟩ ← (Λ·I − H)|ψ⟩` with truncation, `iterations` times.
///
/// # Errors
/// - [`SimError::InvalidIterationCount`] when `iterations` is zero
/// - truncation and normalization failures from the state engine
pub fn diffusion_loop(
    lambda: f64,
    hamiltonian: &impl Operator,
    initial: ShardedState,
    iterations: usize,
) -> Result<ShardedState> {
    diffusion_loop_with(lambda, hamiltonian, initial, iterations, |_| {})
}

/// [`diffusion_loop`] with a per-iteration progress observer.
///
/// The engine renders no progress itself; front ends hook in here for ETA
/// displays or convergence monitoring.
pub fn diffusion_loop_with(
    lambda: f64,
    hamiltonian: &impl Operator,
    initial: ShardedState,
    iterations: usize,
    mut observer: impl FnMut(&IterationStats),
) -> Result<ShardedState> {
    if iterations == 0 {
        return Err(SimError::InvalidIterationCount);
    }
    let mut state = initial;
    for iteration in 1..=iterations {
        let started = Instant::now();
        let mut next = diffusion_step(lambda, hamiltonian, &state)?;
        let grown_size = next.len();
        next.shrink()?;
        next.normalize()?;
        let stats = IterationStats {
            iteration,
            iterations,
            grown_size,
            size: next.len(),
            elapsed: started.elapsed(),
        };
        debug!(
            iteration,
            iterations,
            grown_size,
            size = stats.size,
            "applied diffusion operator"
        );
        observer(&stats);
        state = next;
    }
    Ok(state)
}

/// Estimate `⟨ψ|H|ψ⟩` for a normalized state.
///
/// Builds the auxiliary state `H|ψ⟩` (same shape as `ψ`) through a builder
/// session, then contracts it against `ψ`:
/// `E = Σ_σ conj(ψ_σ) · (H ψ)_σ`.
pub fn energy(hamiltonian: &impl Operator, psi: &ShardedState) -> Result<Complex64> {
    let mut h_psi = ShardedState::new(psi.next_options())?;
    let mut builder = StateBuilder::new(&mut h_psi);
    builder.start();
    for (spin, coeff) in psi.iter() {
        hamiltonian.apply(spin, *coeff, &builder);
    }
    builder.stop()?;
    drop(builder);

    let mut total = Complex64::new(0.0, 0.0);
    for (spin, coeff) in psi.iter() {
        if let Some(h_coeff) = h_psi.find(spin) {
            total += coeff.conj() * h_coeff;
        }
    }
    Ok(total)
}
