//! Sharded sparse representation of a quantum state
//!
//! A state is a sparse map from spin configurations to complex coefficients,
//! split into `W` shards (`W` a power of two, at most 256). A configuration
//! is routed to shard `byte[0] & (W − 1)`, so each configuration lives in
//! exactly one shard and all additive updates to a key land in the same
//! shard. Shards are plain non-concurrent hash maps; during a builder
//! session each shard is owned by exactly one worker thread, and outside a
//! session the state is mutated only single-threadedly.
//!
//! Truncation back to `soft_max` entries supports two policies:
//! deterministic smallest-weight pruning and weighted random resampling.
//! Random resampling always draws exactly `soft_max` samples, even when the
//! state is already smaller; drawing from a state with zero total weight is
//! an error.

use crate::alias::AliasTable;
use crate::error::{Result, StateError};
use crate::rng;
use ahash::AHashMap;
use num_complex::Complex64;
use spindrift_core::SpinConfiguration;
use tracing::debug;

/// Hash map used by each shard
pub type ShardMap = AHashMap<SpinConfiguration, Complex64>;

/// Upper bound on the shard count; routing uses the first configuration byte
pub const MAX_SHARDS: usize = 256;

/// Shape parameters of a sharded state
///
/// # Example
///
/// ```
/// use spindrift_state::{ShardedState, StateOptions};
///
/// let options = StateOptions::new()
///     .with_soft_max(500)
///     .with_num_shards(8)
///     .with_random_sampling(false);
/// let state = ShardedState::new(options).unwrap();
/// assert_eq!(state.num_shards(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateOptions {
    /// Target size after truncation
    pub soft_max: usize,

    /// Per-shard initial bucket hint
    pub hard_max: usize,

    /// Number of shards (and of updater threads during a builder session)
    pub num_shards: usize,

    /// Truncation policy: weighted random resampling instead of
    /// smallest-weight pruning
    pub use_random_sampling: bool,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            soft_max: 1000,
            hard_max: 2000,
            num_shards: 1,
            use_random_sampling: false,
        }
    }
}

impl StateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_soft_max(mut self, soft_max: usize) -> Self {
        self.soft_max = soft_max;
        self
    }

    pub fn with_hard_max(mut self, hard_max: usize) -> Self {
        self.hard_max = hard_max;
        self
    }

    pub fn with_num_shards(mut self, num_shards: usize) -> Self {
        self.num_shards = num_shards;
        self
    }

    pub fn with_random_sampling(mut self, use_random_sampling: bool) -> Self {
        self.use_random_sampling = use_random_sampling;
        self
    }

    /// Check the constraints documented on each field.
    pub fn validate(&self) -> Result<()> {
        if self.soft_max < 2 {
            return Err(StateError::InvalidSoftMax(self.soft_max));
        }
        if self.hard_max == 0 {
            return Err(StateError::InvalidHardMax);
        }
        if self.num_shards == 0
            || !self.num_shards.is_power_of_two()
            || self.num_shards > MAX_SHARDS
        {
            return Err(StateError::InvalidShardCount(self.num_shards));
        }
        Ok(())
    }
}

/// Size and weight summary of a state, mostly for diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateStats {
    /// Total number of stored entries
    pub entries: usize,

    /// Number of shards
    pub shards: usize,

    /// Smallest shard size
    pub min_shard_len: usize,

    /// Largest shard size
    pub max_shard_len: usize,

    /// Total weight `Σ|c|²`
    pub total_weight: f64,
}

/// Sparse map from spin configurations to complex coefficients
pub struct ShardedState {
    shards: Vec<ShardMap>,
    shard_mask: u8,
    options: StateOptions,
}

impl ShardedState {
    /// Create an empty state.
    ///
    /// # Errors
    /// Returns an error if any option violates its constraint
    /// (`soft_max ≥ 2`, `hard_max > 0`, shard count a power of two ≤ 256).
    pub fn new(options: StateOptions) -> Result<Self> {
        options.validate()?;
        let shards = (0..options.num_shards)
            .map(|_| ShardMap::with_capacity(options.hard_max))
            .collect();
        Ok(Self {
            shards,
            shard_mask: (options.num_shards - 1) as u8,
            options,
        })
    }

    /// Shape of a successor state: same parameters, but with the bucket
    /// hint taken from the current allocation.
    pub fn next_options(&self) -> StateOptions {
        StateOptions {
            hard_max: self.estimate_hard_max(),
            ..self.options
        }
    }

    #[inline]
    pub fn soft_max(&self) -> usize {
        self.options.soft_max
    }

    #[inline]
    pub fn hard_max(&self) -> usize {
        self.options.hard_max
    }

    #[inline]
    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    pub fn uses_random_sampling(&self) -> bool {
        self.options.use_random_sampling
    }

    /// Shard a configuration is routed to.
    #[inline]
    pub fn shard_index(&self, spin: &SpinConfiguration) -> usize {
        (spin.first_byte() & self.shard_mask) as usize
    }

    /// Total number of stored entries.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|m| m.is_empty())
    }

    /// Insert an entry, refusing to touch an existing key.
    ///
    /// Returns `true` if the entry was inserted and `false` if the key was
    /// already present (the stored coefficient is left unchanged). The
    /// deserializer relies on this to detect duplicate configurations.
    pub fn insert(&mut self, spin: SpinConfiguration, coeff: Complex64) -> bool {
        let idx = self.shard_index(&spin);
        match self.shards[idx].entry(spin) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(coeff);
                true
            }
        }
    }

    /// Add `coeff` to the entry for `spin`, creating it if absent.
    ///
    /// Single-threaded counterpart of the merge performed by shard
    /// updaters; loaders and tests use it directly.
    pub fn accumulate(&mut self, coeff: Complex64, spin: SpinConfiguration) {
        let idx = self.shard_index(&spin);
        *self.shards[idx]
            .entry(spin)
            .or_insert(Complex64::new(0.0, 0.0)) += coeff;
    }

    /// Look up the coefficient stored for `spin`.
    pub fn find(&self, spin: &SpinConfiguration) -> Option<Complex64> {
        self.shards[self.shard_index(spin)].get(spin).copied()
    }

    /// Visit every entry exactly once, in unspecified order.
    pub fn for_each(&self, mut f: impl FnMut(&SpinConfiguration, Complex64)) {
        for shard in &self.shards {
            for (spin, coeff) in shard {
                f(spin, *coeff);
            }
        }
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&SpinConfiguration, &Complex64)> + '_ {
        self.shards.iter().flatten()
    }

    /// Remove all entries, keeping the allocation.
    pub fn clear(&mut self) {
        for shard in &mut self.shards {
            shard.clear();
        }
    }

    /// Summarize size and weight distribution across shards.
    pub fn stats(&self) -> StateStats {
        let lens: Vec<usize> = self.shards.iter().map(|m| m.len()).collect();
        StateStats {
            entries: lens.iter().sum(),
            shards: lens.len(),
            min_shard_len: lens.iter().copied().min().unwrap_or(0),
            max_shard_len: lens.iter().copied().max().unwrap_or(0),
            total_weight: self.iter().map(|(_, c)| c.norm_sqr()).sum(),
        }
    }

    /// Largest bucket allocation across shards, used as the `hard_max`
    /// hint for the next iteration's target state.
    pub fn estimate_hard_max(&self) -> usize {
        self.shards
            .iter()
            .map(|m| m.capacity())
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Truncate the state back to `soft_max` entries.
    ///
    /// With the deterministic policy this removes the entries of smallest
    /// weight `|c|²` (no-op when already small enough). With random
    /// resampling it redraws exactly `soft_max` entries proportionally to
    /// their weight; duplicate draws collapse, so the result may be
    /// slightly smaller.
    ///
    /// # Errors
    /// Random resampling fails with [`StateError::ZeroWeights`] when the
    /// total weight is zero.
    pub fn shrink(&mut self) -> Result<()> {
        if self.options.use_random_sampling {
            self.random_resample()
        } else {
            let size = self.len();
            if size > self.options.soft_max {
                self.remove_least(size - self.options.soft_max);
            }
            Ok(())
        }
    }

    /// Remove the `count` entries of smallest weight.
    fn remove_least(&mut self, count: usize) {
        debug_assert!(count >= 1 && count < self.len());
        let mut entries: Vec<(SpinConfiguration, f64)> = Vec::with_capacity(self.len());
        for shard in &self.shards {
            for (spin, coeff) in shard {
                entries.push((*spin, coeff.norm_sqr()));
            }
        }
        // Partial selection: afterwards entries[..count] are the smallest.
        entries.select_nth_unstable_by(count - 1, |a, b| a.1.total_cmp(&b.1));
        for (spin, _) in &entries[..count] {
            let idx = (spin.first_byte() & self.shard_mask) as usize;
            self.shards[idx].remove(spin);
        }
        debug!(removed = count, remaining = self.len(), "pruned smallest-weight entries");
    }

    /// Redraw `soft_max` entries proportionally to their weight.
    fn random_resample(&mut self) -> Result<()> {
        let entries: Vec<(SpinConfiguration, Complex64)> =
            self.iter().map(|(spin, coeff)| (*spin, *coeff)).collect();
        let weights: Vec<f64> = entries.iter().map(|(_, c)| c.norm_sqr()).collect();
        let table = AliasTable::new(&weights)?;

        self.clear();
        rng::with_rng(|rng| {
            for _ in 0..self.options.soft_max {
                let (spin, coeff) = entries[table.sample(rng)];
                self.insert(spin, coeff);
            }
        });
        debug!(size = self.len(), drawn = self.options.soft_max, "resampled state");
        Ok(())
    }

    /// Rescale all coefficients so that `Σ|c|² = 1`.
    ///
    /// # Errors
    /// Returns [`StateError::ZeroNorm`] when the total weight is zero.
    pub fn normalize(&mut self) -> Result<()> {
        let total: f64 = self
            .iter()
            .map(|(_, coeff)| coeff.norm_sqr())
            .sum();
        if total == 0.0 {
            return Err(StateError::ZeroNorm);
        }
        let scale = 1.0 / total.sqrt();
        for shard in &mut self.shards {
            for coeff in shard.values_mut() {
                *coeff *= scale;
            }
        }
        Ok(())
    }

    /// Move all shard maps out, leaving empty shards behind. The builder
    /// hands each map to its updater worker for the session.
    pub(crate) fn take_shards(&mut self) -> Vec<ShardMap> {
        self.shards.iter_mut().map(std::mem::take).collect()
    }

    /// Put a shard map back after a builder session.
    pub(crate) fn restore_shard(&mut self, index: usize, map: ShardMap) {
        self.shards[index] = map;
    }
}

impl std::fmt::Debug for ShardedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedState")
            .field("len", &self.len())
            .field("num_shards", &self.num_shards())
            .field("soft_max", &self.options.soft_max)
            .field("use_random_sampling", &self.options.use_random_sampling)
            .finish()
    }
}
