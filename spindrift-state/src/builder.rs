//! Producer-side façade over a state under construction
//!
//! A builder borrows a target state for its lifetime and owns one updater
//! per shard. Between `start` and `stop` the shard maps live inside the
//! worker threads and the state itself is empty; producers push coefficient
//! deltas, which are routed by the first configuration byte to the matching
//! updater. `stop` joins every worker and moves the maps back, after which
//! the state is consistent and may be shrunk, normalized, or iterated.
//!
//! Exactly one `start … stop` bracket per session; a stopped builder can be
//! started again for a fresh session.

use crate::error::Result;
use crate::sharded_state::ShardedState;
use crate::updater::ShardUpdater;
use num_complex::Complex64;
use spindrift_core::SpinConfiguration;
use tracing::trace;

/// Routes coefficient deltas into a state's shard updaters
pub struct StateBuilder<'a> {
    state: &'a mut ShardedState,
    updaters: Vec<ShardUpdater>,
    running: bool,
}

impl<'a> StateBuilder<'a> {
    /// Create a builder with one updater per shard of `state`.
    pub fn new(state: &'a mut ShardedState) -> Self {
        let updaters = (0..state.num_shards()).map(|_| ShardUpdater::new()).collect();
        Self {
            state,
            updaters,
            running: false,
        }
    }

    /// Start a session: every shard map moves into its worker thread.
    pub fn start(&mut self) {
        debug_assert!(!self.running, "builder session already running");
        for (updater, map) in self.updaters.iter_mut().zip(self.state.take_shards()) {
            updater.start(map);
        }
        self.running = true;
        trace!(shards = self.updaters.len(), "builder session started");
    }

    /// Queue `coeff` to be added to the entry for `spin`.
    ///
    /// Must only be called between `start` and `stop`. Blocks when the
    /// routed shard's queue is full.
    #[inline]
    pub fn push(&self, coeff: Complex64, spin: SpinConfiguration) {
        debug_assert!(self.running, "push outside a builder session");
        self.updaters[self.state.shard_index(&spin)].push((spin, coeff));
    }

    /// End the session: drain every queue, join every worker, and move the
    /// shard maps back into the state.
    ///
    /// # Errors
    /// Returns the first worker failure encountered; the remaining workers
    /// are still stopped. A failed shard's entries are lost, which is
    /// acceptable because worker failures are fatal for the run.
    pub fn stop(&mut self) -> Result<()> {
        debug_assert!(self.running, "stop without a running session");
        let mut failure = None;
        for (index, updater) in self.updaters.iter_mut().enumerate() {
            match updater.stop() {
                Ok(map) => self.state.restore_shard(index, map),
                Err(err) => failure = failure.or(Some(err)),
            }
        }
        self.running = false;
        trace!(size = self.state.len(), "builder session stopped");
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
