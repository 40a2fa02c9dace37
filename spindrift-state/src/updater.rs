//! Per-shard update workers
//!
//! Each shard of a state under construction is fed through its own bounded
//! single-producer/single-consumer queue by exactly one worker thread. The
//! worker owns the shard map for the whole session, so merging needs no
//! locks; the producer sees back-pressure when a queue fills up. Messages
//! are applied in FIFO order within a shard; there is no ordering across
//! shards, which is safe because all deltas for a given key route to the
//! same shard and addition is commutative.

use crate::error::{Result, StateError};
use crate::sharded_state::ShardMap;
use crossbeam_channel::{bounded, Receiver, Sender};
use num_complex::Complex64;
use spindrift_core::SpinConfiguration;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A queued coefficient delta for one configuration
pub(crate) type DeltaMsg = (SpinConfiguration, Complex64);

/// Queue capacity per shard; a saturated consumer stalls the producer
const QUEUE_CAPACITY: usize = 1024;

/// Worker that drains one shard's queue into its hash map
///
/// State machine: `Idle → start() → Running → stop() → Idle`. `push` may
/// only be called while running. After `stop` returns, every message
/// accepted by `push` has been merged into the shard map.
pub(crate) struct ShardUpdater {
    tx: Sender<DeltaMsg>,
    rx: Receiver<DeltaMsg>,
    done: Arc<AtomicBool>,
    worker: Option<JoinHandle<ShardMap>>,
}

impl ShardUpdater {
    pub(crate) fn new() -> Self {
        let (tx, rx) = bounded(QUEUE_CAPACITY);
        Self {
            tx,
            rx,
            done: Arc::new(AtomicBool::new(true)),
            worker: None,
        }
    }

    /// Spawn the worker and hand it ownership of the shard map.
    pub(crate) fn start(&mut self, map: ShardMap) {
        debug_assert!(self.worker.is_none(), "updater already running");
        debug_assert!(self.rx.is_empty(), "stale messages in shard queue");
        self.done.store(false, Ordering::Release);
        let rx = self.rx.clone();
        let done = Arc::clone(&self.done);
        self.worker = Some(thread::spawn(move || run_worker(map, rx, done)));
    }

    /// Enqueue a delta, blocking while the queue is full.
    #[inline]
    pub(crate) fn push(&self, msg: DeltaMsg) {
        debug_assert!(self.worker.is_some(), "push outside a running session");
        // The receiver outlives the session, so the channel never closes.
        self.tx.send(msg).expect("shard queue disconnected");
    }

    /// Signal completion, join the worker, and take the shard map back.
    ///
    /// # Errors
    /// - [`StateError::UpdaterNotRunning`] when there is no worker to stop
    /// - [`StateError::WorkerPanicked`] if the worker died; the shard's
    ///   contents are lost in that case
    pub(crate) fn stop(&mut self) -> Result<ShardMap> {
        debug_assert!(self.worker.is_some(), "stop outside a running session");
        let handle = self.worker.take().ok_or(StateError::UpdaterNotRunning)?;
        self.done.store(true, Ordering::Release);
        let map = handle.join().map_err(|_| StateError::WorkerPanicked)?;
        debug_assert!(self.rx.is_empty(), "worker exited with pending messages");
        Ok(map)
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for ShardUpdater {
    fn drop(&mut self) {
        if let Some(handle) = self.worker.take() {
            self.done.store(true, Ordering::Release);
            let _ = handle.join();
        }
    }
}

fn run_worker(mut map: ShardMap, rx: Receiver<DeltaMsg>, done: Arc<AtomicBool>) -> ShardMap {
    while !done.load(Ordering::Acquire) {
        let mut drained = false;
        while let Ok((spin, delta)) = rx.try_recv() {
            merge(&mut map, spin, delta);
            drained = true;
        }
        if !drained {
            thread::yield_now();
        }
    }
    // Everything accepted before the flag flipped must still be applied.
    while let Ok((spin, delta)) = rx.try_recv() {
        merge(&mut map, spin, delta);
    }
    map
}

#[inline]
fn merge(map: &mut ShardMap, spin: SpinConfiguration, delta: Complex64) {
    *map.entry(spin).or_insert(Complex64::new(0.0, 0.0)) += delta;
}
