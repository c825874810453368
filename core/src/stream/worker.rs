// # 📂 `src/stream/worker.rs`

//! Fixed pool of persistent block workers.
//!
//! Worker loop:
//! 1. wait on the submit signal
//! 2. exit if shutdown was requested
//! 3. pop the submission head under the lock (may be empty on a shutdown race)
//! 4. derive `rotate(key, block.index)` into a per-worker scratch buffer
//! 5. XOR the block, insert it into the result queue, post completion
//!
//! The key is shared read-only; workers never mutate it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, warn};

use crate::constants::{WORKER_HEALTH_CHECK_MS, WORKER_THREAD_PREFIX};
use crate::crypto::{apply_keystream, rotate_into};
use crate::stream::block::Block;
use crate::stream::queue::SharedQueues;
use crate::types::StreamError;

/// Per-worker accounting, returned on join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub id: usize,
    pub blocks: u64,
    pub bytes: u64,
}

pub struct BlockWorker {
    id: usize,
    key: Arc<[u8]>,
    shared: Arc<SharedQueues>,
}

impl BlockWorker {
    pub fn new(id: usize, key: Arc<[u8]>, shared: Arc<SharedQueues>) -> Self {
        Self { id, key, shared }
    }

    /// Run loop. Returns when shutdown is requested, or on the first error.
    pub fn run(self) -> Result<WorkerStats, StreamError> {
        let mut scratch = vec![0u8; self.key.len()];
        let mut stats = WorkerStats { id: self.id, ..WorkerStats::default() };

        debug!("[WORKER-{}] started", self.id);

        loop {
            self.shared.submit.wait();

            if self.shared.is_shutdown() {
                break;
            }

            let next = self.shared.lock()?.pop_submission();
            let Some(mut block) = next else {
                continue;
            };

            rotate_into(&self.key, &mut scratch, block.index());
            apply_keystream(block.as_mut_slice(), &scratch)?;

            stats.blocks += 1;
            stats.bytes += block.len() as u64;

            self.shared.complete(block)?;
        }

        debug!("[WORKER-{}] exiting after {} blocks", self.id, stats.blocks);
        Ok(stats)
    }
}

pub struct WorkerPool {
    shared: Arc<SharedQueues>,
    handles: Vec<JoinHandle<Result<WorkerStats, StreamError>>>,
    width: usize,
}

impl WorkerPool {
    /// Start `width` workers over a shared read-only key.
    ///
    /// If any thread fails to start, the ones already running are shut down
    /// and joined before the error is returned.
    pub fn start(key: Arc<[u8]>, width: usize) -> Result<Self, StreamError> {
        if width == 0 {
            return Err(StreamError::Config("worker pool needs at least one worker".into()));
        }
        if key.is_empty() {
            return Err(StreamError::Config("key is empty".into()));
        }

        let mut pool = Self {
            shared: Arc::new(SharedQueues::new()),
            handles: Vec::with_capacity(width),
            width,
        };

        for id in 0..width {
            let worker = BlockWorker::new(id, Arc::clone(&key), Arc::clone(&pool.shared));
            let spawned = thread::Builder::new()
                .name(format!("{WORKER_THREAD_PREFIX}-{id}"))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => pool.handles.push(handle),
                Err(e) => {
                    error!("[POOL] failed to start worker {id}: {e}");
                    // `pool` drops here and joins what was started
                    return Err(StreamError::Resource(format!("failed to start worker {id}: {e}")));
                }
            }
        }

        debug!("[POOL] started {width} workers");
        Ok(pool)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn shared(&self) -> &Arc<SharedQueues> {
        &self.shared
    }

    /// Hand a block to the pool.
    pub fn submit(&self, block: Block) -> Result<(), StreamError> {
        self.shared.submit(block)
    }

    /// Batch barrier: consume exactly `count` completion tokens.
    ///
    /// Waits in slices so a worker that died mid-batch is reported instead of
    /// blocking forever.
    pub fn await_completions(&self, count: usize) -> Result<(), StreamError> {
        let slice = Duration::from_millis(WORKER_HEALTH_CHECK_MS);
        let mut remaining = count;

        while remaining > 0 {
            if self.shared.completion.wait_timeout(slice) {
                remaining -= 1;
                continue;
            }
            if let Some(id) = self.handles.iter().position(|h| h.is_finished()) {
                return Err(StreamError::Resource(format!(
                    "worker {id} exited with {remaining} block(s) outstanding"
                )));
            }
        }

        Ok(())
    }

    /// Take every completed block, ascending by index.
    pub fn drain(&self) -> Result<Vec<Block>, StreamError> {
        Ok(self.shared.lock()?.drain_results())
    }

    /// Stop and join every worker. Returns per-worker stats, indexed by id.
    ///
    /// Any block still queued is dropped and logged; a clean run leaves none.
    pub fn shutdown(mut self) -> Result<Vec<WorkerStats>, StreamError> {
        self.shutdown_inner()
    }

    fn shutdown_inner(&mut self) -> Result<Vec<WorkerStats>, StreamError> {
        let handles = std::mem::take(&mut self.handles);
        if handles.is_empty() {
            return Ok(Vec::new());
        }

        self.shared.request_shutdown();
        // one wake-up per worker, even with an empty queue
        self.shared.submit.post_n(handles.len());

        let mut stats = Vec::with_capacity(handles.len());
        let mut first_err: Option<StreamError> = None;

        for (id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(s)) => stats.push(s),
                Ok(Err(e)) => {
                    error!("[POOL] worker {id} failed: {e}");
                    first_err.get_or_insert(e);
                }
                Err(_) => {
                    error!("[POOL] worker {id} panicked");
                    first_err.get_or_insert(StreamError::Resource(format!("worker {id} panicked")));
                }
            }
        }

        let leftover = self.shared.lock_for_cleanup().clear();
        if leftover > 0 {
            warn!("[POOL] dropped {leftover} block(s) left in queues at shutdown");
        }

        debug!("[POOL] shut down");
        match first_err {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            if let Err(e) = self.shutdown_inner() {
                error!("[POOL] shutdown on drop failed: {e}");
            }
        }
    }
}
