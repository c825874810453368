// ## 📂 File: `src/stream/queue.rs`

//! Submission + result queues behind a single lock.
//!
//! - Submission: FIFO, stream order.
//! - Result: keyed by block index, so it is sorted at every insertion no
//!   matter which worker finishes first. A duplicate index is rejected.
//! - Both are always touched under the same `Mutex`; with one lock there is
//!   no lock ordering to get wrong.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::stream::block::Block;
use crate::stream::signal::CountingSignal;
use crate::types::StreamError;

#[derive(Debug, Default)]
pub struct BlockQueues {
    submission: VecDeque<Block>,
    results: BTreeMap<u64, Block>,
}

impl BlockQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_submission(&mut self, block: Block) {
        self.submission.push_back(block);
    }

    pub fn pop_submission(&mut self) -> Option<Block> {
        self.submission.pop_front()
    }

    /// Insert a finished block at its sorted position.
    pub fn insert_result(&mut self, block: Block) -> Result<(), StreamError> {
        let index = block.index();
        if self.results.contains_key(&index) {
            return Err(StreamError::Pipeline(format!(
                "block {index} completed twice"
            )));
        }
        self.results.insert(index, block);
        Ok(())
    }

    /// Take every completed block, ascending by index.
    pub fn drain_results(&mut self) -> Vec<Block> {
        std::mem::take(&mut self.results).into_values().collect()
    }

    pub fn submission_len(&self) -> usize {
        self.submission.len()
    }

    pub fn result_len(&self) -> usize {
        self.results.len()
    }

    /// Result indices in queue order (ascending).
    pub fn result_indices(&self) -> Vec<u64> {
        self.results.keys().copied().collect()
    }

    /// Drop everything left in either queue. Returns how many blocks went.
    pub fn clear(&mut self) -> usize {
        let dropped = self.submission.len() + self.results.len();
        self.submission.clear();
        self.results.clear();
        dropped
    }
}

/// State shared between the coordinator and every worker.
#[derive(Debug, Default)]
pub struct SharedQueues {
    queues: Mutex<BlockQueues>,
    /// One token per block appended to the submission queue.
    pub submit: CountingSignal,
    /// One token per block inserted into the result queue.
    pub completion: CountingSignal,
    shutdown: AtomicBool,
}

impl SharedQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, BlockQueues>, StreamError> {
        self.queues
            .lock()
            .map_err(|_| StreamError::Resource("block queue lock poisoned".into()))
    }

    /// Lock even if a worker panicked while holding it (cleanup paths only).
    pub fn lock_for_cleanup(&self) -> MutexGuard<'_, BlockQueues> {
        self.queues.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append to the submission queue, then raise the submit signal.
    pub fn submit(&self, block: Block) -> Result<(), StreamError> {
        self.lock()?.push_submission(block);
        self.submit.post();
        Ok(())
    }

    /// Insert into the result queue, then raise the completion signal.
    pub fn complete(&self, block: Block) -> Result<(), StreamError> {
        self.lock()?.insert_result(block)?;
        self.completion.post();
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}
