// ## src/telemetry/snapshot.rs

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Immutable report of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Pool width used (0 = sequential path).
    pub workers: usize,
    /// Key length = block size.
    pub block_len: usize,
    pub counters: TelemetryCounters,
    /// Blocks per barrier round, in order. Empty for sequential runs.
    pub batch_sizes: Vec<usize>,
    /// Blocks processed by each worker, indexed by worker id.
    pub worker_blocks: Vec<u64>,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    /// Captured output for `OutputSink::Memory`.
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer, workers: usize, block_len: usize) -> Self {
        let elapsed = timer.elapsed();

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_in as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            workers,
            block_len,
            counters: counters.clone(),
            batch_sizes: Vec::new(),
            worker_blocks: Vec::new(),
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
            output: None,
        }
    }

    pub fn with_batches(mut self, batch_sizes: Vec<usize>) -> Self {
        self.batch_sizes = batch_sizes;
        self
    }

    pub fn with_worker_blocks(mut self, worker_blocks: Vec<u64>) -> Self {
        self.worker_blocks = worker_blocks;
        self
    }

    pub fn attach_output(&mut self, buf: Vec<u8>) {
        self.output = Some(buf);
    }

    pub fn stage_ms(&self, stage: Stage) -> f64 {
        self.stage_times.get_ms(stage)
    }

    /// Invariants every clean run satisfies:
    /// - output length == input length
    /// - at most one short block
    /// - batch sizes add up to the block count (parallel runs)
    /// - workers processed every block exactly once (parallel runs)
    pub fn sanity_check(&self) -> bool {
        let lengths = self.counters.bytes_in == self.counters.bytes_out;
        let short = self.counters.short_blocks <= 1;

        if self.workers == 0 {
            return lengths && short;
        }

        let batched: u64 = self.batch_sizes.iter().map(|&n| n as u64).sum();
        let processed: u64 = self.worker_blocks.iter().sum();

        lengths
            && short
            && batched == self.counters.blocks
            && processed == self.counters.blocks
            && self.batch_sizes.iter().all(|&n| n >= 1 && n <= self.workers)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
