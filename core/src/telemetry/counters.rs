// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters used during a run.
//!
//! Converted into an immutable `TelemetrySnapshot` at pipeline end.
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    /// Blocks read from input (= blocks written).
    pub blocks: u64,
    /// Blocks shorter than the key. At most one per run, and always last.
    pub short_blocks: u64,
    /// Barrier rounds that carried at least one block (parallel mode).
    pub batches: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl TelemetryCounters {
    /// Record one block read from input.
    pub fn add_block(&mut self, len: usize, block_len: usize) {
        self.blocks += 1;
        self.bytes_in += len as u64;
        if len < block_len {
            self.short_blocks += 1;
        }
    }

    /// Record bytes flushed to output.
    pub fn add_written(&mut self, len: usize) {
        self.bytes_out += len as u64;
    }

    pub fn add_batch(&mut self) {
        self.batches += 1;
    }
}
