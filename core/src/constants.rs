// ## 📂 File: `src/constants.rs`

/// Bits in one key byte. A key of length L has a bit-string of `8 * L` bits.
pub const BITS_PER_BYTE: u64 = 8;

/// Upper bound on the worker pool width.
pub const MAX_WORKERS: usize = 1024;

/// Pool width that selects the single-threaded path.
pub const SEQUENTIAL_WORKERS: usize = 0;

/// Thread name prefix for pool workers (`xorstream-worker-<id>`).
pub const WORKER_THREAD_PREFIX: &str = "xorstream-worker";

/// How long the coordinator waits on the completion signal before it
/// checks whether a worker died mid-batch.
pub const WORKER_HEALTH_CHECK_MS: u64 = 250;
