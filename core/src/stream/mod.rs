// ## 1️⃣ `mod.rs` — public façade + re-exports

//! stream — block-parallel rotating-XOR streaming.
//!
//! Layers, leaves first:
//! - `block`: an indexed, owned chunk of input
//! - `signal` + `queue`: one lock over both queues, two counting signals
//! - `worker`: fixed pool of persistent workers
//! - `pipeline`: coordinator, parallel batches or sequential fallback
//! - `core`: stable public API over normalized I/O

pub mod block;
pub mod signal;
pub mod queue;
pub mod worker;
pub mod parallelism;
pub mod pipeline;
pub mod io;
pub mod core;

pub use block::Block;
pub use io::{InputSource, OutputSink};
pub use parallelism::ParallelismProfile;
pub use pipeline::{run_parallel_pipeline, run_pipeline, run_sequential_pipeline, PipelineConfig};
pub use self::core::{transform_bytes, transform_stream};
