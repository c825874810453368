//! telemetry/mod.rs
//! Counters, stage timers and the immutable per-run snapshot.
//!
//! - Counters are owned by the coordinator thread; workers report their own
//!   block counts when the pool shuts down, so no atomics are needed.
//! - The snapshot is `Serialize` so front ends can emit it as JSON.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
