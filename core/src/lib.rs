//! xorstream-core
//!
//! Block-parallel rotating-XOR stream engine.
//! Parallel and sequential runs produce byte-identical output.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Key schedule + block cipher
pub mod crypto;
pub mod telemetry;

// Stream layer
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::crypto::{Key, apply_keystream, rotate_key};
    pub use crate::stream::{
        InputSource, OutputSink, ParallelismProfile, PipelineConfig, transform_bytes,
        transform_stream,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{ErrorKind, StreamError};
}
