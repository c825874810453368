use serde::{Deserialize, Serialize};

use crate::constants::{MAX_WORKERS, SEQUENTIAL_WORKERS};
use crate::types::StreamError;

/// Parallelism configuration
///
/// `workers == 0` selects the sequential path; anything else starts a pool
/// of exactly that many persistent workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelismProfile {
    pub workers: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::sequential()
    }
}

impl ParallelismProfile {
    pub fn sequential() -> Self {
        Self { workers: SEQUENTIAL_WORKERS }
    }

    /// Fixed pool width, validated against `MAX_WORKERS`. 0 is sequential.
    pub fn fixed(workers: usize) -> Result<Self, StreamError> {
        if workers > MAX_WORKERS {
            return Err(StreamError::Config(format!(
                "invalid worker count: {workers}, must be at most {MAX_WORKERS}"
            )));
        }
        Ok(Self { workers })
    }

    /// One worker per logical CPU.
    pub fn available() -> Self {
        let cores = num_cpus::get();
        Self {
            workers: cores.clamp(1, MAX_WORKERS),
        }
    }

    pub fn is_sequential(&self) -> bool {
        self.workers == SEQUENTIAL_WORKERS
    }
}
