use std::io;
use thiserror::Error;

use crate::crypto::CipherError;

/// Coarse error class, used by front ends to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad key file or pool configuration. Nothing was processed.
    Config,
    /// Thread start failure, poisoned lock, dead worker.
    Resource,
    /// Read/write failure on the byte streams.
    Io,
}

/// Unified stream error covering setup, worker pool and I/O failures.
/// - `From<T>` impls enable `?` across the pipeline.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Missing/unreadable/empty key file, invalid pool width.
    #[error("config error: {0}")]
    Config(String),

    /// Worker pool startup or runtime failure.
    #[error("resource error: {0}")]
    Resource(String),

    /// Ordering invariant broken between submission and output.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Block/key length mismatch.
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// I/O error on the input or output stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StreamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Config(_) | StreamError::Cipher(_) => ErrorKind::Config,
            StreamError::Resource(_) | StreamError::Pipeline(_) => ErrorKind::Resource,
            StreamError::Io(_) => ErrorKind::Io,
        }
    }
}
