// ## 📂 File: `src/crypto/key.rs`

//! crypto/key.rs
//! Key material loaded once per run.
//!
//! - Length L defines the block size for the whole stream.
//! - Shared read-only (`Arc<[u8]>`) across pool workers.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::crypto::rotate::rotated;
use crate::types::StreamError;

#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    bytes: Arc<[u8]>,
}

impl Key {
    /// Build a key from raw bytes. Empty input is a config error.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, StreamError> {
        let bytes: Vec<u8> = bytes.into();
        if bytes.is_empty() {
            return Err(StreamError::Config("key is empty".into()));
        }
        Ok(Self { bytes: bytes.into() })
    }

    /// Read the whole key file. Missing, unreadable and empty files are
    /// config errors; nothing downstream runs without a key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            StreamError::Config(format!("cannot read key file {}: {}", path.display(), e))
        })?;

        if bytes.is_empty() {
            return Err(StreamError::Config(format!(
                "key file {} is empty",
                path.display()
            )));
        }

        log::debug!("[KEY] loaded {} bytes from {}", bytes.len(), path.display());
        Ok(Self { bytes: bytes.into() })
    }

    /// Key length in bytes (= block size).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a constructed key; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap handle to the shared read-only buffer.
    pub fn shared(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// `rotate(self, shift_bits)` as an owned buffer.
    pub fn rotated(&self, shift_bits: u64) -> Vec<u8> {
        rotated(&self.bytes, shift_bits)
    }
}

// Never print key material.
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key").field("len", &self.bytes.len()).finish()
    }
}
