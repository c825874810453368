// ## 📂 File: `src/crypto/types.rs`

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Key material is empty; the transform is undefined.
    #[error("key is empty")]
    EmptyKey,

    /// Block has more valid bytes than the key covers.
    #[error("block length {block_len} exceeds key length {key_len}")]
    BlockLongerThanKey { block_len: usize, key_len: usize },
}
