// ## 📂 File: `src/crypto/xor.rs`

use crate::crypto::types::CipherError;

/// XOR the block's valid bytes against the same-length prefix of `key`.
///
/// Contract:
/// - `key` is non-empty, otherwise `EmptyKey`.
/// - `block.len() <= key.len()`, otherwise `BlockLongerThanKey`.
/// - Involutive: applying twice with the same key restores the block.
#[inline]
pub fn apply_keystream(block: &mut [u8], key: &[u8]) -> Result<(), CipherError> {
    if key.is_empty() {
        return Err(CipherError::EmptyKey);
    }
    if block.len() > key.len() {
        return Err(CipherError::BlockLongerThanKey {
            block_len: block.len(),
            key_len: key.len(),
        });
    }

    block
        .iter_mut()
        .zip(key)
        .for_each(|(b, k)| *b ^= k);

    Ok(())
}
