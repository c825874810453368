// ## 📂 File: `src/crypto/rotate.rs`

//! crypto/rotate.rs
//! Left rotation of a key's bit-string.
//!
//! Layout:
//! - Byte 0 holds the most-significant 8 bits of the value.
//! - Rotating left by `s` bits maps bit `k` to bit `(k + s) mod 8L`.
//!
//! Two phases:
//! - whole bytes, in place via cycle decomposition (`gcd(B, L)` cycles)
//! - remaining `< 8` bits, one single-bit pass at a time
//!
//! Group law relied on by the pipeline:
//! - `rotate(k, 0) == k`
//! - `rotate(rotate(k, a), b) == rotate(k, (a + b) mod 8L)`

use crate::constants::BITS_PER_BYTE;

/// Greatest common divisor (Euclid).
pub fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        return a;
    }
    gcd(b, a % b)
}

/// Rotate `key`'s bit-string left by `shift_bits mod (8 * key.len())`, in place.
///
/// The shift is reduced before any narrowing, so block indices of any size
/// and keys of any length are handled. Empty keys are left untouched.
pub fn rotate_key(key: &mut [u8], shift_bits: u64) {
    if key.is_empty() {
        return;
    }

    let total_bits = key.len() as u64 * BITS_PER_BYTE;
    let shift = shift_bits % total_bits;

    let byte_shift = (shift / BITS_PER_BYTE) as usize;
    let bit_shift = (shift % BITS_PER_BYTE) as u8;

    if byte_shift != 0 {
        rotate_bytes_left(key, byte_shift);
    }
    if bit_shift != 0 {
        rotate_bits_left(key, bit_shift);
    }
}

/// Copy `src` into `dst` and rotate the copy. `dst` must match `src` in length.
///
/// Workers use this with a scratch buffer allocated once per thread.
#[inline]
pub fn rotate_into(src: &[u8], dst: &mut [u8], shift_bits: u64) {
    dst.copy_from_slice(src);
    rotate_key(dst, shift_bits);
}

/// Owned rotated copy of `key`.
pub fn rotated(key: &[u8], shift_bits: u64) -> Vec<u8> {
    let mut out = key.to_vec();
    rotate_key(&mut out, shift_bits);
    out
}

/// Cyclic left rotation of the byte array by `shift` positions (byte 0
/// receives the old byte `shift`). O(L) time, O(1) extra space.
pub fn rotate_bytes_left(buf: &mut [u8], shift: usize) {
    let len = buf.len();
    if len == 0 {
        return;
    }
    let shift = shift % len;
    if shift == 0 {
        return;
    }

    let cycles = gcd(shift, len);

    for start in 0..cycles {
        let first = buf[start];
        let mut pos = start;

        loop {
            let mut next = pos + shift;
            if next >= len {
                next -= len;
            }
            if next == start {
                break;
            }
            buf[pos] = buf[next];
            pos = next;
        }

        buf[pos] = first;
    }
}

/// Rotate the bit-string left by `bits` (< 8), one single-bit pass per step.
pub fn rotate_bits_left(buf: &mut [u8], bits: u8) {
    debug_assert!(bits < 8, "bit phase takes the sub-byte remainder only");
    if buf.is_empty() {
        return;
    }
    for _ in 0..bits {
        rotate_bits_left_once(buf);
    }
}

// MSB of byte i+1 feeds the LSB of byte i; MSB of byte 0 wraps to the LSB of byte L-1.
fn rotate_bits_left_once(buf: &mut [u8]) {
    let carry = buf[0] >> 7;
    let last = buf.len() - 1;

    for i in 0..last {
        buf[i] = (buf[i] << 1) | (buf[i + 1] >> 7);
    }

    buf[last] = (buf[last] << 1) | carry;
}
