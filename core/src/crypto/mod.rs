//! crypto/mod.rs
//! Key schedule (bit rotation) and the XOR block transform.
//!
//! Notes:
//! - Not a secure cipher. XOR against a rotating key is a reversible
//!   scrambler; confidentiality is out of scope.
//! - The block at stream index `i` is always transformed with
//!   `rotate(original_key, i)`, so any worker can derive its key alone.

pub mod types;
pub mod rotate;
pub mod xor;
pub mod key;

pub use types::*;
pub use rotate::*;
pub use xor::*;
pub use key::*;
