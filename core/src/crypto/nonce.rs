//! crypto/nonce.rs
//! Per-record nonce derivation from the stream nonce base and record sequence number.
//!
//! Design:
//! - Take the 12-byte nonce base from the key schedule.
//! - XOR the low 8 bytes (positions 4..12) with the big-endian sequence number.
//!   The leading 4 bytes of the base pass through unchanged.
//!
//! Security notes:
//! - Never reuse a sequence number within one stream. Streams enforce this with a
//!   single monotonically increasing counter starting at zero.

use crate::constants::NONCE_LEN;

/// Derive the AEAD nonce for record `sequence`.
///
/// Deterministic mapping: same `(nonce_base, sequence)` -> same nonce, and distinct
/// sequence numbers produce distinct nonces for a fixed base.
#[inline]
pub fn derive_record_nonce(nonce_base: &[u8; NONCE_LEN], sequence: u64) -> [u8; NONCE_LEN] {
    let mut nonce = *nonce_base;

    let ctr: [u8; 8] = sequence.to_be_bytes();
    let offset = NONCE_LEN - ctr.len();
    for (j, b) in ctr.iter().enumerate() {
        nonce[offset + j] ^= b;
    }

    nonce
}
