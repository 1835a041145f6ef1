use thiserror::Error;

use crate::constants::{KEY_LEN, SALT_LEN, TAG_LEN};

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Input keying material has the wrong length.
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    /// Salt has the wrong length.
    #[error("invalid salt length: expected={expected}, actual={actual}")]
    InvalidSaltLen { expected: usize, actual: usize },

    /// Record is shorter than the authentication tag.
    #[error("record too short for AEAD tag: {len} < {TAG_LEN}")]
    RecordTooShort { len: usize },

    /// AEAD tag mismatch (authentication failure).
    #[error("AEAD tag mismatch on record {sequence}")]
    TagMismatch { sequence: u64 },

    /// The 64-bit record sequence number space is used up.
    #[error("record sequence number exhausted")]
    SequenceExhausted,

    /// General derivation or runtime error with context.
    #[error("crypto failure: {0}")]
    Failure(String),
}

impl CryptoError {
    pub(crate) fn key_len(actual: usize) -> Self {
        CryptoError::InvalidKeyLen { expected: KEY_LEN, actual }
    }

    pub(crate) fn salt_len(actual: usize) -> Self {
        CryptoError::InvalidSaltLen { expected: SALT_LEN, actual }
    }

    /// True when the failure means the ciphertext did not authenticate.
    pub fn is_verification(&self) -> bool {
        matches!(self, CryptoError::TagMismatch { .. } | CryptoError::RecordTooShort { .. })
    }
}
