//! headers/types.rs
//! Coding header struct, fixed offsets and header errors.

use std::fmt;
use std::str::Utf8Error;

use thiserror::Error;

use crate::constants::{MAX_KEY_ID_LEN, MAX_RECORD_SIZE, MIN_RECORD_SIZE, SALT_LEN};

pub const SALT_OFFSET: usize = 0;
pub const RECORD_SIZE_OFFSET: usize = SALT_OFFSET + SALT_LEN;
pub const RECORD_SIZE_LEN: usize = 4;
pub const KEY_ID_LEN_OFFSET: usize = RECORD_SIZE_OFFSET + RECORD_SIZE_LEN;
pub const KEY_ID_OFFSET: usize = KEY_ID_LEN_OFFSET + 1;

/// Fixed part of the header (everything before the key id).
pub const HEADER_FIXED_LEN: usize = KEY_ID_OFFSET;

#[derive(Clone, PartialEq, Eq)]
pub struct CodingHeader {
    pub salt: [u8; SALT_LEN],
    pub record_size: u32,
    /// Empty when the stream carries no key identifier.
    pub key_id: String,
}

impl CodingHeader {
    pub fn new(salt: [u8; SALT_LEN], record_size: u32, key_id: impl Into<String>) -> Self {
        Self { salt, record_size, key_id: key_id.into() }
    }

    /// Encoded length: `21 + len(key_id)`.
    pub fn encoded_len(&self) -> usize {
        HEADER_FIXED_LEN + self.key_id.len()
    }

    /// Key id as the key-lookup collaborator sees it.
    pub fn key_id(&self) -> Option<&str> {
        if self.key_id.is_empty() {
            None
        } else {
            Some(&self.key_id)
        }
    }

    /// Plaintext octets that fit in one record next to the delimiter.
    pub fn record_capacity(&self) -> usize {
        self.record_size as usize - crate::constants::RECORD_OVERHEAD
    }

    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.key_id.len() > MAX_KEY_ID_LEN {
            return Err(HeaderError::KeyIdTooLong { len: self.key_id.len() });
        }
        if self.record_size < MIN_RECORD_SIZE {
            return Err(HeaderError::RecordSizeTooSmall { have: self.record_size });
        }
        if self.record_size > MAX_RECORD_SIZE {
            return Err(HeaderError::RecordSizeUnsupported { have: self.record_size });
        }
        Ok(())
    }
}

// Salt is not secret, but keep log lines short.
impl fmt::Debug for CodingHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodingHeader")
            .field("salt", &hex::encode(self.salt))
            .field("record_size", &self.record_size)
            .field("key_id", &self.key_id)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum HeaderError {
    /// Source ended inside the header.
    #[error("invalid coding header: truncated {field} ({have} of {need} octets)")]
    Truncated { field: &'static str, have: usize, need: usize },

    /// Key id does not fit the one-octet length field.
    #[error("key id too long: {len} > {MAX_KEY_ID_LEN} octets")]
    KeyIdTooLong { len: usize },

    /// Key id octets are not UTF-8.
    #[error("key id is not valid UTF-8: {0}")]
    InvalidKeyId(#[from] Utf8Error),

    /// Record size leaves no room for payload.
    #[error("record size {have} below minimum {MIN_RECORD_SIZE}")]
    RecordSizeTooSmall { have: u32 },

    /// Record size above what this implementation buffers.
    #[error("record size {have} larger than supported maximum {MAX_RECORD_SIZE}")]
    RecordSizeUnsupported { have: u32 },

    /// Underlying source failed while reading the header.
    #[error("I/O error reading coding header: {0}")]
    Io(#[from] std::io::Error),
}
