use std::io;

use thiserror::Error;

use crate::constants::{KEY_LEN, MAX_KEY_ID_LEN, MAX_RECORD_SIZE, MIN_RECORD_SIZE, SALT_LEN};
use crate::crypto::CryptoError;
use crate::headers::HeaderError;
use crate::keys::KeyLookupError;
use crate::stream::framing::FrameError;

/// Caller contract violations, raised before any octet reaches the sink.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the 'key' parameter must be {KEY_LEN} octets long, got {0}")]
    KeyLength(usize),

    #[error("the 'salt' parameter must be {SALT_LEN} octets long, got {0}")]
    SaltLength(usize),

    #[error("the 'key_id' parameter is too long: {0} > {MAX_KEY_ID_LEN} octets")]
    KeyIdTooLong(usize),

    #[error("the 'record_size' parameter must be at least {MIN_RECORD_SIZE}, got {0}")]
    RecordSizeTooSmall(u32),

    #[error("the 'record_size' parameter must be at most {MAX_RECORD_SIZE}, got {0}")]
    RecordSizeTooLarge(u32),
}

/// Failure classes a caller can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller contract violation (key/salt/key id/record size).
    Configuration,
    /// Coding header missing or cut short.
    MalformedHeader,
    /// Delimiter missing or a non-final record padded.
    Framing,
    /// Missing, extra, duplicated or reordered records.
    Ordering,
    /// AEAD authentication failed.
    Verification,
    /// Operation not valid for the stream's state, or a record size this
    /// implementation does not buffer.
    Unsupported,
    /// Underlying source or sink failed.
    Io,
}

/// Unified stream error covering configuration, header, framing, crypto, key lookup and I/O.
/// - `From<T>` impls enable `?` across the layers.
/// - Messages are stable and carry the context needed for logs.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("key lookup error: {0}")]
    KeyLookup(#[from] KeyLookupError),

    /// Operation the stream does not support in its current direction or phase.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Stream already failed; it stays unusable.
    #[error("stream is in a failed state after an earlier error")]
    Poisoned,

    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl StreamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Config(_) => ErrorKind::Configuration,
            StreamError::KeyLookup(_) => ErrorKind::Configuration,
            StreamError::Header(e) => match e {
                HeaderError::Truncated { .. }
                | HeaderError::InvalidKeyId(_)
                | HeaderError::RecordSizeTooSmall { .. } => ErrorKind::MalformedHeader,
                HeaderError::KeyIdTooLong { .. } => ErrorKind::Configuration,
                HeaderError::RecordSizeUnsupported { .. } => ErrorKind::Unsupported,
                HeaderError::Io(_) => ErrorKind::Io,
            },
            StreamError::Frame(e) if e.is_ordering() => ErrorKind::Ordering,
            StreamError::Frame(_) => ErrorKind::Framing,
            StreamError::Crypto(e) if e.is_verification() => ErrorKind::Verification,
            StreamError::Crypto(CryptoError::SequenceExhausted) => ErrorKind::Unsupported,
            StreamError::Crypto(_) => ErrorKind::Configuration,
            StreamError::Unsupported(_) | StreamError::Poisoned => ErrorKind::Unsupported,
            StreamError::Io(_) => ErrorKind::Io,
        }
    }

    /// Wrap for travel through `std::io::Read` / `Write`.
    pub(crate) fn into_io(self) -> io::Error {
        match self {
            StreamError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

impl From<io::Error> for StreamError {
    /// Unwraps codec errors that crossed a `Read`/`Write` boundary.
    fn from(e: io::Error) -> Self {
        let is_codec = e.get_ref().is_some_and(|inner| inner.is::<StreamError>());
        if !is_codec {
            return StreamError::Io(e);
        }
        match e.into_inner().map(|inner| inner.downcast::<StreamError>()) {
            Some(Ok(inner)) => *inner,
            _ => StreamError::Io(io::Error::other("codec error lost in conversion")),
        }
    }
}
