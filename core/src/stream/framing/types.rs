use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

use crate::constants::delimiters;

/// Delimiter octet closing the payload of a record plaintext.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum Delimiter {
    /// More records follow.
    Record = delimiters::RECORD,
    /// Final record of the stream.
    LastRecord = delimiters::LAST_RECORD,
}

impl Delimiter {
    pub fn is_last(self) -> bool {
        self == Delimiter::LastRecord
    }
}

/// Where the payload ends inside a decrypted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordBoundary {
    /// Payload octets preceding the delimiter.
    pub payload_len: usize,
    pub delimiter: Delimiter,
}

impl RecordBoundary {
    pub fn is_final(&self) -> bool {
        self.delimiter.is_last()
    }
}

/// Which records may carry zero padding after the delimiter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaddingPolicy {
    /// Only the final record may be padded; a `0x01` delimiter must sit at
    /// index `record_capacity`.
    #[default]
    FinalRecordOnly,
    /// Any full-size record may be padded (RFC 8188 section 2).
    AnyRecord,
}

#[derive(Debug, Error)]
pub enum FrameError {
    /// No non-zero octet in the record plaintext.
    #[error("invalid record delimiter: record {sequence} is all padding")]
    DelimiterNotFound { sequence: u64 },

    /// Last non-zero octet is neither 0x01 nor 0x02.
    #[error("invalid record delimiter: record {sequence} ends with 0x{octet:02x}")]
    InvalidDelimiter { sequence: u64, octet: u8 },

    /// A `0x01` record that is padded or shorter than a full record.
    #[error("invalid record delimiter: non-final record {sequence} has delimiter at {index}, expected {capacity}")]
    NonFinalRecordPadded { sequence: u64, index: usize, capacity: usize },

    /// Source ended before a final record was seen.
    #[error("invalid records order or missing record(s): no record {sequence}")]
    MissingRecord { sequence: u64 },

    /// Data follows the final record.
    #[error("invalid records order or missing record(s): data after final record {sequence}")]
    TrailingData { sequence: u64 },
}

impl FrameError {
    /// Missing, duplicated or reordered records, as opposed to a malformed record.
    pub fn is_ordering(&self) -> bool {
        matches!(self, FrameError::MissingRecord { .. } | FrameError::TrailingData { .. })
    }
}
