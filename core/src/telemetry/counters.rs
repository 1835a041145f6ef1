//! telemetry/counters.rs
//! Mutable counters used while one stream is encoded or decoded.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::constants::TAG_LEN;

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub records: u64,
    pub bytes_plaintext: u64,
    /// Header plus every record as it appears on the wire.
    pub bytes_wire: u64,
    pub bytes_header: u64,
    /// Tags, delimiters and padding.
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Record the coding header.
    pub fn add_header(&mut self, header_len: usize) {
        self.bytes_header += header_len as u64;
        self.bytes_wire += header_len as u64;
    }

    /// Record one record.
    ///
    /// - `payload_len`: plaintext octets carried by the record
    /// - `record_len`: octets of the record on the wire (ciphertext + tag)
    pub fn add_record(&mut self, payload_len: usize, record_len: usize) {
        self.records += 1;
        self.bytes_plaintext += payload_len as u64;
        self.bytes_wire += record_len as u64;
        self.bytes_overhead += record_len.saturating_sub(payload_len) as u64;
    }

    /// Overhead octets beyond the AEAD tags (delimiters and padding).
    pub fn framing_overhead_bytes(&self) -> u64 {
        self.bytes_overhead
            .saturating_sub(self.records * TAG_LEN as u64)
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.records         += rhs.records;
        self.bytes_plaintext += rhs.bytes_plaintext;
        self.bytes_wire      += rhs.bytes_wire;
        self.bytes_header    += rhs.bytes_header;
        self.bytes_overhead  += rhs.bytes_overhead;
    }
}
