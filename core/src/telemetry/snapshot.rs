//! telemetry/snapshot.rs
//!
//! Immutable telemetry snapshot taken from a stream.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub records: u64,
    pub bytes_plaintext: u64,
    pub bytes_wire: u64,
    pub bytes_header: u64,
    pub bytes_overhead: u64,
    /// Wire octets per plaintext octet; 0.0 before any plaintext.
    pub expansion_ratio: f64,
    pub throughput_plaintext_bytes_per_sec: f64,
    pub elapsed: Duration,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, elapsed: Duration) -> Self {
        let expansion_ratio = if counters.bytes_plaintext > 0 {
            counters.bytes_wire as f64 / counters.bytes_plaintext as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_plaintext as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            records: counters.records,
            bytes_plaintext: counters.bytes_plaintext,
            bytes_wire: counters.bytes_wire,
            bytes_header: counters.bytes_header,
            bytes_overhead: counters.bytes_overhead,
            expansion_ratio,
            throughput_plaintext_bytes_per_sec: throughput,
            elapsed,
        }
    }

    /// Header, record and overhead totals agree with each other.
    pub fn sanity_check(&self) -> bool {
        self.bytes_wire == self.bytes_header + self.bytes_plaintext + self.bytes_overhead
    }
}
