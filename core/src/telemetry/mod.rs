//! telemetry/mod.rs
//! Per-stream counters and immutable snapshots.
//!
//! Counters are owned by one stream and updated once per record; snapshots are
//! plain values callers can log or serialize.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
