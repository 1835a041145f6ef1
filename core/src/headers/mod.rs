//! headers/mod.rs
//! Coding header that prefixes every `aes128gcm` encoded stream.
//!
//! ```text
//! +----------+---------------+-------------+-----------------+
//! | SALT(16) | RECORDSIZE(4) | KEYIDLEN(1) | KEYID(KEYIDLEN) |
//! +----------+---------------+-------------+-----------------+
//! ```
//!
//! - Record size is a big-endian u32.
//! - Key id is UTF-8; length zero means "no key id".
//! - Exactly one header precedes the record sequence and is immutable once written or read.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
