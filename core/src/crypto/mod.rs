//! crypto/mod.rs
//! Key schedule, nonce construction and the per-record AEAD.
//!
//! Everything here is a pure function of its inputs. Streams own the
//! sequence counter; this module never keeps per-record state.

pub mod types;
pub mod aead;
pub mod kdf;
pub mod nonce;

pub use types::*;
pub use aead::*;
pub use kdf::*;
pub use nonce::*;
