//! Record framing for `aes128gcm`.
//!
//! Responsibilities:
//! - Split plaintext into delimited record plaintexts sized for one record
//! - Locate the delimiter in a decrypted record and validate padding
//!
//! Non-responsibilities:
//! - Cryptography
//! - IO

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    Delimiter,
    FrameError,
    PaddingPolicy,
    RecordBoundary,
};
pub use encode::RecordFramer;
pub use decode::locate_delimiter;
