//! ece-core
//!
//! Pure Rust streaming implementation of RFC 8188 Encrypted Content-Encoding
//! (`aes128gcm`). No FFI, no async runtime.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod crypto;
pub mod headers;
pub mod keys;
pub mod telemetry;

// Stream layers
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::keys::{KeyLocator, KeyTable};
    pub use crate::stream::framing::PaddingPolicy;
    pub use crate::stream::{
        decode_bytes, decode_stream, encode_bytes, encode_stream, Aes128GcmDecoder, Aes128GcmEncoder,
        DecodeKey, DecodeParams, EncodeParams, InputSource, OutputSink, StreamReport,
    };
    pub use crate::types::{ErrorKind, StreamError};
}
