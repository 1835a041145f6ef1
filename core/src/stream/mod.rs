//! stream: incremental `aes128gcm` encode and decode.
//!
//! This module exposes the stable streaming API. Internals are layered:
//! framing knows nothing about keys, the encoder/decoder own the sequence
//! counter and phase, `core` wraps both for whole-stream use.

pub mod framing;
pub mod io;
pub mod core;
pub mod encoder;
pub mod decoder;

pub use self::io::{
    InputSource,
    OutputSink,
};

pub use encoder::{Aes128GcmEncoder, EncoderState};
pub use decoder::{Aes128GcmDecoder, DecoderState};

pub use self::core::{
    decode_bytes,
    decode_stream,
    encode_bytes,
    encode_stream,
    DecodeKey,
    DecodeParams,
    EncodeParams,
    StreamReport,
};
