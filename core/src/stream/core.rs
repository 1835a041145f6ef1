//! Stable public API: stream parameters and whole-stream encode/decode.

use std::io::{self, Read, Write};

use zeroize::Zeroizing;

use crate::constants::{DEFAULT_RECORD_SIZE, KEY_LEN, MAX_KEY_ID_LEN, MAX_RECORD_SIZE, MIN_RECORD_SIZE, SALT_LEN};
use crate::headers::CodingHeader;
use crate::keys::KeyLocator;
use crate::stream::decoder::Aes128GcmDecoder;
use crate::stream::encoder::Aes128GcmEncoder;
use crate::stream::framing::PaddingPolicy;
use crate::stream::io::{open_input, open_output, InputSource, OutputSink};
use crate::telemetry::TelemetrySnapshot;
use crate::types::{ConfigError, StreamError};

/// Encoder configuration.
#[derive(Clone, Debug)]
pub struct EncodeParams {
    /// Fixed salt; a fresh random salt is drawn per stream when `None`.
    pub salt: Option<Vec<u8>>,
    pub key_id: Option<String>,
    pub record_size: u32,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            salt: None,
            key_id: None,
            record_size: DEFAULT_RECORD_SIZE,
        }
    }
}

impl EncodeParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    pub fn with_record_size(mut self, record_size: u32) -> Self {
        self.record_size = record_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(salt) = &self.salt {
            if salt.len() != SALT_LEN {
                return Err(ConfigError::SaltLength(salt.len()));
            }
        }
        if let Some(key_id) = &self.key_id {
            if key_id.len() > MAX_KEY_ID_LEN {
                return Err(ConfigError::KeyIdTooLong(key_id.len()));
            }
        }
        if self.record_size < MIN_RECORD_SIZE {
            return Err(ConfigError::RecordSizeTooSmall(self.record_size));
        }
        if self.record_size > MAX_RECORD_SIZE {
            return Err(ConfigError::RecordSizeTooLarge(self.record_size));
        }
        Ok(())
    }
}

/// Decoder configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeParams {
    pub padding: PaddingPolicy,
}

impl DecodeParams {
    pub fn with_padding(padding: PaddingPolicy) -> Self {
        Self { padding }
    }
}

/// Where the decoder gets its key.
pub enum DecodeKey {
    Key(Zeroizing<Vec<u8>>),
    /// Consulted once, with the key id from the coding header.
    Locator(Box<dyn KeyLocator + Send>),
}

impl DecodeKey {
    pub fn key(key: &[u8]) -> Self {
        DecodeKey::Key(Zeroizing::new(key.to_vec()))
    }

    pub fn locator(locator: impl KeyLocator + Send + 'static) -> Self {
        DecodeKey::Locator(Box::new(locator))
    }
}

impl std::fmt::Debug for DecodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeKey::Key(_) => f.write_str("DecodeKey::Key(..)"),
            DecodeKey::Locator(_) => f.write_str("DecodeKey::Locator(..)"),
        }
    }
}

pub(crate) fn validate_key(key: &[u8]) -> Result<(), ConfigError> {
    if key.len() != KEY_LEN {
        return Err(ConfigError::KeyLength(key.len()));
    }
    Ok(())
}

/// Outcome of a whole-stream call.
#[derive(Debug, Clone)]
pub struct StreamReport {
    pub header: CodingHeader,
    pub telemetry: TelemetrySnapshot,
    /// Output bytes, only for `OutputSink::Memory`.
    pub output: Option<Vec<u8>>,
}

/// Encode everything `input` yields into `output`.
pub fn encode_stream(
    input: InputSource,
    output: OutputSink,
    key: &[u8],
    params: EncodeParams,
) -> Result<StreamReport, StreamError> {
    let mut reader = open_input(input)?;
    match open_output(output)? {
        Some(writer) => {
            let (header, telemetry, _) = run_encode(&mut reader, writer, key, params)?;
            Ok(StreamReport { header, telemetry, output: None })
        }
        None => {
            let (header, telemetry, buf) = run_encode(&mut reader, Vec::new(), key, params)?;
            Ok(StreamReport { header, telemetry, output: Some(buf) })
        }
    }
}

/// Decode one encoded stream from `input` into `output`.
pub fn decode_stream(
    input: InputSource,
    output: OutputSink,
    key: DecodeKey,
    params: DecodeParams,
) -> Result<StreamReport, StreamError> {
    let reader = open_input(input)?;
    match open_output(output)? {
        Some(mut writer) => {
            let (header, telemetry) = run_decode(reader, &mut writer, key, params)?;
            Ok(StreamReport { header, telemetry, output: None })
        }
        None => {
            let mut buf = Vec::new();
            let (header, telemetry) = run_decode(reader, &mut buf, key, params)?;
            Ok(StreamReport { header, telemetry, output: Some(buf) })
        }
    }
}

/// Encode a fully buffered plaintext.
pub fn encode_bytes(plaintext: &[u8], key: &[u8], params: EncodeParams) -> Result<Vec<u8>, StreamError> {
    let mut encoder = Aes128GcmEncoder::new(Vec::new(), key, params)?;
    encoder.write_all(plaintext)?;
    encoder.finish()?;
    Ok(encoder.into_inner())
}

/// Decode a fully buffered encoded stream. Nothing is returned unless every record verifies.
pub fn decode_bytes(encoded: &[u8], key: &[u8]) -> Result<Vec<u8>, StreamError> {
    let mut decoder = Aes128GcmDecoder::new(encoded, key)?;
    let mut plaintext = Vec::new();
    decoder.read_to_end(&mut plaintext)?;
    Ok(plaintext)
}

fn run_encode<R: Read, W: Write>(
    reader: &mut R,
    writer: W,
    key: &[u8],
    params: EncodeParams,
) -> Result<(CodingHeader, TelemetrySnapshot, W), StreamError> {
    let mut encoder = Aes128GcmEncoder::new(writer, key, params)?;
    io::copy(reader, &mut encoder)?;
    encoder.finish()?;

    let header = encoder
        .header()
        .cloned()
        .ok_or(StreamError::Unsupported("encoder finished without a header"))?;
    let telemetry = encoder.telemetry();
    Ok((header, telemetry, encoder.into_inner()))
}

fn run_decode<R: Read, W: Write>(
    reader: R,
    writer: &mut W,
    key: DecodeKey,
    params: DecodeParams,
) -> Result<(CodingHeader, TelemetrySnapshot), StreamError> {
    let mut decoder = Aes128GcmDecoder::with_params(reader, key, params)?;
    io::copy(&mut decoder, writer)?;
    writer.flush()?;

    let header = decoder
        .header()
        .cloned()
        .ok_or(StreamError::Unsupported("decoder finished without a header"))?;
    Ok((header, decoder.telemetry()))
}
