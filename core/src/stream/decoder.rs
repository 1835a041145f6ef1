//! Decode stream: RFC 8188 `aes128gcm` in from the source, plaintext out through `Read`.
//!
//! ```text
//! Unstarted --first read--> HeaderRead --record--> Streaming --0x02 record + EOF--> Finished
//!      any error from any phase -----------------------------------------------> Failed
//! ```
//!
//! A record's payload is released only after its tag verified and its delimiter
//! checked out. The final record's payload is held back until end of input is confirmed.

use std::io::{self, Read};
use std::time::Instant;

use zeroize::Zeroizing;

use crate::crypto::{CryptoError, KeySchedule, RecordCipher};
use crate::headers::{read_header, CodingHeader};
use crate::keys::KeyLookupError;
use crate::stream::core::{validate_key, DecodeKey, DecodeParams};
use crate::stream::framing::{locate_delimiter, FrameError};
use crate::stream::io::{at_eof, read_up_to};
use crate::telemetry::{TelemetryCounters, TelemetrySnapshot};
use crate::types::StreamError;

/// Observable phase of a decode stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Unstarted,
    HeaderRead,
    Streaming,
    Finished,
    Failed,
}

/// Streaming `aes128gcm` decoder.
///
/// At most one record of ciphertext and its plaintext are held at a time.
pub struct Aes128GcmDecoder<R: Read> {
    inner: R,
    key: Option<DecodeKey>,
    params: DecodeParams,
    header: Option<CodingHeader>,
    cipher: Option<RecordCipher>,
    /// Records opened so far; also the next record's sequence number.
    sequence: u64,
    state: DecoderState,
    out: Zeroizing<Vec<u8>>,
    out_pos: usize,
    counters: TelemetryCounters,
    started: Option<Instant>,
}

impl<R: Read> Aes128GcmDecoder<R> {
    /// Decoder with a fixed key and default parameters.
    pub fn new(inner: R, key: &[u8]) -> Result<Self, StreamError> {
        Self::with_params(inner, DecodeKey::key(key), DecodeParams::default())
    }

    pub fn with_params(inner: R, key: DecodeKey, params: DecodeParams) -> Result<Self, StreamError> {
        if let DecodeKey::Key(k) = &key {
            validate_key(k)?;
        }

        Ok(Self {
            inner,
            key: Some(key),
            params,
            header: None,
            cipher: None,
            sequence: 0,
            state: DecoderState::Unstarted,
            out: Zeroizing::new(Vec::new()),
            out_pos: 0,
            counters: TelemetryCounters::default(),
            started: None,
        })
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Parsed coding header, once the first read got past it.
    pub fn header(&self) -> Option<&CodingHeader> {
        self.header.as_ref()
    }

    pub fn records_read(&self) -> u64 {
        self.sequence
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        let elapsed = self.started.map(|t| t.elapsed()).unwrap_or_default();
        TelemetrySnapshot::from(&self.counters, elapsed)
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Parse the header without consuming any plaintext.
    pub fn read_header(&mut self) -> Result<&CodingHeader, StreamError> {
        if self.state == DecoderState::Unstarted {
            self.guarded(Self::start)?;
        }
        match (&self.header, self.state) {
            (_, DecoderState::Failed) => Err(StreamError::Poisoned),
            (Some(header), _) => Ok(header),
            (None, _) => Err(StreamError::Unsupported("decoder has no header")),
        }
    }

    fn guarded(&mut self, op: impl FnOnce(&mut Self) -> Result<(), StreamError>) -> Result<(), StreamError> {
        if self.state == DecoderState::Failed {
            return Err(StreamError::Poisoned);
        }

        let result = op(self);
        if let Err(e) = &result {
            tracing::warn!(error = %e, sequence = self.sequence, "aes128gcm decode failed");
            self.state = DecoderState::Failed;
            self.out.clear();
            self.out_pos = 0;
        }
        result
    }

    /// Unstarted -> HeaderRead: parse the header, resolve the key, derive the schedule.
    fn start(&mut self) -> Result<(), StreamError> {
        self.started = Some(Instant::now());

        let header = read_header(&mut self.inner)?;
        self.counters.add_header(header.encoded_len());

        tracing::debug!(
            record_size = header.record_size,
            key_id = %header.key_id,
            "aes128gcm header parsed"
        );

        let key = match self.key.take() {
            Some(DecodeKey::Key(key)) => key,
            Some(DecodeKey::Locator(locator)) => {
                let key = locator.locate(header.key_id()).ok_or_else(|| KeyLookupError::NotFound {
                    key_id: header.key_id().map(str::to_owned),
                })?;
                if validate_key(&key).is_err() {
                    return Err(KeyLookupError::InvalidLength { key_id: header.key_id.clone(), len: key.len() }.into());
                }
                key
            }
            None => return Err(StreamError::Unsupported("decoder key already consumed")),
        };

        let schedule = KeySchedule::derive(&key, &header.salt)?;
        self.cipher = Some(RecordCipher::new(schedule)?);
        self.header = Some(header);
        self.state = DecoderState::HeaderRead;
        Ok(())
    }

    /// Read, open and unframe the next record into `out`.
    fn next_record(&mut self) -> Result<(), StreamError> {
        if self.state == DecoderState::Unstarted {
            self.start()?;
        }
        let (Some(header), Some(cipher)) = (&self.header, &self.cipher) else {
            return Err(StreamError::Unsupported("decoder has no header"));
        };

        let sequence = self.sequence;
        let record = read_up_to(&mut self.inner, header.record_size as usize)?;
        if record.is_empty() {
            return Err(FrameError::MissingRecord { sequence }.into());
        }

        let mut plaintext = Zeroizing::new(cipher.open(sequence, &record)?);
        let boundary = locate_delimiter(&plaintext, header.record_capacity(), self.params.padding, sequence)?;
        self.sequence = sequence.checked_add(1).ok_or(CryptoError::SequenceExhausted)?;

        if boundary.is_final() && !at_eof(&mut self.inner)? {
            return Err(FrameError::TrailingData { sequence }.into());
        }

        plaintext.truncate(boundary.payload_len);
        self.counters.add_record(boundary.payload_len, record.len());
        tracing::trace!(sequence, payload_len = boundary.payload_len, last = boundary.is_final(), "aes128gcm record opened");

        self.out = plaintext;
        self.out_pos = 0;
        self.state = if boundary.is_final() {
            tracing::debug!(
                records = self.counters.records,
                plaintext = self.counters.bytes_plaintext,
                wire = self.counters.bytes_wire,
                "aes128gcm stream decoded"
            );
            DecoderState::Finished
        } else {
            DecoderState::Streaming
        };
        Ok(())
    }
}

impl<R: Read> Read for Aes128GcmDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if self.out_pos < self.out.len() {
                let n = buf.len().min(self.out.len() - self.out_pos);
                buf[..n].copy_from_slice(&self.out[self.out_pos..self.out_pos + n]);
                self.out_pos += n;
                return Ok(n);
            }

            match self.state {
                DecoderState::Finished => return Ok(0),
                DecoderState::Failed => return Err(StreamError::Poisoned.into_io()),
                _ => self.guarded(Self::next_record).map_err(StreamError::into_io)?,
            }
        }
    }
}

impl<R: Read> std::fmt::Debug for Aes128GcmDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aes128GcmDecoder")
            .field("state", &self.state)
            .field("header", &self.header)
            .field("records", &self.sequence)
            .finish_non_exhaustive()
    }
}
