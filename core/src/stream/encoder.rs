//! Encode stream: plaintext in through `Write`, RFC 8188 `aes128gcm` out to the sink.
//!
//! ```text
//! Unstarted --first write/finish--> HeaderWritten --record--> Streaming --0x02 record--> Finished
//!      any error from any phase ----------------------------------------------------> Failed
//! ```
//!
//! At most one record of plaintext (plus one lookahead octet) is buffered. Records are
//! sealed and written as soon as the framer proves that more data follows them.

use std::io::{self, Write};
use std::time::Instant;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::constants::SALT_LEN;
use crate::crypto::{CryptoError, KeySchedule, RecordCipher};
use crate::headers::{encode_header, CodingHeader};
use crate::stream::core::{validate_key, EncodeParams};
use crate::stream::framing::RecordFramer;
use crate::telemetry::{TelemetryCounters, TelemetrySnapshot};
use crate::types::StreamError;

/// Observable phase of an encode stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    Unstarted,
    HeaderWritten,
    Streaming,
    Finished,
    Failed,
}

enum Phase {
    Unstarted,
    Active(ActiveEncode),
    Finished,
    Failed,
}

struct ActiveEncode {
    cipher: RecordCipher,
    framer: RecordFramer,
    /// Records already written; also the next record's sequence number.
    sequence: u64,
}

/// Streaming `aes128gcm` encoder.
///
/// One instance encodes exactly one stream and must be driven by one caller.
/// Call `finish` to emit the final record; dropping the encoder without it leaves
/// a truncated stream that decoders reject.
pub struct Aes128GcmEncoder<W: Write> {
    inner: W,
    key: Zeroizing<Vec<u8>>,
    params: EncodeParams,
    header: Option<CodingHeader>,
    phase: Phase,
    counters: TelemetryCounters,
    started: Option<Instant>,
}

impl<W: Write> Aes128GcmEncoder<W> {
    /// Validate the configuration. Nothing is written until the first `write` or `finish`.
    pub fn new(inner: W, key: &[u8], params: EncodeParams) -> Result<Self, StreamError> {
        validate_key(key)?;
        params.validate()?;

        Ok(Self {
            inner,
            key: Zeroizing::new(key.to_vec()),
            params,
            header: None,
            phase: Phase::Unstarted,
            counters: TelemetryCounters::default(),
            started: None,
        })
    }

    pub fn state(&self) -> EncoderState {
        match &self.phase {
            Phase::Unstarted => EncoderState::Unstarted,
            Phase::Active(active) if active.sequence == 0 => EncoderState::HeaderWritten,
            Phase::Active(_) => EncoderState::Streaming,
            Phase::Finished => EncoderState::Finished,
            Phase::Failed => EncoderState::Failed,
        }
    }

    /// Header as written to the sink, once the stream has started.
    pub fn header(&self) -> Option<&CodingHeader> {
        self.header.as_ref()
    }

    pub fn records_written(&self) -> u64 {
        match &self.phase {
            Phase::Active(active) => active.sequence,
            _ => self.counters.records,
        }
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        let elapsed = self.started.map(|t| t.elapsed()).unwrap_or_default();
        TelemetrySnapshot::from(&self.counters, elapsed)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Return the sink. Call `finish` first for a complete stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Encrypt `data` as the next part of the plaintext.
    pub fn push(&mut self, data: &[u8]) -> Result<(), StreamError> {
        self.guarded(|enc| enc.push_inner(data))
    }

    /// Emit the final record and flush the sink. Writes after this fail.
    pub fn finish(&mut self) -> Result<(), StreamError> {
        self.guarded(|enc| enc.finish_inner())
    }

    fn guarded(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<(), StreamError>,
    ) -> Result<(), StreamError> {
        match self.phase {
            Phase::Failed => return Err(StreamError::Poisoned),
            Phase::Finished => return Err(StreamError::Unsupported("write after the final record")),
            _ => {}
        }

        let result = op(self);
        if let Err(e) = &result {
            tracing::warn!(error = %e, records = self.counters.records, "aes128gcm encode failed");
            self.phase = Phase::Failed;
        }
        result
    }

    fn push_inner(&mut self, data: &[u8]) -> Result<(), StreamError> {
        if data.is_empty() && !matches!(self.phase, Phase::Unstarted) {
            return Ok(());
        }
        self.start()?;

        let mut off = 0;
        while off < data.len() {
            let Phase::Active(active) = &mut self.phase else {
                return Err(StreamError::Unsupported("encoder is not streaming"));
            };
            off += active.framer.absorb(&data[off..]);
            if let Some(record) = active.framer.take_full() {
                self.emit(&record, false)?;
            }
        }
        Ok(())
    }

    fn finish_inner(&mut self) -> Result<(), StreamError> {
        self.start()?;

        let Phase::Active(active) = &mut self.phase else {
            return Err(StreamError::Unsupported("encoder is not streaming"));
        };
        let records = active.framer.finish();
        let last = records.len().saturating_sub(1);
        for (i, record) in records.iter().enumerate() {
            self.emit(record, i == last)?;
        }

        self.inner.flush()?;
        self.phase = Phase::Finished;

        tracing::debug!(
            records = self.counters.records,
            plaintext = self.counters.bytes_plaintext,
            wire = self.counters.bytes_wire,
            "aes128gcm stream encoded"
        );
        Ok(())
    }

    /// Unstarted -> HeaderWritten: settle the salt, derive keys, write the header.
    fn start(&mut self) -> Result<(), StreamError> {
        if !matches!(self.phase, Phase::Unstarted) {
            return Ok(());
        }
        self.started = Some(Instant::now());

        let salt = coalesce_salt(self.params.salt.as_deref());
        let header = CodingHeader::new(
            salt,
            self.params.record_size,
            self.params.key_id.clone().unwrap_or_default(),
        );

        let schedule = KeySchedule::derive(&self.key, &header.salt)?;
        let cipher = RecordCipher::new(schedule)?;
        let framer = RecordFramer::new(header.record_capacity());

        let bytes = encode_header(&header)?;
        self.inner.write_all(&bytes)?;
        self.counters.add_header(bytes.len());

        tracing::debug!(
            record_size = header.record_size,
            key_id = %header.key_id,
            "aes128gcm header written"
        );

        self.header = Some(header);
        self.phase = Phase::Active(ActiveEncode { cipher, framer, sequence: 0 });
        Ok(())
    }

    fn emit(&mut self, record_plaintext: &[u8], last: bool) -> Result<(), StreamError> {
        let Phase::Active(active) = &mut self.phase else {
            return Err(StreamError::Unsupported("encoder is not streaming"));
        };

        let sequence = active.sequence;
        let record = active.cipher.seal(sequence, record_plaintext)?;
        active.sequence = sequence.checked_add(1).ok_or(CryptoError::SequenceExhausted)?;

        self.inner.write_all(&record)?;

        let payload_len = record_plaintext.len() - 1;
        self.counters.add_record(payload_len, record.len());
        tracing::trace!(sequence, payload_len, last, "aes128gcm record sealed");
        Ok(())
    }
}

impl<W: Write> Write for Aes128GcmEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push(buf).map_err(StreamError::into_io)?;
        Ok(buf.len())
    }

    /// Flushes the sink only. Buffered plaintext stays until a record fills or `finish`.
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> std::fmt::Debug for Aes128GcmEncoder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aes128GcmEncoder")
            .field("state", &self.state())
            .field("header", &self.header)
            .field("records", &self.counters.records)
            .finish_non_exhaustive()
    }
}

/// Caller salt when supplied (length already validated), otherwise fresh from the OS RNG.
fn coalesce_salt(salt: Option<&[u8]>) -> [u8; SALT_LEN] {
    let mut out = [0u8; SALT_LEN];
    match salt {
        Some(s) => out.copy_from_slice(s),
        None => OsRng.fill_bytes(&mut out),
    }
    out
}
