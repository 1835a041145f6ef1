use crate::stream::framing::types::Delimiter;

/// Initial buffer reservation; large record sizes grow on demand.
const INITIAL_RESERVE: usize = 64 * 1024;

/// Turns pushed plaintext into record plaintexts (`payload || delimiter`).
///
/// A full buffer is not proof that more data follows. The framer only closes a
/// full record with `0x01` after it has taken one further octet into `lookahead`;
/// that octet becomes the first payload octet of the next record. A full buffer
/// still pending at `finish` is closed with `0x02` instead, so the stream never
/// ends with a spurious empty record.
#[derive(Debug)]
pub struct RecordFramer {
    capacity: usize,
    buf: Vec<u8>,
    lookahead: Option<u8>,
}

impl RecordFramer {
    /// `capacity` is the payload room of one record (`record_size - 17`).
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "record capacity must be positive");
        Self {
            capacity,
            buf: Vec::with_capacity(capacity.min(INITIAL_RESERVE) + 1),
            lookahead: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Plaintext octets held back, lookahead included.
    pub fn pending(&self) -> usize {
        self.buf.len() + usize::from(self.lookahead.is_some())
    }

    pub fn lookahead(&self) -> Option<u8> {
        self.lookahead
    }

    /// Copy plaintext into the current record. Returns the octets consumed.
    ///
    /// Consumes nothing while a proven-full record waits in `take_full`.
    pub fn absorb(&mut self, data: &[u8]) -> usize {
        if self.lookahead.is_some() {
            return 0;
        }

        let room = self.capacity - self.buf.len();
        let n = room.min(data.len());
        self.buf.extend_from_slice(&data[..n]);

        if self.buf.len() == self.capacity && n < data.len() {
            self.lookahead = Some(data[n]);
            return n + 1;
        }
        n
    }

    /// Next full record, once the lookahead octet proves the stream continues.
    pub fn take_full(&mut self) -> Option<Vec<u8>> {
        let next = self.lookahead.take()?;

        let mut record = std::mem::replace(
            &mut self.buf,
            Vec::with_capacity(self.capacity.min(INITIAL_RESERVE) + 1),
        );
        record.push(Delimiter::Record.into());
        self.buf.push(next);
        Some(record)
    }

    /// Close the stream: whatever is buffered becomes the last record.
    ///
    /// Callers drain `take_full` first; a pending lookahead is flushed as its own record.
    pub fn finish(&mut self) -> Vec<Vec<u8>> {
        let mut records = Vec::with_capacity(2);
        if let Some(full) = self.take_full() {
            records.push(full);
        }

        let mut last = std::mem::take(&mut self.buf);
        last.push(Delimiter::LastRecord.into());
        records.push(last);
        records
    }
}
