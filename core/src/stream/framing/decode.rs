use crate::stream::framing::types::{Delimiter, FrameError, PaddingPolicy, RecordBoundary};

/// Find the delimiter in a decrypted record plaintext.
///
/// Scans backward over `0x00` padding to the first non-zero octet, which must be a
/// delimiter. A `0x01` delimiter must close a full record: at index `capacity` under
/// `PaddingPolicy::FinalRecordOnly`, or in a record of `capacity + 1` octets under
/// `PaddingPolicy::AnyRecord`.
///
/// `sequence` only feeds error context.
pub fn locate_delimiter(
    record_plaintext: &[u8],
    capacity: usize,
    policy: PaddingPolicy,
    sequence: u64,
) -> Result<RecordBoundary, FrameError> {
    let index = record_plaintext
        .iter()
        .rposition(|&b| b != 0)
        .ok_or(FrameError::DelimiterNotFound { sequence })?;

    let octet = record_plaintext[index];
    let delimiter = Delimiter::try_from(octet)
        .map_err(|_| FrameError::InvalidDelimiter { sequence, octet })?;

    if delimiter == Delimiter::Record {
        let full = match policy {
            PaddingPolicy::FinalRecordOnly => index == capacity,
            PaddingPolicy::AnyRecord => record_plaintext.len() == capacity + 1,
        };
        if !full {
            return Err(FrameError::NonFinalRecordPadded { sequence, index, capacity });
        }
    }

    Ok(RecordBoundary { payload_len: index, delimiter })
}
