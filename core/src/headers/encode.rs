//! headers/encode.rs
//!
//! Header encoding. Validation runs first so a bad header never reaches the sink.

use byteorder::{BigEndian, WriteBytesExt};

use crate::headers::types::{CodingHeader, HeaderError};

/// Serialize a `CodingHeader` into `21 + len(key_id)` octets.
///
/// # Errors
/// - `HeaderError::KeyIdTooLong` when the UTF-8 key id exceeds 255 octets.
/// - `HeaderError::RecordSizeTooSmall` / `RecordSizeUnsupported` for out-of-range record sizes.
pub fn encode_header(h: &CodingHeader) -> Result<Vec<u8>, HeaderError> {
    h.validate()?;

    let key_id = h.key_id.as_bytes();
    let mut out = Vec::with_capacity(h.encoded_len());

    out.extend_from_slice(&h.salt);                // 0..16  salt
    out.write_u32::<BigEndian>(h.record_size)?;    // 16..20 record size
    out.push(key_id.len() as u8);                  // 20     key id length
    out.extend_from_slice(key_id);                 // 21..   key id

    debug_assert_eq!(out.len(), h.encoded_len(), "encoding wrote incorrect length");

    Ok(out)
}
