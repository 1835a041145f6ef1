//! headers/decode.rs
//!
//! Header decoding from a byte slice or directly from a source.
//! Any short read is a malformed header; the stream is unusable after that.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

use crate::constants::{MAX_RECORD_SIZE, MIN_RECORD_SIZE, SALT_LEN};
use crate::headers::types::{
    CodingHeader, HeaderError, HEADER_FIXED_LEN, KEY_ID_LEN_OFFSET, RECORD_SIZE_OFFSET,
};
use crate::stream::io::read_up_to;

/// Decode a header from the front of `buf`.
///
/// Returns the header and the number of octets consumed.
pub fn decode_header(buf: &[u8]) -> Result<(CodingHeader, usize), HeaderError> {
    if buf.len() < HEADER_FIXED_LEN {
        return Err(truncated_fixed(buf.len()));
    }

    let mut fixed_buf = [0u8; HEADER_FIXED_LEN];
    fixed_buf.copy_from_slice(&buf[..HEADER_FIXED_LEN]);
    let fixed = parse_fixed(fixed_buf)?;
    let key_id_len = fixed.key_id_len;
    let end = HEADER_FIXED_LEN + key_id_len;
    if buf.len() < end {
        return Err(HeaderError::Truncated {
            field: "key id",
            have: buf.len() - HEADER_FIXED_LEN,
            need: key_id_len,
        });
    }

    let key_id = std::str::from_utf8(&buf[HEADER_FIXED_LEN..end])?.to_owned();
    Ok((CodingHeader::new(fixed.salt, fixed.record_size, key_id), end))
}

/// Read exactly one header from `r`, leaving `r` positioned at the first record.
pub fn read_header<R: Read>(r: &mut R) -> Result<CodingHeader, HeaderError> {
    let head = read_up_to(r, HEADER_FIXED_LEN)?;
    if head.len() < HEADER_FIXED_LEN {
        return Err(truncated_fixed(head.len()));
    }

    let mut fixed_buf = [0u8; HEADER_FIXED_LEN];
    fixed_buf.copy_from_slice(&head);
    let fixed = parse_fixed(fixed_buf)?;

    let key_id = read_up_to(r, fixed.key_id_len)?;
    if key_id.len() < fixed.key_id_len {
        return Err(HeaderError::Truncated {
            field: "key id",
            have: key_id.len(),
            need: fixed.key_id_len,
        });
    }

    let key_id = String::from_utf8(key_id.to_vec()).map_err(|e| e.utf8_error())?;
    Ok(CodingHeader::new(fixed.salt, fixed.record_size, key_id))
}

struct FixedFields {
    salt: [u8; SALT_LEN],
    record_size: u32,
    key_id_len: usize,
}

fn parse_fixed(buf: [u8; HEADER_FIXED_LEN]) -> Result<FixedFields, HeaderError> {
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&buf[..SALT_LEN]);

    let record_size = BigEndian::read_u32(&buf[RECORD_SIZE_OFFSET..KEY_ID_LEN_OFFSET]);
    if record_size > MAX_RECORD_SIZE {
        return Err(HeaderError::RecordSizeUnsupported { have: record_size });
    }
    if record_size < MIN_RECORD_SIZE {
        return Err(HeaderError::RecordSizeTooSmall { have: record_size });
    }

    Ok(FixedFields { salt, record_size, key_id_len: buf[KEY_ID_LEN_OFFSET] as usize })
}

fn truncated_fixed(have: usize) -> HeaderError {
    let field = if have < RECORD_SIZE_OFFSET {
        "salt"
    } else if have < KEY_ID_LEN_OFFSET {
        "record size"
    } else {
        "key id length"
    };
    HeaderError::Truncated { field, have, need: HEADER_FIXED_LEN }
}
