//! Wire constants for the `aes128gcm` content-coding (RFC 8188).

/// Input keying material length (AES-128).
pub const KEY_LEN: usize = 16;

/// Per-stream salt length carried in the coding header.
pub const SALT_LEN: usize = 16;

/// Pseudorandom key length (HMAC-SHA-256 output).
pub const PRK_LEN: usize = 32;

/// AEAD nonce length.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length (128-bit tags only).
pub const TAG_LEN: usize = 16;

/// Minimum number of non-payload octets in one record: tag + delimiter.
/// Derived for AES-128-GCM with 128-bit tags; re-derive for any other suite.
pub const RECORD_OVERHEAD: usize = TAG_LEN + 1;

/// Smallest record able to carry at least one payload octet.
pub const MIN_RECORD_SIZE: u32 = RECORD_OVERHEAD as u32 + 1;

/// Largest record size accepted on either side of the codec.
pub const MAX_RECORD_SIZE: u32 = i32::MAX as u32;

/// Defaults when the caller does not choose a record size.
pub const DEFAULT_RECORD_SIZE: u32 = 4096;

/// Key identifier length is carried in a single octet.
pub const MAX_KEY_ID_LEN: usize = u8::MAX as usize;

/// Record delimiters (first non-zero octet from the end of record plaintext).
pub mod delimiters {
    pub const RECORD: u8 = 0x01;
    pub const LAST_RECORD: u8 = 0x02;
}

/// HKDF-Expand `info` inputs. The expand step appends the 0x01 counter octet.
pub mod info {
    pub const CONTENT_ENCRYPTION_KEY: &[u8] = b"Content-Encoding: aes128gcm\x00";
    pub const NONCE: &[u8] = b"Content-Encoding: nonce\x00";
}
