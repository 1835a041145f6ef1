//! crypto/kdf.rs
//! HKDF-SHA-256 key schedule for the `aes128gcm` content-coding.
//!
//! Design:
//! - HKDF-Extract(salt, key) -> PRK (32 bytes)
//! - HKDF-Expand(PRK, "Content-Encoding: aes128gcm" || 0x00) -> CEK (16 bytes)
//! - HKDF-Expand(PRK, "Content-Encoding: nonce" || 0x00) -> nonce base (12 bytes)
//!
//! Both outputs are shorter than one SHA-256 block, so each expand is a single
//! HMAC over `info || 0x01`, exactly the construction RFC 8188 spells out.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{info, KEY_LEN, NONCE_LEN, PRK_LEN, SALT_LEN};
use crate::crypto::nonce::derive_record_nonce;
use crate::crypto::types::CryptoError;

/// Secrets derived once per stream from `(key, salt)`.
///
/// Wiped on drop. Never persisted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeySchedule {
    prk: [u8; PRK_LEN],
    cek: [u8; KEY_LEN],
    nonce_base: [u8; NONCE_LEN],
}

impl KeySchedule {
    /// Derive the pseudorandom key, content-encryption key and nonce base.
    ///
    /// Errors:
    /// - `key` not exactly 16 octets -> `CryptoError::InvalidKeyLen`
    /// - `salt` not exactly 16 octets -> `CryptoError::InvalidSaltLen`
    pub fn derive(key: &[u8], salt: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LEN {
            return Err(CryptoError::key_len(key.len()));
        }
        if salt.len() != SALT_LEN {
            return Err(CryptoError::salt_len(salt.len()));
        }

        let (prk_out, hk) = Hkdf::<Sha256>::extract(Some(salt), key);

        let mut prk = [0u8; PRK_LEN];
        prk.copy_from_slice(&prk_out);

        let mut cek = [0u8; KEY_LEN];
        hk.expand(info::CONTENT_ENCRYPTION_KEY, &mut cek)
            .map_err(|_| CryptoError::Failure("HKDF expand failed (content-encryption key)".into()))?;

        let mut nonce_base = [0u8; NONCE_LEN];
        hk.expand(info::NONCE, &mut nonce_base)
            .map_err(|_| CryptoError::Failure("HKDF expand failed (nonce)".into()))?;

        Ok(Self { prk, cek, nonce_base })
    }

    pub fn pseudorandom_key(&self) -> &[u8; PRK_LEN] {
        &self.prk
    }

    pub fn content_encryption_key(&self) -> &[u8; KEY_LEN] {
        &self.cek
    }

    pub fn nonce_base(&self) -> &[u8; NONCE_LEN] {
        &self.nonce_base
    }

    /// Nonce for record `sequence` of this stream.
    #[inline]
    pub fn nonce(&self, sequence: u64) -> [u8; NONCE_LEN] {
        derive_record_nonce(&self.nonce_base, sequence)
    }
}

impl std::fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySchedule").finish_non_exhaustive()
    }
}
