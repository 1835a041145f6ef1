//! crypto/aead.rs
//! AES-128-GCM record cipher.
//!
//! Design notes:
//! - 16-byte content-encryption key, 12-byte nonce, 128-bit tag appended to the ciphertext.
//! - AAD is always empty; records are bound to their position by the nonce alone.
//! - Tag verification fails closed: no plaintext is returned on mismatch.
//! - Each call is one complete AEAD operation; nothing carries over between records.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Nonce};

use crate::constants::TAG_LEN;
use crate::crypto::kdf::KeySchedule;
use crate::crypto::types::CryptoError;

/// AEAD for one stream, keyed with the stream's content-encryption key.
#[derive(Clone)]
pub struct RecordCipher {
    cipher: Aes128Gcm,
    schedule: KeySchedule,
}

impl RecordCipher {
    pub fn new(schedule: KeySchedule) -> Result<Self, CryptoError> {
        let cek = schedule.content_encryption_key();
        let cipher = Aes128Gcm::new_from_slice(cek)
            .map_err(|_| CryptoError::key_len(cek.len()))?;
        Ok(Self { cipher, schedule })
    }

    /// Seal one record plaintext. Output length is `plaintext.len() + 16`.
    pub fn seal(&self, sequence: u64, record_plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = self.schedule.nonce(sequence);
        self.cipher
            .encrypt(Nonce::from_slice(&nonce), Payload { msg: record_plaintext, aad: &[] })
            .map_err(|_| CryptoError::Failure(format!("AES-GCM seal failed on record {sequence}")))
    }

    /// Open one record (ciphertext followed by tag).
    pub fn open(&self, sequence: u64, record: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if record.len() < TAG_LEN {
            return Err(CryptoError::RecordTooShort { len: record.len() });
        }

        let nonce = self.schedule.nonce(sequence);
        self.cipher
            .decrypt(Nonce::from_slice(&nonce), Payload { msg: record, aad: &[] })
            .map_err(|_| CryptoError::TagMismatch { sequence })
    }
}

impl std::fmt::Debug for RecordCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCipher").finish_non_exhaustive()
    }
}
