//! keys.rs
//! Key-lookup collaborator.
//!
//! The codec never stores keys. A decoder that is not handed a key directly asks a
//! `KeyLocator` exactly once per stream, with the key id from the coding header.

use std::collections::HashMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::constants::KEY_LEN;

/// Resolves key material for a key id (`None` when the header carries none).
pub trait KeyLocator {
    fn locate(&self, key_id: Option<&str>) -> Option<Zeroizing<Vec<u8>>>;
}

impl<F> KeyLocator for F
where
    F: Fn(Option<&str>) -> Option<Zeroizing<Vec<u8>>>,
{
    fn locate(&self, key_id: Option<&str>) -> Option<Zeroizing<Vec<u8>>> {
        self(key_id)
    }
}

#[derive(Debug, Error)]
pub enum KeyLookupError {
    #[error("no key registered for key id {key_id:?}")]
    NotFound { key_id: Option<String> },

    #[error("key for key id {key_id:?} is not valid base64: {source}")]
    InvalidEncoding {
        key_id: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("key for key id {key_id:?} must be {KEY_LEN} octets, got {len}")]
    InvalidLength { key_id: String, len: usize },
}

/// In-memory key table. The empty key id stands for "no key id".
#[derive(Default, Clone)]
pub struct KeyTable {
    keys: HashMap<String, Zeroizing<[u8; KEY_LEN]>>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key_id: impl Into<String>, key: &[u8]) -> Result<(), KeyLookupError> {
        let key_id = key_id.into();
        let Ok(key) = <[u8; KEY_LEN]>::try_from(key) else {
            return Err(KeyLookupError::InvalidLength { key_id, len: key.len() });
        };
        self.keys.insert(key_id, Zeroizing::new(key));
        Ok(())
    }

    /// Insert a key written in standard base64.
    pub fn insert_base64(&mut self, key_id: impl Into<String>, encoded: &str) -> Result<(), KeyLookupError> {
        let key_id = key_id.into();
        let key = match STANDARD.decode(encoded) {
            Ok(key) => Zeroizing::new(key),
            Err(source) => return Err(KeyLookupError::InvalidEncoding { key_id, source }),
        };
        self.insert(key_id, &key)
    }

    pub fn contains(&self, key_id: Option<&str>) -> bool {
        self.keys.contains_key(key_id.unwrap_or(""))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyLocator for KeyTable {
    fn locate(&self, key_id: Option<&str>) -> Option<Zeroizing<Vec<u8>>> {
        self.keys
            .get(key_id.unwrap_or(""))
            .map(|key| Zeroizing::new(key.to_vec()))
    }
}

impl fmt::Debug for KeyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("KeyTable").field("key_ids", &ids).finish()
    }
}
