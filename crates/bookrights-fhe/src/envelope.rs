//! Sealed-value envelope.
//!
//! The bytes of a [`SealedValue`] are the CBOR encoding of a
//! [`SealedEnvelope`]: the nonce and AEAD ciphertext of one scalar under the
//! coprocessor's network key.

use serde::{Deserialize, Serialize};

use bookrights_core::{from_cbor, to_cbor, SealedValue};

use crate::crypto::{EncryptionKey, EncryptionNonce};
use crate::error::{FheError, Result};

/// Format identifier for sealed envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum EncryptionFormat {
    /// ChaCha20-Poly1305 with 256-bit key.
    ChaCha20Poly1305 = 1,
}

/// An encrypted scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    /// Encryption algorithm used.
    pub format: EncryptionFormat,

    /// Nonce used for encryption (unique per encryption).
    pub nonce: EncryptionNonce,

    /// The encrypted data (includes authentication tag).
    pub ciphertext: Vec<u8>,
}

impl SealedEnvelope {
    /// Encrypt plaintext with the given key under a fresh nonce.
    pub fn seal(plaintext: &[u8], key: &EncryptionKey) -> Result<Self> {
        let nonce = EncryptionNonce::generate();
        let ciphertext = key.encrypt(plaintext, &nonce)?;

        Ok(Self {
            format: EncryptionFormat::ChaCha20Poly1305,
            nonce,
            ciphertext,
        })
    }

    /// Decrypt with the given key.
    pub fn open(&self, key: &EncryptionKey) -> Result<Vec<u8>> {
        match self.format {
            EncryptionFormat::ChaCha20Poly1305 => key.decrypt(&self.ciphertext, &self.nonce),
        }
    }

    /// Encode into the opaque form stored by the registry.
    pub fn to_sealed(&self) -> Result<SealedValue> {
        Ok(SealedValue::from_bytes(to_cbor(self)?))
    }

    /// Decode from the opaque form stored by the registry.
    pub fn from_sealed(sealed: &SealedValue) -> Result<Self> {
        from_cbor(sealed.as_bytes()).map_err(|e| FheError::SerializationError(e.to_string()))
    }
}
