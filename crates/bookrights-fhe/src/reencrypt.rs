//! Re-encryption of decrypted scalars to a requester's reply key.
//!
//! The decryption service never returns a plaintext directly. It encrypts
//! the value to the requester's X25519 key with an ephemeral key agreement,
//! binding the wrap key to a caller-chosen context (the ciphertext handle).

use serde::{Deserialize, Serialize};

use bookrights_core::{from_cbor, to_cbor};

use crate::crypto::{EncryptionNonce, EphemeralKeyPair, X25519PublicKey, X25519StaticSecret};
use crate::error::{FheError, Result};

/// A scalar encrypted to one reply key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReencryptedValue {
    /// Ephemeral X25519 public key (sender's side of ECDH).
    pub ephemeral_public: X25519PublicKey,

    /// Nonce used for encryption.
    pub nonce: EncryptionNonce,

    /// The value, encrypted with the derived wrap key.
    pub ciphertext: Vec<u8>,
}

impl ReencryptedValue {
    /// Encrypt `value` for the holder of `recipient`.
    pub fn seal(value: u8, recipient: &X25519PublicKey, context: &[u8]) -> Result<Self> {
        let ephemeral = EphemeralKeyPair::generate();
        let ephemeral_public = ephemeral.public_key();

        let wrap_key = ephemeral
            .diffie_hellman(recipient)
            .derive_encryption_key(context);

        let nonce = EncryptionNonce::generate();
        let ciphertext = wrap_key.encrypt(&[value], &nonce)?;

        Ok(Self {
            ephemeral_public,
            nonce,
            ciphertext,
        })
    }

    /// Decrypt with the recipient's secret key.
    pub fn open(&self, recipient: &X25519StaticSecret, context: &[u8]) -> Result<u8> {
        let wrap_key = recipient
            .diffie_hellman(&self.ephemeral_public)
            .derive_encryption_key(context);

        match wrap_key.decrypt(&self.ciphertext, &self.nonce)?.as_slice() {
            [value] => Ok(*value),
            other => Err(FheError::DecryptionError(format!(
                "invalid value length: expected 1, got {}",
                other.len()
            ))),
        }
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(to_cbor(self)?)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        from_cbor(bytes).map_err(|e| FheError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reencrypt_roundtrip() {
        let reader = X25519StaticSecret::generate();
        let sealed = ReencryptedValue::seal(2, &reader.public_key(), b"handle").unwrap();

        assert_eq!(sealed.open(&reader, b"handle").unwrap(), 2);
    }

    #[test]
    fn test_wrong_recipient_fails() {
        let reader = X25519StaticSecret::generate();
        let eavesdropper = X25519StaticSecret::generate();
        let sealed = ReencryptedValue::seal(1, &reader.public_key(), b"handle").unwrap();

        assert!(sealed.open(&eavesdropper, b"handle").is_err());
    }

    #[test]
    fn test_wrong_context_fails() {
        let reader = X25519StaticSecret::generate();
        let sealed = ReencryptedValue::seal(1, &reader.public_key(), b"handle-a").unwrap();

        assert!(sealed.open(&reader, b"handle-b").is_err());
    }

    #[test]
    fn test_bytes_survive_transport() {
        let reader = X25519StaticSecret::generate();
        let sealed = ReencryptedValue::seal(0, &reader.public_key(), b"ctx").unwrap();

        let recovered = ReencryptedValue::from_bytes(&sealed.to_bytes().unwrap()).unwrap();
        assert_eq!(recovered.open(&reader, b"ctx").unwrap(), 0);
    }
}
