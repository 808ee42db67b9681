//! Opaque encrypted values.
//!
//! The registry stores confidential fields as [`SealedValue`]s and hands out
//! their [`CiphertextHandle`]s. Neither type offers a plaintext accessor:
//! opening a sealed value is the decryption service's job, and it only does
//! so after the access controller approves the requester.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::Blake3Hash;

/// Derive-key context for ciphertext handles.
const HANDLE_CONTEXT: &str = "bookrights-v0 ciphertext handle";

/// A 32-byte reference to an encrypted value.
///
/// Handles can be stored, compared, and published. They reveal nothing
/// about the plaintext.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CiphertextHandle(pub [u8; 32]);

impl CiphertextHandle {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// The ciphertext body behind a handle.
///
/// The bytes are produced and interpreted by the encryption collaborator;
/// this crate only hashes them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedValue(Vec<u8>);

impl SealedValue {
    /// Wrap ciphertext bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The ciphertext bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Derive the handle naming this ciphertext.
    pub fn handle(&self) -> CiphertextHandle {
        CiphertextHandle(Blake3Hash::derive(HANDLE_CONTEXT, &self.0).0)
    }

    /// Length of the ciphertext in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ciphertext is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SealedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SealedValue({:?}, {} bytes)", self.handle(), self.0.len())
    }
}

/// Evidence that a batch of handles was built for one (contract, submitter)
/// pair. Opaque to the core; checked by an input verifier.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(Vec<u8>);

impl InputProof {
    /// Wrap proof bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The proof bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for InputProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputProof({} bytes)", self.0.len())
    }
}

/// One encrypted field as submitted by a producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedInput {
    /// The handle the producer claims for `ciphertext`.
    pub handle: CiphertextHandle,

    /// The ciphertext itself.
    pub ciphertext: SealedValue,

    /// Proof binding `handle` to the target contract and submitter.
    pub proof: InputProof,
}

impl EncryptedInput {
    /// Whether the claimed handle is the one derived from the ciphertext.
    pub fn handle_matches(&self) -> bool {
        self.ciphertext.handle() == self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_deterministic() {
        let a = SealedValue::from_bytes(vec![1, 2, 3]);
        let b = SealedValue::from_bytes(vec![1, 2, 3]);
        assert_eq!(a.handle(), b.handle());
    }

    #[test]
    fn test_handle_differs_per_ciphertext() {
        let a = SealedValue::from_bytes(vec![1, 2, 3]);
        let b = SealedValue::from_bytes(vec![1, 2, 4]);
        assert_ne!(a.handle(), b.handle());
    }

    #[test]
    fn test_handle_matches() {
        let ciphertext = SealedValue::from_bytes(vec![9; 40]);
        let mut input = EncryptedInput {
            handle: ciphertext.handle(),
            ciphertext,
            proof: InputProof::from_bytes(vec![]),
        };
        assert!(input.handle_matches());

        input.handle = CiphertextHandle::from_bytes([0; 32]);
        assert!(!input.handle_matches());
    }
}
