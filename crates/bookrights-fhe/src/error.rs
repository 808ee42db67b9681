//! Error types for the confidential-value collaborators.

use thiserror::Error;

/// Errors raised while sealing, proving, verifying, or opening values.
#[derive(Debug, Error)]
pub enum FheError {
    /// Encryption error.
    #[error("encryption error: {0}")]
    EncryptionError(String),

    /// Decryption error.
    #[error("decryption error: {0}")]
    DecryptionError(String),

    /// The claimed handle is not the one derived from the ciphertext.
    #[error("handle does not match ciphertext")]
    HandleMismatch,

    /// The proof could not be decoded or its signature does not verify.
    #[error("invalid input proof: {0}")]
    InvalidProof(String),

    /// The proof was signed by an identity this verifier does not trust.
    #[error("proof attested by untrusted identity")]
    UntrustedAttester,

    /// The proof is valid but was issued for another contract, submitter,
    /// or set of handles.
    #[error("proof does not cover this input: {0}")]
    ProofMismatch(String),

    /// A key could not be parsed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Core error.
    #[error("core error: {0}")]
    CoreError(#[from] bookrights_core::CoreError),
}

/// Result type for confidential-value operations.
pub type Result<T> = std::result::Result<T, FheError>;
