//! Error types for the registry.

use bookrights_core::BookId;
use bookrights_fhe::FheError;
use bookrights_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// Every error is terminal for the call that produced it and leaves no
/// partial state behind.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed arguments: empty title, oversized metadata, a decryption
    /// request for another contract or a stale handle.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An encrypted input failed proof or handle verification.
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    /// No book with this id.
    #[error("book not found: {0}")]
    NotFound(BookId),

    /// The caller may not perform this operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Cryptographic fault while opening or re-encrypting a value.
    #[error("crypto error: {0}")]
    Crypto(#[from] FheError),
}

/// Coarse classification of a [`RegistryError`], for callers that map
/// failures onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    InvalidCiphertext,
    NotFound,
    Unauthorized,
    Internal,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::InvalidCiphertext(_) => ErrorKind::InvalidCiphertext,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Storage(_) | Self::Crypto(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
