//! # Book Rights Core
//!
//! Pure primitives for the book rights registry: identities, book records,
//! sealed values, input proofs, and registry events.
//!
//! This crate contains no I/O, no storage, no networking. The confidential
//! fields of a book are carried as [`SealedValue`]s, which expose their
//! [`CiphertextHandle`] but never a plaintext.
//!
//! ## Key Types
//!
//! - [`BookId`] - Dense, zero-based identifier assigned at registration
//! - [`Identity`] - An Ed25519 public key naming a caller
//! - [`ContractId`] - Identifier of one registry deployment
//! - [`BookRecord`] - A registered book with its two sealed fields
//! - [`EncryptedInput`] - A handle, its ciphertext, and the proof binding them
//! - [`RegistryEvent`] - Notifications emitted by registry mutations

pub mod book;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod event;
pub mod sealed;
pub mod terms;
pub mod types;
pub mod validation;

pub use book::{BookRecord, FieldKind, NewBook, PublicInfo};
pub use crypto::{Blake3Hash, Identity, Keypair, Signature};
pub use encoding::{from_cbor, to_cbor};
pub use error::{CoreError, ValidationError};
pub use event::{EventRecord, RegistryEvent};
pub use sealed::{CiphertextHandle, EncryptedInput, InputProof, SealedValue};
pub use terms::{DistributionWindow, PricingTier};
pub use types::{BookId, ContractId};
pub use validation::{validate_metadata, BookMetadata};
