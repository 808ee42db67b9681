//! # Book Rights Confidential Values
//!
//! The collaborators that keep a book's pricing tier and distribution
//! window confidential.
//!
//! ## Model
//!
//! 1. A producer asks a [`Coprocessor`] to encrypt 8-bit values for a
//!    (contract, submitter) pair. Each value is sealed under the network key
//!    and named by its ciphertext handle; one signed proof covers the batch.
//! 2. The registry checks each [`bookrights_core::EncryptedInput`] with an
//!    [`InputVerifier`] before storing it.
//! 3. When an authorized reader asks, the decryption service opens the
//!    sealed value and returns it as a [`ReencryptedValue`] that only the
//!    reader's X25519 key can open.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bookrights_core::{ContractId, Keypair};
//! use bookrights_fhe::{Coprocessor, InputVerifier};
//!
//! let coprocessor = Coprocessor::generate();
//! let publisher = Keypair::generate();
//! let contract = ContractId::derive(&publisher.identity(), "book-rights-registry");
//!
//! let batch = coprocessor
//!     .input(contract, publisher.identity())
//!     .add8(2)
//!     .add8(1)
//!     .encrypt()
//!     .unwrap();
//!
//! let tier = batch.input(0).unwrap();
//! coprocessor
//!     .verifier()
//!     .verify(&tier, &contract, &publisher.identity())
//!     .unwrap();
//! ```

pub mod coprocessor;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod proof;
pub mod reencrypt;

pub use coprocessor::{Coprocessor, EncryptedInputBatch, EncryptedInputBuilder};
pub use crypto::{
    EncryptionKey, EncryptionNonce, EphemeralKeyPair, SharedKey, X25519PublicKey,
    X25519StaticSecret,
};
pub use envelope::{EncryptionFormat, SealedEnvelope};
pub use error::{FheError, Result};
pub use proof::{AttestedInputVerifier, InputVerifier, ProofBody, SignedProof};
pub use reencrypt::ReencryptedValue;
