//! # Book Rights Registry
//!
//! A registry of book licensing rights. Each book carries public metadata
//! and two confidential terms, its pricing tier and distribution window,
//! stored only as ciphertext. The owner decides who else may decrypt them.
//!
//! ## Overview
//!
//! - **Registry store**: register books, read public metadata, count, check
//!   existence, fetch ciphertext handles
//! - **Access controller**: owner-only, insert-only grants and the
//!   authorization check the decryption service consults
//! - **Decryption**: signed user-decryption requests answered with values
//!   re-encrypted to the reader's key
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bookrights_registry::{Registration, Registry, RegistryConfig};
//! use bookrights_registry::core::{ContractId, Keypair};
//! use bookrights_registry::fhe::Coprocessor;
//! use bookrights_registry::store::SqliteStore;
//!
//! async fn example() {
//!     let publisher = Keypair::generate();
//!     let coprocessor = Coprocessor::generate();
//!     let contract = ContractId::derive(&publisher.identity(), "book-rights-registry");
//!
//!     let store = SqliteStore::open("bookrights.db").unwrap();
//!     let registry = Registry::new(contract, store, coprocessor.verifier(), RegistryConfig::default());
//!
//!     let batch = coprocessor
//!         .input(contract, publisher.identity())
//!         .add8(2) // Premium
//!         .add8(2) // Exclusive
//!         .encrypt()
//!         .unwrap();
//!
//!     let id = registry
//!         .register(
//!             &publisher.identity(),
//!             Registration {
//!                 title: "Digital Publishing in the Blockchain Era".into(),
//!                 author: "Sarah Chen".into(),
//!                 publisher: "TechPress Publishing".into(),
//!                 genre: "Technology".into(),
//!                 pricing_tier: batch.input(0).unwrap(),
//!                 distribution_window: batch.input(1).unwrap(),
//!             },
//!         )
//!         .await
//!         .unwrap();
//!
//!     assert!(registry.is_authorized(id, &publisher.identity()).await.unwrap());
//! }
//! ```

pub mod config;
pub mod decrypt;
pub mod error;
pub mod registry;

// Re-export component crates
pub use bookrights_core as core;
pub use bookrights_fhe as fhe;
pub use bookrights_store as store;

pub use config::RegistryConfig;
pub use decrypt::{DecryptionRequest, DecryptionService};
pub use error::{ErrorKind, RegistryError, Result};
pub use registry::{GrantOutcome, Registration, Registry};

pub use bookrights_core::{
    BookId, BookRecord, CiphertextHandle, ContractId, DistributionWindow, EventRecord, FieldKind,
    Identity, Keypair, PricingTier, PublicInfo, RegistryEvent,
};
