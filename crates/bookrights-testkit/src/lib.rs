//! # Book Rights Testkit
//!
//! Testing utilities for the book rights registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: parties with deterministic keys, and a registry wired to
//!   a coprocessor and decryption service
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use bookrights_testkit::{multi_party_fixtures, RegistryFixture};
//! use bookrights_core::{DistributionWindow, FieldKind, PricingTier};
//!
//! async fn example() {
//!     let fixture = RegistryFixture::new();
//!     let parties = multi_party_fixtures(2);
//!
//!     let id = fixture
//!         .register(&parties[0], "Title", PricingTier::Premium, DistributionWindow::Exclusive)
//!         .await
//!         .unwrap();
//!     let tier = fixture.decrypt(&parties[0], id, FieldKind::PricingTier).await.unwrap();
//!     assert_eq!(tier, 2);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use bookrights_testkit::BookParams;
//!
//! proptest! {
//!     #[test]
//!     fn titles_are_never_empty(params: BookParams) {
//!         prop_assert!(!params.title.is_empty());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{multi_party_fixtures, RegistryFixture, TestFixture, COPROCESSOR_SEED};
pub use generators::BookParams;
