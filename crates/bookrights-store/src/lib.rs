//! # Book Rights Store
//!
//! Storage abstraction for the book rights registry. Provides a trait-based
//! interface for record, grant, and event persistence with SQLite and
//! in-memory implementations.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`Registered`] - Result of inserting a book
//! - [`GrantResult`] - Result of inserting an access grant
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bookrights_store::{SqliteStore, Store};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("bookrights.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let total = store.book_count().await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Store-allocated ids**: `insert_book` assigns the next dense id inside
//!   the same transaction that writes the record.
//! - **Events in-transaction**: every mutation appends its event in the
//!   transaction that applies it. A failed mutation leaves no event.
//! - **Insert-only grants**: inserting an existing grant returns
//!   `AlreadyGranted` and writes nothing. There is no removal.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{GrantResult, Registered, Store};
