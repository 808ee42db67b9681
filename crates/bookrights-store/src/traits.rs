//! Store trait: the abstract interface for registry persistence.
//!
//! This trait allows the registry to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use bookrights_core::{BookId, BookRecord, EventRecord, Identity, NewBook};

use crate::error::Result;

/// Result of inserting a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    /// The stored record, carrying its allocated id.
    pub record: BookRecord,
    /// The `BookRegistered` event appended alongside it.
    pub event: EventRecord,
}

/// Result of inserting an access grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantResult {
    /// The grant is new; the `AccessGranted` event was appended.
    Granted(EventRecord),
    /// The accessor already held a grant on this book (idempotent - not an error).
    AlreadyGranted,
}

/// The Store trait: async interface for registry persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Atomic mutations**: `insert_book` and `insert_grant` each apply
///   their record and event in one transaction.
/// - **Dense ids**: the id handed out by `insert_book` always equals the
///   number of books stored before the call.
/// - **No ownership checks**: the store persists what it is given. Callers
///   decide who may grant.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Book Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a new book, allocating the next id.
    async fn insert_book(&self, book: NewBook) -> Result<Registered>;

    /// Get a book by id.
    async fn get_book(&self, id: BookId) -> Result<Option<BookRecord>>;

    /// Check whether a book exists.
    async fn has_book(&self, id: BookId) -> Result<bool>;

    /// Number of registered books (also the next id to be allocated).
    async fn book_count(&self) -> Result<u64>;

    /// List books with `id >= start`, ordered by id, at most `limit` of them.
    async fn list_books(&self, start: BookId, limit: usize) -> Result<Vec<BookRecord>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Grant Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record that `accessor` may decrypt the sealed fields of `book_id`.
    ///
    /// Fails with `BookNotFound` if the book does not exist.
    async fn insert_grant(
        &self,
        book_id: BookId,
        accessor: &Identity,
        granted_at: i64,
    ) -> Result<GrantResult>;

    /// Check whether an explicit grant exists.
    async fn has_grant(&self, book_id: BookId, accessor: &Identity) -> Result<bool>;

    /// List the explicit accessors of a book, in grant order.
    async fn list_grants(&self, book_id: BookId) -> Result<Vec<Identity>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Event Log
    // ─────────────────────────────────────────────────────────────────────────

    /// Get events with `seq > after_seq`, ordered by seq, at most `limit`.
    async fn events_since(&self, after_seq: u64, limit: usize) -> Result<Vec<EventRecord>>;
}
