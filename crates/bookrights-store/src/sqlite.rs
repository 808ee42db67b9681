//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for the registry. It uses rusqlite
//! with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use bookrights_core::{
    from_cbor, to_cbor, BookId, BookRecord, EventRecord, Identity, NewBook, RegistryEvent,
    SealedValue,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{GrantResult, Registered, Store};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening sqlite store");
        let mut conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection from the blocking pool.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

// Book ids are dense from 0, so anything past i64::MAX can never match a row.
fn sql_id(id: BookId) -> i64 {
    i64::try_from(id.0).unwrap_or(i64::MAX)
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn blob_32(bytes: Vec<u8>, idx: usize, column: &str) -> rusqlite::Result<[u8; 32]> {
    bytes
        .try_into()
        .map_err(|_| rusqlite::Error::InvalidColumnType(idx, column.into(), Type::Blob))
}

// Helper to convert a row to BookRecord
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<BookRecord> {
    let id: i64 = row.get("book_id")?;
    let pricing_tier: Vec<u8> = row.get("pricing_tier")?;
    let distribution_window: Vec<u8> = row.get("distribution_window")?;
    let owner: Vec<u8> = row.get("owner")?;

    Ok(BookRecord {
        id: BookId(id as u64),
        title: row.get("title")?,
        author: row.get("author")?,
        publisher: row.get("publisher")?,
        genre: row.get("genre")?,
        pricing_tier: SealedValue::from_bytes(pricing_tier),
        distribution_window: SealedValue::from_bytes(distribution_window),
        owner: Identity::from_bytes(blob_32(owner, 7, "owner")?),
        timestamp: row.get("registered_at")?,
    })
}

const SELECT_BOOK: &str = "SELECT book_id, title, author, publisher, genre, pricing_tier,
        distribution_window, owner, registered_at FROM books";

/// Append an event inside an open transaction.
fn append_event(conn: &Connection, event: RegistryEvent, recorded_at: i64) -> Result<EventRecord> {
    let payload = to_cbor(&event)?;

    conn.execute(
        "INSERT INTO registry_events (book_id, kind, payload, recorded_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![sql_id(event.book_id()), event.name(), payload, recorded_at],
    )?;

    Ok(EventRecord {
        seq: conn.last_insert_rowid() as u64,
        recorded_at,
        event,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_book(&self, book: NewBook) -> Result<Registered> {
        self.run(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let count: i64 = tx.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
            let id = BookId(count as u64);

            tx.execute(
                "INSERT INTO books (
                    book_id, title, author, publisher, genre,
                    pricing_tier, distribution_window, owner, registered_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    count,
                    book.title,
                    book.author,
                    book.publisher,
                    book.genre,
                    book.pricing_tier.as_bytes(),
                    book.distribution_window.as_bytes(),
                    book.owner.as_bytes().as_slice(),
                    book.timestamp,
                ],
            )?;

            let record = book.into_record(id);
            let event = append_event(
                &tx,
                RegistryEvent::BookRegistered {
                    book_id: id,
                    title: record.title.clone(),
                    author: record.author.clone(),
                    publisher: record.publisher.clone(),
                    owner: record.owner,
                },
                record.timestamp,
            )?;

            tx.commit()?;
            Ok(Registered { record, event })
        })
        .await
    }

    async fn get_book(&self, id: BookId) -> Result<Option<BookRecord>> {
        self.run(move |conn| {
            conn.query_row(
                &format!("{SELECT_BOOK} WHERE book_id = ?1"),
                params![sql_id(id)],
                row_to_record,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn has_book(&self, id: BookId) -> Result<bool> {
        self.run(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM books WHERE book_id = ?1)",
                params![sql_id(id)],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn book_count(&self) -> Result<u64> {
        self.run(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn list_books(&self, start: BookId, limit: usize) -> Result<Vec<BookRecord>> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_BOOK} WHERE book_id >= ?1 ORDER BY book_id LIMIT ?2"
            ))?;

            let books = stmt
                .query_map(params![sql_id(start), sql_limit(limit)], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(books)
        })
        .await
    }

    async fn insert_grant(
        &self,
        book_id: BookId,
        accessor: &Identity,
        granted_at: i64,
    ) -> Result<GrantResult> {
        let accessor = *accessor;

        self.run(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM books WHERE book_id = ?1)",
                params![sql_id(book_id)],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(StoreError::BookNotFound(book_id));
            }

            let inserted = tx.execute(
                "INSERT OR IGNORE INTO book_grants (book_id, accessor, granted_at)
                 VALUES (?1, ?2, ?3)",
                params![sql_id(book_id), accessor.as_bytes().as_slice(), granted_at],
            )?;

            if inserted == 0 {
                return Ok(GrantResult::AlreadyGranted);
            }

            let event = append_event(
                &tx,
                RegistryEvent::AccessGranted { book_id, accessor },
                granted_at,
            )?;

            tx.commit()?;
            Ok(GrantResult::Granted(event))
        })
        .await
    }

    async fn has_grant(&self, book_id: BookId, accessor: &Identity) -> Result<bool> {
        let accessor = *accessor;

        self.run(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM book_grants WHERE book_id = ?1 AND accessor = ?2)",
                params![sql_id(book_id), accessor.as_bytes().as_slice()],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn list_grants(&self, book_id: BookId) -> Result<Vec<Identity>> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT accessor FROM book_grants WHERE book_id = ?1 ORDER BY rowid",
            )?;

            let accessors = stmt
                .query_map(params![sql_id(book_id)], |row| {
                    let bytes: Vec<u8> = row.get(0)?;
                    Ok(Identity::from_bytes(blob_32(bytes, 0, "accessor")?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(accessors)
        })
        .await
    }

    async fn events_since(&self, after_seq: u64, limit: usize) -> Result<Vec<EventRecord>> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT seq, payload, recorded_at FROM registry_events
                 WHERE seq > ?1 ORDER BY seq LIMIT ?2",
            )?;

            let rows = stmt
                .query_map(
                    params![i64::try_from(after_seq).unwrap_or(i64::MAX), sql_limit(limit)],
                    |row| {
                        let seq: i64 = row.get(0)?;
                        let payload: Vec<u8> = row.get(1)?;
                        let recorded_at: i64 = row.get(2)?;
                        Ok((seq, payload, recorded_at))
                    },
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            rows.into_iter()
                .map(|(seq, payload, recorded_at)| -> Result<EventRecord> {
                    let event: RegistryEvent = from_cbor(&payload)?;
                    Ok(EventRecord {
                        seq: seq as u64,
                        recorded_at,
                        event,
                    })
                })
                .collect()
        })
        .await
    }
}
