//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use bookrights_core::{BookId, BookRecord, EventRecord, Identity, NewBook, RegistryEvent};

use crate::error::{Result, StoreError};
use crate::traits::{GrantResult, Registered, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; each
/// mutation holds the write lock for its whole duration.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Books, indexed by id (ids are dense).
    books: Vec<BookRecord>,

    /// Explicit accessors per book, in grant order.
    grants: HashMap<BookId, Vec<Identity>>,

    /// Grant membership index.
    grant_index: HashSet<(BookId, Identity)>,

    /// Event log; `events[i].seq == i + 1`.
    events: Vec<EventRecord>,
}

impl MemoryStoreInner {
    fn book(&self, id: BookId) -> Option<&BookRecord> {
        usize::try_from(id.0).ok().and_then(|idx| self.books.get(idx))
    }

    fn append_event(&mut self, event: RegistryEvent, recorded_at: i64) -> EventRecord {
        let record = EventRecord {
            seq: self.events.len() as u64 + 1,
            recorded_at,
            event,
        };
        self.events.push(record.clone());
        record
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_book(&self, book: NewBook) -> Result<Registered> {
        let mut inner = self.write()?;

        let id = BookId(inner.books.len() as u64);
        let record = book.into_record(id);
        let event = inner.append_event(
            RegistryEvent::BookRegistered {
                book_id: id,
                title: record.title.clone(),
                author: record.author.clone(),
                publisher: record.publisher.clone(),
                owner: record.owner,
            },
            record.timestamp,
        );
        inner.books.push(record.clone());

        Ok(Registered { record, event })
    }

    async fn get_book(&self, id: BookId) -> Result<Option<BookRecord>> {
        Ok(self.read()?.book(id).cloned())
    }

    async fn has_book(&self, id: BookId) -> Result<bool> {
        Ok(self.read()?.book(id).is_some())
    }

    async fn book_count(&self) -> Result<u64> {
        Ok(self.read()?.books.len() as u64)
    }

    async fn list_books(&self, start: BookId, limit: usize) -> Result<Vec<BookRecord>> {
        let inner = self.read()?;
        let start = usize::try_from(start.0).unwrap_or(usize::MAX);

        Ok(inner
            .books
            .iter()
            .skip(start)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_grant(
        &self,
        book_id: BookId,
        accessor: &Identity,
        granted_at: i64,
    ) -> Result<GrantResult> {
        let mut inner = self.write()?;

        if inner.book(book_id).is_none() {
            return Err(StoreError::BookNotFound(book_id));
        }

        if !inner.grant_index.insert((book_id, *accessor)) {
            return Ok(GrantResult::AlreadyGranted);
        }

        inner.grants.entry(book_id).or_default().push(*accessor);
        let event = inner.append_event(
            RegistryEvent::AccessGranted {
                book_id,
                accessor: *accessor,
            },
            granted_at,
        );

        Ok(GrantResult::Granted(event))
    }

    async fn has_grant(&self, book_id: BookId, accessor: &Identity) -> Result<bool> {
        Ok(self.read()?.grant_index.contains(&(book_id, *accessor)))
    }

    async fn list_grants(&self, book_id: BookId) -> Result<Vec<Identity>> {
        Ok(self
            .read()?
            .grants
            .get(&book_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn events_since(&self, after_seq: u64, limit: usize) -> Result<Vec<EventRecord>> {
        let inner = self.read()?;
        let skip = usize::try_from(after_seq).unwrap_or(usize::MAX);

        Ok(inner.events.iter().skip(skip).take(limit).cloned().collect())
    }
}
