//! Registry events.
//!
//! Every successful mutation produces exactly one event. Events carry
//! public data only; the sealed fields never appear in them.

use serde::{Deserialize, Serialize};

use crate::crypto::Identity;
use crate::types::BookId;

/// A notification emitted by a registry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A book was registered.
    BookRegistered {
        book_id: BookId,
        title: String,
        author: String,
        publisher: String,
        owner: Identity,
    },

    /// An owner granted an accessor decryption rights on a book.
    AccessGranted { book_id: BookId, accessor: Identity },
}

impl RegistryEvent {
    /// The book the event concerns.
    pub fn book_id(&self) -> BookId {
        match self {
            RegistryEvent::BookRegistered { book_id, .. } => *book_id,
            RegistryEvent::AccessGranted { book_id, .. } => *book_id,
        }
    }

    /// Short name, used in logs and as the stored kind column.
    pub fn name(&self) -> &'static str {
        match self {
            RegistryEvent::BookRegistered { .. } => "BookRegistered",
            RegistryEvent::AccessGranted { .. } => "AccessGranted",
        }
    }
}

/// An event as persisted in the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 1.
    pub seq: u64,

    /// When the event was recorded (Unix seconds).
    pub recorded_at: i64,

    pub event: RegistryEvent,
}
