//! The Registry: book records and the access controller.
//!
//! The Registry owns the storage backend and the input verifier. It checks
//! every mutation before handing it to the store, which applies it
//! atomically together with its event.

use std::sync::Arc;

use tokio::sync::broadcast;

use bookrights_core::{
    validate_metadata, BookId, BookMetadata, BookRecord, CiphertextHandle, ContractId,
    EncryptedInput, EventRecord, FieldKind, Identity, NewBook, PublicInfo, SealedValue,
};
use bookrights_fhe::{AttestedInputVerifier, InputVerifier};
use bookrights_store::{GrantResult, Store, StoreError};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};

/// A registration request.
///
/// Both confidential fields arrive already encrypted, each with the proof
/// produced alongside it.
#[derive(Debug, Clone)]
pub struct Registration {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub genre: String,
    pub pricing_tier: EncryptedInput,
    pub distribution_window: EncryptedInput,
}

/// Outcome of a successful `grant_access`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    /// The accessor was added.
    Granted,
    /// The accessor already held a grant; nothing was written.
    AlreadyGranted,
}

/// The book rights registry.
///
/// Provides:
/// - Registration of books with sealed pricing and distribution terms
/// - Public reads of metadata and ciphertext handles
/// - Owner-controlled, insert-only access grants
/// - The replayable event log and a live event feed
pub struct Registry<S: Store, V: InputVerifier = AttestedInputVerifier> {
    /// The deployment this registry answers for.
    contract: ContractId,
    /// The storage backend.
    store: Arc<S>,
    /// Checks encrypted inputs at registration.
    verifier: V,
    /// Configuration.
    config: RegistryConfig,
    /// Live event feed, fed after each commit.
    events: broadcast::Sender<EventRecord>,
}

impl<S: Store, V: InputVerifier> Registry<S, V> {
    /// Create a registry over `store`.
    pub fn new(contract: ContractId, store: S, verifier: V, config: RegistryConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            contract,
            store: Arc::new(store),
            verifier,
            config,
            events,
        }
    }

    /// The contract id proofs and decryption requests must name.
    pub fn contract(&self) -> ContractId {
        self.contract
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registry Store
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a book owned by `caller`.
    ///
    /// Returns the new id, which equals the number of books registered
    /// before this call. The caller is implicitly authorized to decrypt both
    /// sealed fields.
    pub async fn register(&self, caller: &Identity, registration: Registration) -> Result<BookId> {
        let meta = BookMetadata {
            title: &registration.title,
            author: &registration.author,
            publisher: &registration.publisher,
            genre: &registration.genre,
        };
        if let Err(e) = validate_metadata(&meta, self.config.max_metadata_bytes) {
            tracing::warn!(%caller, error = %e, "rejected registration");
            return Err(RegistryError::InvalidInput(e.to_string()));
        }

        self.verify_input(caller, FieldKind::PricingTier, &registration.pricing_tier)?;
        self.verify_input(
            caller,
            FieldKind::DistributionWindow,
            &registration.distribution_window,
        )?;

        let book = NewBook {
            title: registration.title,
            author: registration.author,
            publisher: registration.publisher,
            genre: registration.genre,
            pricing_tier: registration.pricing_tier.ciphertext,
            distribution_window: registration.distribution_window.ciphertext,
            owner: *caller,
            timestamp: now_secs(),
        };

        let registered = self.store.insert_book(book).await?;
        let id = registered.record.id;
        tracing::info!(book_id = %id, owner = %caller, title = %registered.record.title, "book registered");

        self.publish(registered.event);
        Ok(id)
    }

    fn verify_input(&self, caller: &Identity, field: FieldKind, input: &EncryptedInput) -> Result<()> {
        self.verifier
            .verify(input, &self.contract, caller)
            .map(|_| ())
            .map_err(|e| {
                tracing::warn!(%caller, %field, error = %e, "rejected encrypted input");
                RegistryError::InvalidCiphertext(format!("{field}: {e}"))
            })
    }

    /// Public metadata of a book.
    pub async fn public_info(&self, id: BookId) -> Result<PublicInfo> {
        Ok(self.record(id).await?.public_info())
    }

    /// Whether a book with this id has been registered.
    pub async fn exists(&self, id: BookId) -> Result<bool> {
        Ok(self.store.has_book(id).await?)
    }

    /// Number of registered books.
    pub async fn count(&self) -> Result<u64> {
        Ok(self.store.book_count().await?)
    }

    /// The handle of one sealed field. Handles are public; reading one
    /// requires no authorization.
    pub async fn encrypted_field(&self, field: FieldKind, id: BookId) -> Result<CiphertextHandle> {
        Ok(self.record(id).await?.handle(field))
    }

    pub async fn pricing_tier(&self, id: BookId) -> Result<CiphertextHandle> {
        self.encrypted_field(FieldKind::PricingTier, id).await
    }

    pub async fn distribution_window(&self, id: BookId) -> Result<CiphertextHandle> {
        self.encrypted_field(FieldKind::DistributionWindow, id).await
    }

    /// The ciphertext behind a handle, for the decryption collaborator.
    pub async fn sealed_field(&self, field: FieldKind, id: BookId) -> Result<SealedValue> {
        let record = self.record(id).await?;
        Ok(record.sealed(field).clone())
    }

    /// Page through books in id order, starting at `start`.
    pub async fn list_books(&self, start: BookId, limit: usize) -> Result<Vec<PublicInfo>> {
        let limit = limit.min(self.config.max_page_size);
        let books = self.store.list_books(start, limit).await?;
        Ok(books.iter().map(BookRecord::public_info).collect())
    }

    /// Replay persisted events with `seq > after_seq`.
    pub async fn events_since(&self, after_seq: u64, limit: usize) -> Result<Vec<EventRecord>> {
        let limit = limit.min(self.config.max_page_size);
        Ok(self.store.events_since(after_seq, limit).await?)
    }

    /// Receive events committed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.events.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access Controller
    // ─────────────────────────────────────────────────────────────────────────

    /// Allow `accessor` to decrypt the sealed fields of book `id`.
    ///
    /// Only the owner may grant. Granting twice is a no-op.
    pub async fn grant_access(
        &self,
        id: BookId,
        accessor: &Identity,
        caller: &Identity,
    ) -> Result<GrantOutcome> {
        let record = self.record(id).await?;
        if record.owner != *caller {
            tracing::warn!(book_id = %id, %caller, "grant rejected: caller is not the owner");
            return Err(RegistryError::Unauthorized(format!(
                "{caller} does not own book {id}"
            )));
        }

        match self.store.insert_grant(id, accessor, now_secs()).await {
            Ok(GrantResult::Granted(event)) => {
                tracing::info!(book_id = %id, %accessor, "access granted");
                self.publish(event);
                Ok(GrantOutcome::Granted)
            }
            Ok(GrantResult::AlreadyGranted) => {
                tracing::debug!(book_id = %id, %accessor, "access already granted");
                Ok(GrantOutcome::AlreadyGranted)
            }
            Err(StoreError::BookNotFound(id)) => Err(RegistryError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether `identity` may decrypt the sealed fields of book `id`: the
    /// owner or an explicit accessor. False for unknown ids.
    pub async fn is_authorized(&self, id: BookId, identity: &Identity) -> Result<bool> {
        let Some(record) = self.store.get_book(id).await? else {
            return Ok(false);
        };
        if record.owner == *identity {
            return Ok(true);
        }
        Ok(self.store.has_grant(id, identity).await?)
    }

    /// Explicit accessors of book `id`, in grant order. The owner is not
    /// listed unless it was granted explicitly.
    pub async fn accessors(&self, id: BookId) -> Result<Vec<Identity>> {
        if !self.store.has_book(id).await? {
            return Err(RegistryError::NotFound(id));
        }
        Ok(self.store.list_grants(id).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    async fn record(&self, id: BookId) -> Result<BookRecord> {
        tracing::debug!(book_id = %id, "loading book");
        self.store
            .get_book(id)
            .await?
            .ok_or(RegistryError::NotFound(id))
    }

    fn publish(&self, event: EventRecord) {
        // No subscribers is not an error; the log already holds the event.
        let _ = self.events.send(event);
    }
}

/// Get current time in seconds.
fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookrights_core::{Keypair, RegistryEvent};
    use bookrights_fhe::Coprocessor;
    use bookrights_store::MemoryStore;

    struct Setup {
        coprocessor: Coprocessor,
        registry: Registry<MemoryStore>,
        owner: Keypair,
    }

    fn setup() -> Setup {
        let coprocessor = Coprocessor::from_seed(&[0xc0; 32]);
        let owner = Keypair::from_seed(&[1; 32]);
        let contract = ContractId::derive(&owner.identity(), "unit");
        let registry = Registry::new(
            contract,
            MemoryStore::new(),
            coprocessor.verifier(),
            RegistryConfig::default(),
        );
        Setup {
            coprocessor,
            registry,
            owner,
        }
    }

    fn registration(setup: &Setup, submitter: &Identity, title: &str) -> Registration {
        let batch = setup
            .coprocessor
            .input(setup.registry.contract(), *submitter)
            .add8(1)
            .add8(0)
            .encrypt()
            .unwrap();
        Registration {
            title: title.to_string(),
            author: "Michael Rodriguez".to_string(),
            publisher: "Crypto Books Ltd".to_string(),
            genre: "Finance".to_string(),
            pricing_tier: batch.input(0).unwrap(),
            distribution_window: batch.input(1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_verified_handles() {
        let s = setup();
        let caller = s.owner.identity();
        let reg = registration(&s, &caller, "Smart Contracts for Content Creators");
        let tier_handle = reg.pricing_tier.handle;

        let id = s.registry.register(&caller, reg).await.unwrap();
        assert_eq!(id, BookId(0));
        assert_eq!(s.registry.pricing_tier(id).await.unwrap(), tier_handle);

        let sealed = s.registry.sealed_field(FieldKind::PricingTier, id).await.unwrap();
        assert_eq!(sealed.handle(), tier_handle);
        assert_eq!(s.coprocessor.open(&sealed).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_swapped_inputs_still_verify_per_field() {
        // Each input carries the whole batch's proof, so order is the
        // producer's choice.
        let s = setup();
        let caller = s.owner.identity();
        let mut reg = registration(&s, &caller, "Title");
        std::mem::swap(&mut reg.pricing_tier, &mut reg.distribution_window);

        let id = s.registry.register(&caller, reg).await.unwrap();
        let sealed = s.registry.sealed_field(FieldKind::PricingTier, id).await.unwrap();
        assert_eq!(s.coprocessor.open(&sealed).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_oversized_metadata_rejected() {
        let s = setup();
        let caller = s.owner.identity();
        let mut reg = registration(&s, &caller, "Title");
        reg.genre = "x".repeat(s.registry.config().max_metadata_bytes + 1);

        let err = s.registry.register(&caller, reg).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);
        assert_eq!(s.registry.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_owner_may_grant_self() {
        let s = setup();
        let caller = s.owner.identity();
        let id = s
            .registry
            .register(&caller, registration(&s, &caller, "Title"))
            .await
            .unwrap();

        assert_eq!(
            s.registry.grant_access(id, &caller, &caller).await.unwrap(),
            GrantOutcome::Granted
        );
        assert_eq!(s.registry.accessors(id).await.unwrap(), vec![caller]);
    }

    #[tokio::test]
    async fn test_events_are_published_after_commit() {
        let s = setup();
        let caller = s.owner.identity();
        let reader = Keypair::from_seed(&[2; 32]).identity();
        let mut feed = s.registry.subscribe();

        let id = s
            .registry
            .register(&caller, registration(&s, &caller, "Title"))
            .await
            .unwrap();
        s.registry.grant_access(id, &reader, &caller).await.unwrap();
        s.registry.grant_access(id, &reader, &caller).await.unwrap();

        let first = feed.recv().await.unwrap();
        assert_eq!(first.seq, 1);
        assert!(matches!(first.event, RegistryEvent::BookRegistered { .. }));

        let second = feed.recv().await.unwrap();
        assert_eq!(
            second.event,
            RegistryEvent::AccessGranted {
                book_id: id,
                accessor: reader
            }
        );
        assert!(feed.try_recv().is_err());

        let log = s.registry.events_since(0, 100).await.unwrap();
        assert_eq!(log, vec![first, second]);
    }

    #[tokio::test]
    async fn test_list_books_respects_page_cap() {
        let coprocessor = Coprocessor::from_seed(&[0xc0; 32]);
        let owner = Keypair::from_seed(&[1; 32]);
        let registry = Registry::new(
            ContractId::derive(&owner.identity(), "unit"),
            MemoryStore::new(),
            coprocessor.verifier(),
            RegistryConfig {
                max_page_size: 2,
                ..RegistryConfig::default()
            },
        );
        let s = Setup {
            coprocessor,
            registry,
            owner,
        };
        let caller = s.owner.identity();
        for i in 0..3 {
            let reg = registration(&s, &caller, &format!("Book {i}"));
            s.registry.register(&caller, reg).await.unwrap();
        }

        let page = s.registry.list_books(BookId(0), 10).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[1].title, "Book 1");
    }
}
