//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use bookrights_core::{
    BookId, ContractId, DistributionWindow, FieldKind, Identity, Keypair, PricingTier,
};
use bookrights_fhe::{Coprocessor, X25519StaticSecret};
use bookrights_registry::{
    DecryptionRequest, DecryptionService, Registration, Registry, RegistryConfig, Result,
};
use bookrights_store::{MemoryStore, Store};

/// Seed of the coprocessor every fixture registry trusts.
pub const COPROCESSOR_SEED: [u8; 32] = [0xc0; 32];

/// Seed of the identity that deploys fixture registries.
const DEPLOYER_SEED: [u8; 32] = [0xde; 32];

/// A party: one identity with its signing and reply keys.
pub struct TestFixture {
    pub keypair: Keypair,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// The party's identity.
    pub fn identity(&self) -> Identity {
        self.keypair.identity()
    }

    /// The X25519 secret this party opens decryption replies with.
    pub fn reply_secret(&self) -> X25519StaticSecret {
        X25519StaticSecret::derive_from_seed(&self.keypair.seed())
    }

    /// Build a registration whose encrypted fields are valid for this party
    /// on `contract`.
    pub fn registration(
        &self,
        coprocessor: &Coprocessor,
        contract: ContractId,
        title: &str,
        tier: PricingTier,
        window: DistributionWindow,
    ) -> Registration {
        let batch = coprocessor
            .input(contract, self.identity())
            .add8(tier.to_u8())
            .add8(window.to_u8())
            .encrypt()
            .expect("fixture encryption");

        Registration {
            title: title.to_string(),
            author: "Sarah Chen".to_string(),
            publisher: "TechPress Publishing".to_string(),
            genre: "Technology".to_string(),
            pricing_tier: batch.input(0).expect("tier input"),
            distribution_window: batch.input(1).expect("window input"),
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A registry wired to a coprocessor and a decryption service.
pub struct RegistryFixture<S: Store = MemoryStore> {
    pub coprocessor: Coprocessor,
    pub registry: Registry<S>,
    pub decryption: DecryptionService,
}

impl RegistryFixture<MemoryStore> {
    /// A registry over a fresh memory store.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for RegistryFixture<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Store> RegistryFixture<S> {
    /// A registry over `store`, with the default configuration.
    pub fn with_store(store: S) -> Self {
        Self::with_config(store, RegistryConfig::default())
    }

    /// A registry over `store`.
    pub fn with_config(store: S, config: RegistryConfig) -> Self {
        let coprocessor = Coprocessor::from_seed(&COPROCESSOR_SEED);
        let registry = Registry::new(contract(), store, coprocessor.verifier(), config);

        Self {
            coprocessor,
            registry,
            decryption: DecryptionService::new(Coprocessor::from_seed(&COPROCESSOR_SEED)),
        }
    }

    /// The fixture's contract id.
    pub fn contract(&self) -> ContractId {
        self.registry.contract()
    }

    /// A valid registration by `party`.
    pub fn registration(
        &self,
        party: &TestFixture,
        title: &str,
        tier: PricingTier,
        window: DistributionWindow,
    ) -> Registration {
        party.registration(&self.coprocessor, self.contract(), title, tier, window)
    }

    /// Register a book as `party`.
    pub async fn register(
        &self,
        party: &TestFixture,
        title: &str,
        tier: PricingTier,
        window: DistributionWindow,
    ) -> Result<BookId> {
        let registration = self.registration(party, title, tier, window);
        self.registry.register(&party.identity(), registration).await
    }

    /// Decrypt one field as `party`, through a signed request.
    pub async fn decrypt(&self, party: &TestFixture, id: BookId, field: FieldKind) -> Result<u8> {
        let handle = self.registry.encrypted_field(field, id).await?;
        let secret = party.reply_secret();
        let request = DecryptionRequest::sign(
            &party.keypair,
            self.contract(),
            id,
            field,
            handle,
            secret.public_key(),
        );

        let reply = self.decryption.user_decrypt(&self.registry, &request).await?;
        request.open_reply(&reply, &secret)
    }
}

/// The contract id fixture registries are deployed under.
pub fn contract() -> ContractId {
    ContractId::derive(
        &Keypair::from_seed(&DEPLOYER_SEED).identity(),
        "book-rights-registry",
    )
}

/// Create multiple parties for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 0x50;
            TestFixture::with_seed(seed)
        })
        .collect()
}
