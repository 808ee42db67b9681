//! Global options and the registry they open.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;

use bookrights_core::{ContractId, Keypair};
use bookrights_fhe::Coprocessor;
use bookrights_registry::{DecryptionService, Registry, RegistryConfig};
use bookrights_store::SqliteStore;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path of the registry database.
    #[arg(long, env = "BOOKRIGHTS_DB", default_value = "bookrights.db", global = true)]
    pub db: PathBuf,

    /// Hex-encoded 32-byte seed of the acting identity.
    #[arg(long, env = "BOOKRIGHTS_KEY", hide_env_values = true, global = true)]
    pub key: Option<String>,

    /// Hex-encoded 32-byte seed of the coprocessor the registry trusts.
    ///
    /// Whoever holds this seed can open every sealed value in the registry
    /// without any grant, so keep it with the operator only.
    #[arg(
        long,
        env = "BOOKRIGHTS_COPROCESSOR_SEED",
        hide_env_values = true,
        global = true
    )]
    pub coprocessor_seed: Option<String>,

    /// Deployment name; together with the coprocessor identity it fixes the
    /// contract id.
    #[arg(
        long,
        env = "BOOKRIGHTS_DEPLOYMENT",
        default_value = "book-rights-registry",
        global = true
    )]
    pub deployment: String,
}

impl GlobalArgs {
    /// The acting identity's keypair.
    pub fn keypair(&self) -> Result<Keypair> {
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| anyhow!("--key (or BOOKRIGHTS_KEY) is required for this command"))?;
        Ok(Keypair::from_seed(&parse_seed(key).context("invalid --key")?))
    }

    fn coprocessor_seed(&self) -> Result<[u8; 32]> {
        let seed = self.coprocessor_seed.as_deref().ok_or_else(|| {
            anyhow!("--coprocessor-seed (or BOOKRIGHTS_COPROCESSOR_SEED) is required")
        })?;
        parse_seed(seed).context("invalid --coprocessor-seed")
    }

    /// Open the registry described by these options.
    pub fn open(&self) -> Result<Session> {
        let seed = self.coprocessor_seed()?;
        let coprocessor = Coprocessor::from_seed(&seed);
        let contract = ContractId::derive(&coprocessor.identity(), &self.deployment);

        let store = SqliteStore::open(&self.db)
            .with_context(|| format!("opening {}", self.db.display()))?;
        tracing::debug!(db = %self.db.display(), %contract, "registry opened");

        let registry = Registry::new(
            contract,
            store,
            coprocessor.verifier(),
            RegistryConfig::default(),
        );
        let decryption = DecryptionService::new(Coprocessor::from_seed(&seed));

        Ok(Session {
            coprocessor,
            registry,
            decryption,
        })
    }
}

/// An opened registry and its collaborators.
pub struct Session {
    pub coprocessor: Coprocessor,
    pub registry: Registry<SqliteStore>,
    pub decryption: DecryptionService,
}

/// Parse a hex-encoded 32-byte seed, with or without a `0x` prefix.
pub fn parse_seed(s: &str) -> Result<[u8; 32]> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s)?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| anyhow!("expected 32 bytes, got {}", v.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookrights_core::{BookId, DistributionWindow, FieldKind, PricingTier};
    use bookrights_fhe::X25519StaticSecret;
    use bookrights_registry::{DecryptionRequest, Registration};

    fn global_args(db: PathBuf, seed: Option<String>) -> GlobalArgs {
        GlobalArgs {
            db,
            key: None,
            coprocessor_seed: seed,
            deployment: "book-rights-registry".into(),
        }
    }

    #[test]
    fn test_open_requires_coprocessor_seed() {
        let dir = tempfile::tempdir().unwrap();
        let args = global_args(dir.path().join("registry.db"), None);
        assert!(args.open().is_err());
    }

    #[tokio::test]
    async fn test_session_decrypts_what_it_sealed() {
        let dir = tempfile::tempdir().unwrap();
        let args = global_args(dir.path().join("registry.db"), Some("c0".repeat(32)));
        let session = args.open().unwrap();
        let owner = Keypair::from_seed(&[0x42; 32]);

        let batch = session
            .coprocessor
            .input(session.registry.contract(), owner.identity())
            .add8(PricingTier::Standard.to_u8())
            .add8(DistributionWindow::Limited.to_u8())
            .encrypt()
            .unwrap();
        let registration = Registration {
            title: "Sealed".into(),
            author: "A".into(),
            publisher: "P".into(),
            genre: "G".into(),
            pricing_tier: batch.input(0).unwrap(),
            distribution_window: batch.input(1).unwrap(),
        };
        let id = session
            .registry
            .register(&owner.identity(), registration)
            .await
            .unwrap();
        assert_eq!(id, BookId(0));

        let handle = session
            .registry
            .encrypted_field(FieldKind::PricingTier, id)
            .await
            .unwrap();
        let reply_secret = X25519StaticSecret::derive_from_seed(&owner.seed());
        let request = DecryptionRequest::sign(
            &owner,
            session.registry.contract(),
            id,
            FieldKind::PricingTier,
            handle,
            reply_secret.public_key(),
        );
        let reply = session
            .decryption
            .user_decrypt(&session.registry, &request)
            .await
            .unwrap();
        assert_eq!(
            request.open_reply(&reply, &reply_secret).unwrap(),
            PricingTier::Standard.to_u8()
        );
    }

    #[test]
    fn test_parse_seed() {
        let hex = "11".repeat(32);
        assert_eq!(parse_seed(&hex).unwrap(), [0x11; 32]);
        assert_eq!(parse_seed(&format!("0x{hex}")).unwrap(), [0x11; 32]);
        assert!(parse_seed("1122").is_err());
        assert!(parse_seed("zz").is_err());
    }
}
