//! Reference coprocessor: produces encrypted inputs and opens sealed values.
//!
//! A coprocessor holds two secrets derived from one seed:
//!
//! - an Ed25519 attestation key, whose identity registries trust when
//!   verifying input proofs
//! - a network key, under which every value is sealed
//!
//! Producers call [`Coprocessor::input`] to build a batch of encrypted
//! inputs for a (contract, submitter) pair. Only the decryption service
//! should call [`Coprocessor::open`].

use bookrights_core::{
    CiphertextHandle, ContractId, EncryptedInput, Identity, InputProof, Keypair, SealedValue,
};

use crate::crypto::EncryptionKey;
use crate::envelope::SealedEnvelope;
use crate::error::{FheError, Result};
use crate::proof::{AttestedInputVerifier, ProofBody, SignedProof};

/// Derive-key context for the network key.
const NETWORK_KEY_CONTEXT: &str = "bookrights-fhe-v0 network key";

/// Holder of the attestation key and the network key.
pub struct Coprocessor {
    attester: Keypair,
    network_key: EncryptionKey,
}

impl Coprocessor {
    /// Derive a coprocessor from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            attester: Keypair::from_seed(seed),
            network_key: EncryptionKey::derive(NETWORK_KEY_CONTEXT, seed),
        }
    }

    /// Create a coprocessor with a random seed.
    pub fn generate() -> Self {
        Self::from_seed(&Keypair::generate().seed())
    }

    /// The attestation identity proofs are signed with.
    pub fn identity(&self) -> Identity {
        self.attester.identity()
    }

    /// A verifier that trusts this coprocessor's proofs.
    pub fn verifier(&self) -> AttestedInputVerifier {
        AttestedInputVerifier::new(self.identity())
    }

    /// Start a batch of encrypted inputs for `submitter` on `contract`.
    pub fn input(&self, contract: ContractId, submitter: Identity) -> EncryptedInputBuilder<'_> {
        EncryptedInputBuilder {
            coprocessor: self,
            contract,
            submitter,
            values: Vec::new(),
        }
    }

    /// Decrypt an 8-bit sealed value.
    pub fn open(&self, sealed: &SealedValue) -> Result<u8> {
        let plaintext = SealedEnvelope::from_sealed(sealed)?.open(&self.network_key)?;
        match plaintext.as_slice() {
            [value] => Ok(*value),
            other => Err(FheError::DecryptionError(format!(
                "expected 1-byte plaintext, got {} bytes",
                other.len()
            ))),
        }
    }

    fn seal(&self, value: u8) -> Result<SealedValue> {
        SealedEnvelope::seal(&[value], &self.network_key)?.to_sealed()
    }
}

impl std::fmt::Debug for Coprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Coprocessor({:?})", self.identity())
    }
}

/// Collects plaintext scalars for one proof.
pub struct EncryptedInputBuilder<'a> {
    coprocessor: &'a Coprocessor,
    contract: ContractId,
    submitter: Identity,
    values: Vec<u8>,
}

impl EncryptedInputBuilder<'_> {
    /// Append an 8-bit value.
    pub fn add8(&mut self, value: u8) -> &mut Self {
        self.values.push(value);
        self
    }

    /// Seal every value and sign one proof covering all their handles.
    pub fn encrypt(&self) -> Result<EncryptedInputBatch> {
        let ciphertexts = self
            .values
            .iter()
            .map(|value| self.coprocessor.seal(*value))
            .collect::<Result<Vec<_>>>()?;
        let handles: Vec<CiphertextHandle> = ciphertexts.iter().map(SealedValue::handle).collect();

        let proof = SignedProof::sign(
            ProofBody {
                contract: self.contract,
                submitter: self.submitter,
                handles: handles.clone(),
            },
            &self.coprocessor.attester,
        )?
        .to_input_proof()?;

        Ok(EncryptedInputBatch {
            handles,
            ciphertexts,
            proof,
        })
    }
}

/// The output of [`EncryptedInputBuilder::encrypt`].
#[derive(Debug, Clone)]
pub struct EncryptedInputBatch {
    handles: Vec<CiphertextHandle>,
    ciphertexts: Vec<SealedValue>,
    proof: InputProof,
}

impl EncryptedInputBatch {
    /// The handles, in insertion order.
    pub fn handles(&self) -> &[CiphertextHandle] {
        &self.handles
    }

    /// Number of values in the batch.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// The encrypted input at `index`, carrying the shared proof.
    pub fn input(&self, index: usize) -> Option<EncryptedInput> {
        Some(EncryptedInput {
            handle: *self.handles.get(index)?,
            ciphertext: self.ciphertexts.get(index)?.clone(),
            proof: self.proof.clone(),
        })
    }
}
