//! Input proofs and their verification.
//!
//! A coprocessor attests that a batch of handles was produced for one
//! (contract, submitter) pair by signing a [`ProofBody`] listing them. The
//! signed body travels inside an opaque [`InputProof`].

use serde::{Deserialize, Serialize};

use bookrights_core::{
    from_cbor, to_cbor, CiphertextHandle, ContractId, EncryptedInput, Identity, InputProof,
    Keypair, Signature,
};

use crate::error::{FheError, Result};

/// Domain separator prepended to the signed proof body.
const PROOF_DOMAIN: &[u8] = b"bookrights-fhe-v0:input-proof:";

/// What a proof attests to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBody {
    /// The registry deployment the inputs are for.
    pub contract: ContractId,

    /// The identity allowed to submit the inputs.
    pub submitter: Identity,

    /// Handles in the order they were added to the batch.
    pub handles: Vec<CiphertextHandle>,
}

impl ProofBody {
    fn signing_bytes(&self) -> Result<Vec<u8>> {
        let mut message = PROOF_DOMAIN.to_vec();
        message.extend_from_slice(&to_cbor(self)?);
        Ok(message)
    }
}

/// A proof body with the attester's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedProof {
    pub body: ProofBody,
    pub attester: Identity,
    pub signature: Signature,
}

impl SignedProof {
    /// Sign a proof body.
    pub fn sign(body: ProofBody, attester: &Keypair) -> Result<Self> {
        let signature = attester.sign(&body.signing_bytes()?);
        Ok(Self {
            body,
            attester: attester.identity(),
            signature,
        })
    }

    /// Check the signature against the embedded attester.
    pub fn verify_signature(&self) -> Result<()> {
        self.attester
            .verify(&self.body.signing_bytes()?, &self.signature)
            .map_err(|e| FheError::InvalidProof(e.to_string()))
    }

    /// Encode into an opaque input proof.
    pub fn to_input_proof(&self) -> Result<InputProof> {
        Ok(InputProof::from_bytes(to_cbor(self)?))
    }

    /// Decode from an opaque input proof.
    pub fn from_input_proof(proof: &InputProof) -> Result<Self> {
        from_cbor(proof.as_bytes()).map_err(|e| FheError::InvalidProof(e.to_string()))
    }
}

/// Checks that an encrypted input was correctly constructed for a given
/// contract and submitter.
///
/// On success returns the verified handle, which the registry stores.
pub trait InputVerifier: Send + Sync {
    fn verify(
        &self,
        input: &EncryptedInput,
        contract: &ContractId,
        submitter: &Identity,
    ) -> Result<CiphertextHandle>;
}

/// Verifier that trusts proofs signed by one coprocessor identity.
#[derive(Debug, Clone)]
pub struct AttestedInputVerifier {
    trusted: Identity,
}

impl AttestedInputVerifier {
    /// Trust proofs attested by `trusted`.
    pub fn new(trusted: Identity) -> Self {
        Self { trusted }
    }
}

impl InputVerifier for AttestedInputVerifier {
    fn verify(
        &self,
        input: &EncryptedInput,
        contract: &ContractId,
        submitter: &Identity,
    ) -> Result<CiphertextHandle> {
        if !input.handle_matches() {
            return Err(FheError::HandleMismatch);
        }

        let proof = SignedProof::from_input_proof(&input.proof)?;
        if proof.attester != self.trusted {
            return Err(FheError::UntrustedAttester);
        }
        proof.verify_signature()?;

        let body = &proof.body;
        if body.contract != *contract {
            return Err(FheError::ProofMismatch(format!(
                "issued for contract {}",
                body.contract
            )));
        }
        if body.submitter != *submitter {
            return Err(FheError::ProofMismatch(format!(
                "issued for submitter {}",
                body.submitter
            )));
        }
        if !body.handles.contains(&input.handle) {
            return Err(FheError::ProofMismatch(format!(
                "handle {} not attested",
                input.handle
            )));
        }

        Ok(input.handle)
    }
}
