//! User decryption of sealed fields.
//!
//! A reader signs a [`DecryptionRequest`] naming the book, the field, the
//! handle they saw, and an X25519 reply key. The [`DecryptionService`]
//! checks the request against the registry's access controller and, if the
//! reader is authorized, returns the plaintext re-encrypted to the reply key.

use serde::{Deserialize, Serialize};

use bookrights_core::{
    BookId, CiphertextHandle, ContractId, FieldKind, Identity, Keypair, Signature,
};
use bookrights_fhe::{
    Coprocessor, InputVerifier, ReencryptedValue, X25519PublicKey, X25519StaticSecret,
};
use bookrights_store::Store;

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

/// Domain separator for decryption request signatures.
const REQUEST_DOMAIN: &[u8] = b"bookrights-v0:user-decrypt:";

/// A signed request to decrypt one sealed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionRequest {
    pub book_id: BookId,
    pub field: FieldKind,
    /// The handle the requester expects to be decrypting.
    pub handle: CiphertextHandle,
    pub contract: ContractId,
    pub requester: Identity,
    /// Where the reply is encrypted to.
    pub reply_key: X25519PublicKey,
    pub signature: Signature,
}

impl DecryptionRequest {
    /// Build and sign a request as `requester`.
    pub fn sign(
        requester: &Keypair,
        contract: ContractId,
        book_id: BookId,
        field: FieldKind,
        handle: CiphertextHandle,
        reply_key: X25519PublicKey,
    ) -> Self {
        let mut request = Self {
            book_id,
            field,
            handle,
            contract,
            requester: requester.identity(),
            reply_key,
            signature: Signature::ZERO,
        };
        request.signature = requester.sign(&request.signing_bytes());
        request
    }

    /// Check that `requester` signed this request.
    pub fn verify_signature(&self) -> bool {
        self.requester
            .verify(&self.signing_bytes(), &self.signature)
            .is_ok()
    }

    /// Open a reply produced for this request.
    pub fn open_reply(&self, reply: &ReencryptedValue, secret: &X25519StaticSecret) -> Result<u8> {
        Ok(reply.open(secret, self.handle.as_bytes())?)
    }

    fn signing_bytes(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(REQUEST_DOMAIN.len() + 32 + 8 + 1 + 32 + 32);
        message.extend_from_slice(REQUEST_DOMAIN);
        message.extend_from_slice(self.contract.as_bytes());
        message.extend_from_slice(&self.book_id.get().to_be_bytes());
        message.push(self.field.tag());
        message.extend_from_slice(self.handle.as_bytes());
        message.extend_from_slice(self.reply_key.as_bytes());
        message
    }
}

/// Opens sealed fields for authorized readers.
///
/// Holds the coprocessor, and with it the network key. Nothing else in the
/// system can open a sealed value.
pub struct DecryptionService {
    coprocessor: Coprocessor,
}

impl DecryptionService {
    pub fn new(coprocessor: Coprocessor) -> Self {
        Self { coprocessor }
    }

    /// Decrypt one field for the requester and re-encrypt it to their
    /// reply key.
    ///
    /// Checks, in order: the request signature, the contract, that the book
    /// exists and the handle is current, and that the requester is the
    /// owner or a granted accessor.
    pub async fn user_decrypt<S: Store, V: InputVerifier>(
        &self,
        registry: &Registry<S, V>,
        request: &DecryptionRequest,
    ) -> Result<ReencryptedValue> {
        if !request.verify_signature() {
            tracing::warn!(requester = %request.requester, "decryption request signature invalid");
            return Err(RegistryError::Unauthorized(
                "request signature does not verify".into(),
            ));
        }

        if request.contract != registry.contract() {
            return Err(RegistryError::InvalidInput(format!(
                "request is for contract {}",
                request.contract
            )));
        }

        let sealed = registry.sealed_field(request.field, request.book_id).await?;
        if sealed.handle() != request.handle {
            return Err(RegistryError::InvalidInput(format!(
                "handle {} is not the current {} of book {}",
                request.handle, request.field, request.book_id
            )));
        }

        if !registry
            .is_authorized(request.book_id, &request.requester)
            .await?
        {
            tracing::warn!(
                book_id = %request.book_id,
                requester = %request.requester,
                "decryption refused: not authorized"
            );
            return Err(RegistryError::Unauthorized(format!(
                "{} may not decrypt book {}",
                request.requester, request.book_id
            )));
        }

        let value = self.coprocessor.open(&sealed)?;
        let reply = ReencryptedValue::seal(value, &request.reply_key, request.handle.as_bytes())?;

        tracing::info!(
            book_id = %request.book_id,
            field = %request.field,
            requester = %request.requester,
            "field decrypted for reader"
        );
        Ok(reply)
    }
}
