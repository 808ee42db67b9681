//! User decryption through the access controller.

use bookrights_fhe::X25519StaticSecret;
use bookrights_registry::{
    BookId, ContractId, DecryptionRequest, DistributionWindow, ErrorKind, FieldKind, Keypair,
    PricingTier,
};
use bookrights_testkit::{multi_party_fixtures, RegistryFixture};

#[tokio::test]
async fn owner_and_distributor_decrypt_terms() {
    let fixture = RegistryFixture::new();
    let parties = multi_party_fixtures(3);
    let (publisher, distributor, outsider) = (&parties[0], &parties[1], &parties[2]);

    let id = fixture
        .register(
            publisher,
            "The Future of Digital Content",
            PricingTier::Premium,
            DistributionWindow::Limited,
        )
        .await
        .unwrap();
    fixture
        .registry
        .grant_access(id, &distributor.identity(), &publisher.identity())
        .await
        .unwrap();

    for reader in [publisher, distributor] {
        let tier = fixture.decrypt(reader, id, FieldKind::PricingTier).await.unwrap();
        let window = fixture
            .decrypt(reader, id, FieldKind::DistributionWindow)
            .await
            .unwrap();
        assert_eq!(PricingTier::from_u8(tier), Some(PricingTier::Premium));
        assert_eq!(DistributionWindow::from_u8(window), Some(DistributionWindow::Limited));
    }

    let err = fixture
        .decrypt(outsider, id, FieldKind::PricingTier)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn grant_unlocks_decryption() {
    let fixture = RegistryFixture::new();
    let parties = multi_party_fixtures(2);
    let (owner, reader) = (&parties[0], &parties[1]);

    let id = fixture
        .register(owner, "Title", PricingTier::Basic, DistributionWindow::Open)
        .await
        .unwrap();

    assert!(fixture.decrypt(reader, id, FieldKind::PricingTier).await.is_err());

    fixture
        .registry
        .grant_access(id, &reader.identity(), &owner.identity())
        .await
        .unwrap();
    assert_eq!(
        fixture.decrypt(reader, id, FieldKind::PricingTier).await.unwrap(),
        PricingTier::Basic.to_u8()
    );
}

#[tokio::test]
async fn forged_request_rejected() {
    let fixture = RegistryFixture::new();
    let parties = multi_party_fixtures(2);
    let (owner, thief) = (&parties[0], &parties[1]);

    let id = fixture
        .register(owner, "Title", PricingTier::Premium, DistributionWindow::Exclusive)
        .await
        .unwrap();
    let handle = fixture.registry.pricing_tier(id).await.unwrap();

    // Signed by the thief, but claiming to come from the owner.
    let mut request = DecryptionRequest::sign(
        &thief.keypair,
        fixture.contract(),
        id,
        FieldKind::PricingTier,
        handle,
        thief.reply_secret().public_key(),
    );
    request.requester = owner.identity();

    let err = fixture
        .decryption
        .user_decrypt(&fixture.registry, &request)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn request_for_other_contract_rejected() {
    let fixture = RegistryFixture::new();
    let owner = &multi_party_fixtures(1)[0];

    let id = fixture
        .register(owner, "Title", PricingTier::Premium, DistributionWindow::Exclusive)
        .await
        .unwrap();
    let handle = fixture.registry.pricing_tier(id).await.unwrap();

    let request = DecryptionRequest::sign(
        &owner.keypair,
        ContractId::derive(&Keypair::from_seed(&[9; 32]).identity(), "other"),
        id,
        FieldKind::PricingTier,
        handle,
        owner.reply_secret().public_key(),
    );

    let err = fixture
        .decryption
        .user_decrypt(&fixture.registry, &request)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn stale_or_mismatched_handle_rejected() {
    let fixture = RegistryFixture::new();
    let owner = &multi_party_fixtures(1)[0];

    let id = fixture
        .register(owner, "Title", PricingTier::Premium, DistributionWindow::Exclusive)
        .await
        .unwrap();

    // The window's handle presented as the tier's.
    let window = fixture.registry.distribution_window(id).await.unwrap();
    let request = DecryptionRequest::sign(
        &owner.keypair,
        fixture.contract(),
        id,
        FieldKind::PricingTier,
        window,
        owner.reply_secret().public_key(),
    );

    let err = fixture
        .decryption
        .user_decrypt(&fixture.registry, &request)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn missing_book_not_found() {
    let fixture = RegistryFixture::new();
    let owner = &multi_party_fixtures(1)[0];

    let request = DecryptionRequest::sign(
        &owner.keypair,
        fixture.contract(),
        BookId(7),
        FieldKind::DistributionWindow,
        bookrights_registry::CiphertextHandle::from_bytes([0; 32]),
        owner.reply_secret().public_key(),
    );

    let err = fixture
        .decryption
        .user_decrypt(&fixture.registry, &request)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn reply_only_opens_with_reply_key() {
    let fixture = RegistryFixture::new();
    let owner = &multi_party_fixtures(1)[0];

    let id = fixture
        .register(owner, "Title", PricingTier::Standard, DistributionWindow::Open)
        .await
        .unwrap();
    let handle = fixture.registry.pricing_tier(id).await.unwrap();

    let secret = owner.reply_secret();
    let request = DecryptionRequest::sign(
        &owner.keypair,
        fixture.contract(),
        id,
        FieldKind::PricingTier,
        handle,
        secret.public_key(),
    );
    let reply = fixture
        .decryption
        .user_decrypt(&fixture.registry, &request)
        .await
        .unwrap();

    assert_eq!(request.open_reply(&reply, &secret).unwrap(), 1);
    assert!(request
        .open_reply(&reply, &X25519StaticSecret::generate())
        .is_err());
}
