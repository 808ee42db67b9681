//! Registration with encrypted inputs that fail verification.

use bookrights_fhe::Coprocessor;
use bookrights_registry::{
    ContractId, DistributionWindow, ErrorKind, Keypair, PricingTier, Registration,
};
use bookrights_testkit::{multi_party_fixtures, RegistryFixture, TestFixture};

async fn assert_rejected(
    fixture: &RegistryFixture,
    caller: &TestFixture,
    registration: Registration,
) {
    let err = fixture
        .registry
        .register(&caller.identity(), registration)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCiphertext, "{err}");
    assert_eq!(fixture.registry.count().await.unwrap(), 0);
}

#[tokio::test]
async fn proof_for_another_submitter() {
    let fixture = RegistryFixture::new();
    let parties = multi_party_fixtures(2);

    // Built for parties[1], submitted by parties[0].
    let registration =
        fixture.registration(&parties[1], "Title", PricingTier::Basic, DistributionWindow::Open);
    assert_rejected(&fixture, &parties[0], registration).await;
}

#[tokio::test]
async fn proof_for_another_contract() {
    let fixture = RegistryFixture::new();
    let party = &multi_party_fixtures(1)[0];

    let other = ContractId::derive(&Keypair::from_seed(&[1; 32]).identity(), "elsewhere");
    let registration = party.registration(
        &fixture.coprocessor,
        other,
        "Title",
        PricingTier::Basic,
        DistributionWindow::Open,
    );
    assert_rejected(&fixture, party, registration).await;
}

#[tokio::test]
async fn proof_from_untrusted_coprocessor() {
    let fixture = RegistryFixture::new();
    let party = &multi_party_fixtures(1)[0];

    let rogue = Coprocessor::from_seed(&[0x66; 32]);
    let registration = party.registration(
        &rogue,
        fixture.contract(),
        "Title",
        PricingTier::Premium,
        DistributionWindow::Exclusive,
    );
    assert_rejected(&fixture, party, registration).await;
}

#[tokio::test]
async fn handle_not_matching_ciphertext() {
    let fixture = RegistryFixture::new();
    let party = &multi_party_fixtures(1)[0];

    let mut registration =
        fixture.registration(party, "Title", PricingTier::Basic, DistributionWindow::Open);
    registration.pricing_tier.handle = registration.distribution_window.handle;
    assert_rejected(&fixture, party, registration).await;
}

#[tokio::test]
async fn ciphertext_from_another_batch() {
    let fixture = RegistryFixture::new();
    let party = &multi_party_fixtures(1)[0];

    // Each input is individually valid, but the window's proof covers a
    // different batch than the one it is paired with below.
    let first = fixture.registration(party, "A", PricingTier::Basic, DistributionWindow::Open);
    let second =
        fixture.registration(party, "B", PricingTier::Premium, DistributionWindow::Exclusive);

    let mut mixed = first;
    mixed.distribution_window.proof = second.pricing_tier.proof;
    assert_rejected(&fixture, party, mixed).await;
}
