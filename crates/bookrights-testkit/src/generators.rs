//! Proptest generators for property-based testing.

use proptest::prelude::*;

use bookrights_core::{BookId, DistributionWindow, FieldKind, Identity, Keypair, PricingTier};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    keypair().prop_map(|kp| kp.identity())
}

/// Generate a book id in a small range, so some of them exist.
pub fn book_id(max: u64) -> impl Strategy<Value = BookId> {
    (0..=max).prop_map(BookId)
}

/// Generate a pricing tier.
pub fn pricing_tier() -> impl Strategy<Value = PricingTier> {
    prop_oneof![
        Just(PricingTier::Basic),
        Just(PricingTier::Standard),
        Just(PricingTier::Premium),
    ]
}

/// Generate a distribution window.
pub fn distribution_window() -> impl Strategy<Value = DistributionWindow> {
    prop_oneof![
        Just(DistributionWindow::Open),
        Just(DistributionWindow::Limited),
        Just(DistributionWindow::Exclusive),
    ]
}

/// Generate a field kind.
pub fn field_kind() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::PricingTier),
        Just(FieldKind::DistributionWindow),
    ]
}

/// Generate a non-empty title.
pub fn title() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 :'-]{0,63}".prop_map(String::from)
}

/// Generate a metadata field that may be empty.
pub fn metadata_field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .-]{0,32}".prop_map(String::from)
}

/// Parameters for generating a registration.
#[derive(Debug, Clone)]
pub struct BookParams {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub genre: String,
    pub tier: PricingTier,
    pub window: DistributionWindow,
}

impl Arbitrary for BookParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            title(),
            metadata_field(),
            metadata_field(),
            metadata_field(),
            pricing_tier(),
            distribution_window(),
        )
            .prop_map(|(title, author, publisher, genre, tier, window)| BookParams {
                title,
                author,
                publisher,
                genre,
                tier,
                window,
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_titles_are_non_empty(params: BookParams) {
            prop_assert!(!params.title.is_empty());
        }

        #[test]
        fn generated_book_ids_in_range(id in book_id(10)) {
            prop_assert!(id.get() <= 10);
        }
    }
}
