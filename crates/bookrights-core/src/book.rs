//! Book records.
//!
//! A record is written once at registration and never updated. Its plaintext
//! metadata is public; its pricing tier and distribution window are sealed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crypto::Identity;
use crate::sealed::{CiphertextHandle, SealedValue};
use crate::types::BookId;

/// Which of a book's two confidential fields is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    PricingTier,
    DistributionWindow,
}

impl FieldKind {
    /// Stable numeric tag used in signed messages.
    pub const fn tag(self) -> u8 {
        match self {
            FieldKind::PricingTier => 0,
            FieldKind::DistributionWindow => 1,
        }
    }

    /// Kebab-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKind::PricingTier => "pricing-tier",
            FieldKind::DistributionWindow => "distribution-window",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pricing-tier" | "pricingTier" => Ok(FieldKind::PricingTier),
            "distribution-window" | "distributionWindow" => Ok(FieldKind::DistributionWindow),
            other => Err(format!("unknown field: {other}")),
        }
    }
}

/// A book as handed to the store for insertion. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub genre: String,
    pub pricing_tier: SealedValue,
    pub distribution_window: SealedValue,
    pub owner: Identity,
    /// Registration time (Unix seconds).
    pub timestamp: i64,
}

impl NewBook {
    /// Attach the id the store allocated.
    pub fn into_record(self, id: BookId) -> BookRecord {
        BookRecord {
            id,
            title: self.title,
            author: self.author,
            publisher: self.publisher,
            genre: self.genre,
            pricing_tier: self.pricing_tier,
            distribution_window: self.distribution_window,
            owner: self.owner,
            timestamp: self.timestamp,
        }
    }
}

/// A registered book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub genre: String,
    pub pricing_tier: SealedValue,
    pub distribution_window: SealedValue,
    pub owner: Identity,
    /// Registration time (Unix seconds).
    pub timestamp: i64,
}

impl BookRecord {
    /// The sealed value for one confidential field.
    pub fn sealed(&self, field: FieldKind) -> &SealedValue {
        match field {
            FieldKind::PricingTier => &self.pricing_tier,
            FieldKind::DistributionWindow => &self.distribution_window,
        }
    }

    /// The handle for one confidential field.
    pub fn handle(&self, field: FieldKind) -> CiphertextHandle {
        self.sealed(field).handle()
    }

    /// The publicly readable part of the record.
    pub fn public_info(&self) -> PublicInfo {
        PublicInfo {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            publisher: self.publisher.clone(),
            genre: self.genre.clone(),
            owner: self.owner,
            timestamp: self.timestamp,
        }
    }
}

/// Public metadata of a book, readable by anyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInfo {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub genre: String,
    pub owner: Identity,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    fn sample() -> BookRecord {
        NewBook {
            title: "Cryptographic Rights Management".into(),
            author: "Michael Rodriguez".into(),
            publisher: "Crypto Books Ltd".into(),
            genre: "Technology".into(),
            pricing_tier: SealedValue::from_bytes(vec![1; 8]),
            distribution_window: SealedValue::from_bytes(vec![2; 8]),
            owner: Keypair::from_seed(&[7; 32]).identity(),
            timestamp: 1_700_000_000,
        }
        .into_record(BookId(3))
    }

    #[test]
    fn test_sealed_selects_field() {
        let record = sample();
        assert_eq!(record.sealed(FieldKind::PricingTier).as_bytes(), &[1; 8]);
        assert_eq!(record.sealed(FieldKind::DistributionWindow).as_bytes(), &[2; 8]);
        assert_ne!(
            record.handle(FieldKind::PricingTier),
            record.handle(FieldKind::DistributionWindow)
        );
    }

    #[test]
    fn test_public_info_copies_metadata() {
        let record = sample();
        let info = record.public_info();
        assert_eq!(info.id, BookId(3));
        assert_eq!(info.title, record.title);
        assert_eq!(info.owner, record.owner);
        assert_eq!(info.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_field_kind_parse() {
        assert_eq!("pricing-tier".parse::<FieldKind>().unwrap(), FieldKind::PricingTier);
        assert_eq!(
            "distributionWindow".parse::<FieldKind>().unwrap(),
            FieldKind::DistributionWindow
        );
        assert!("royalty".parse::<FieldKind>().is_err());
    }
}
