//! Plaintext vocabularies for the two confidential fields.
//!
//! The registry never sees these values. Producers encode them before
//! encryption and authorized readers decode them after decryption.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pricing tier of a licensed title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PricingTier {
    Basic = 0,
    Standard = 1,
    Premium = 2,
}

impl PricingTier {
    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            PricingTier::Basic => "Basic",
            PricingTier::Standard => "Standard",
            PricingTier::Premium => "Premium",
        }
    }

    /// List price attached to the tier.
    pub const fn price(self) -> &'static str {
        match self {
            PricingTier::Basic => "$2.99",
            PricingTier::Standard => "$4.99",
            PricingTier::Premium => "$9.99",
        }
    }

    /// Encoded scalar.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Decode a scalar, if it names a tier.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PricingTier::Basic),
            1 => Some(PricingTier::Standard),
            2 => Some(PricingTier::Premium),
            _ => None,
        }
    }
}

impl fmt::Display for PricingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.label(), self.price())
    }
}

impl FromStr for PricingTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" | "0" => Ok(PricingTier::Basic),
            "standard" | "1" => Ok(PricingTier::Standard),
            "premium" | "2" => Ok(PricingTier::Premium),
            other => Err(format!("unknown pricing tier: {other}")),
        }
    }
}

/// Distribution window of a licensed title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DistributionWindow {
    Open = 0,
    Limited = 1,
    Exclusive = 2,
}

impl DistributionWindow {
    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            DistributionWindow::Open => "Open",
            DistributionWindow::Limited => "Limited",
            DistributionWindow::Exclusive => "Exclusive",
        }
    }

    /// Length of the window.
    pub const fn duration(self) -> &'static str {
        match self {
            DistributionWindow::Open => "Unlimited",
            DistributionWindow::Limited => "3 months",
            DistributionWindow::Exclusive => "6 months",
        }
    }

    /// Encoded scalar.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Decode a scalar, if it names a window.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DistributionWindow::Open),
            1 => Some(DistributionWindow::Limited),
            2 => Some(DistributionWindow::Exclusive),
            _ => None,
        }
    }
}

impl fmt::Display for DistributionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.label(), self.duration())
    }
}

impl FromStr for DistributionWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" | "0" => Ok(DistributionWindow::Open),
            "limited" | "1" => Ok(DistributionWindow::Limited),
            "exclusive" | "2" => Ok(DistributionWindow::Exclusive),
            other => Err(format!("unknown distribution window: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_scalars() {
        for tier in [PricingTier::Basic, PricingTier::Standard, PricingTier::Premium] {
            assert_eq!(PricingTier::from_u8(tier.to_u8()), Some(tier));
        }
        assert_eq!(PricingTier::from_u8(3), None);
    }

    #[test]
    fn test_window_scalars() {
        assert_eq!(DistributionWindow::Exclusive.to_u8(), 2);
        assert_eq!(DistributionWindow::from_u8(255), None);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(PricingTier::Premium.to_string(), "Premium - $9.99");
        assert_eq!(DistributionWindow::Limited.to_string(), "Limited - 3 months");
    }

    #[test]
    fn test_parse_names_and_digits() {
        assert_eq!("Standard".parse::<PricingTier>().unwrap(), PricingTier::Standard);
        assert_eq!("0".parse::<DistributionWindow>().unwrap(), DistributionWindow::Open);
        assert!("gold".parse::<PricingTier>().is_err());
    }
}
