//! Asset and amount types.
//!
//! All amounts are integer drops (6 implied decimals). The core never sees a
//! ledger's binary amount encoding; the host adapter converts at the edge.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::AccountId;
use crate::constants::DROPS_PER_UNIT;

const DROPS_DECIMALS: u32 = 6;

/// An asset the core can hold, trade or pay out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Asset {
    /// The ledger's native asset.
    Native,
    /// An issued currency (e.g. RLUSD) identified by code and issuer.
    Issued { currency: String, issuer: AccountId },
}

impl Asset {
    /// Convenience constructor for an issued asset.
    #[must_use]
    pub fn issued(currency: &str, issuer: AccountId) -> Self {
        Self::Issued {
            currency: currency.to_string(),
            issuer,
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Currency code as shown in logs.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Native => "XRP",
            Self::Issued { currency, .. } => currency,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "XRP"),
            Self::Issued { currency, issuer } => write!(f, "{currency}.{}", issuer.short()),
        }
    }
}

/// A quantity of a specific asset, in drops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub asset: Asset,
    pub drops: u64,
}

impl Amount {
    #[must_use]
    pub fn new(asset: Asset, drops: u64) -> Self {
        Self { asset, drops }
    }

    #[must_use]
    pub fn native(drops: u64) -> Self {
        Self::new(Asset::Native, drops)
    }

    /// Whole-unit view for logs.
    #[must_use]
    pub fn as_units(&self) -> Decimal {
        drops_to_units(self.drops)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_units(), self.asset)
    }
}

/// Convert a whole-unit decimal into drops, truncating sub-drop precision.
/// Returns `None` for negative values or values beyond `u64`.
#[must_use]
pub fn units_to_drops(units: Decimal) -> Option<u64> {
    if units.is_sign_negative() {
        return None;
    }
    units
        .checked_mul(Decimal::from(DROPS_PER_UNIT))?
        .trunc()
        .to_u64()
}

/// Whole-unit view of a drop count.
#[must_use]
pub fn drops_to_units(drops: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(drops), DROPS_DECIMALS).normalize()
}
