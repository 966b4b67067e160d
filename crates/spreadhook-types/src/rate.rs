//! Fixed-point exchange rate.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price of one base unit in quote units, scaled by
/// [`SCALE`](crate::constants::SCALE) (6 decimal places).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rate(pub u64);

impl Rate {
    #[must_use]
    pub fn from_scaled(scaled: u64) -> Self {
        Self(scaled)
    }

    #[must_use]
    pub fn scaled(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Human-readable decimal value.
    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), 6).normalize()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_display_is_decimal() {
        assert_eq!(Rate(2_000_000).to_string(), "2");
        assert_eq!(Rate(2_450_000).to_string(), "2.45");
        assert_eq!(Rate(1).to_string(), "0.000001");
    }
}
