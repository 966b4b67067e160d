//! Payment gate: minimum amount and accepted-currency checks.
//!
//! Runs before any state read or rate query, so a rejected payment never
//! causes a downstream emission.

use spreadhook_types::{Amount, Asset, HookError, Result};

/// Admission checks for an incoming payment.
#[derive(Debug, Clone)]
pub struct PaymentGate {
    /// Minimum payment, in drops.
    minimum: u64,
    /// Currencies this flow handles.
    accepted: Vec<Asset>,
}

impl PaymentGate {
    #[must_use]
    pub fn new(minimum: u64, accepted: Vec<Asset>) -> Self {
        Self { minimum, accepted }
    }

    #[must_use]
    pub fn minimum(&self) -> u64 {
        self.minimum
    }

    /// Reject payments below the configured minimum.
    pub fn check_minimum(&self, amount: &Amount) -> Result<()> {
        if amount.drops < self.minimum {
            tracing::debug!(
                amount = amount.drops,
                minimum = self.minimum,
                "Payment below minimum"
            );
            return Err(HookError::AmountTooSmall {
                amount: amount.drops,
                minimum: self.minimum,
            });
        }
        Ok(())
    }

    /// Return the accepted asset matching the payment, or reject it.
    pub fn check_currency<'a>(&'a self, amount: &Amount) -> Result<&'a Asset> {
        self.accepted
            .iter()
            .find(|asset| **asset == amount.asset)
            .ok_or_else(|| HookError::UnsupportedCurrency {
                currency: amount.asset.to_string(),
            })
    }
}
