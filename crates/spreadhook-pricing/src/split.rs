//! Payment splits for the two flows.

use spreadhook_types::constants::SCALE;
use spreadhook_types::{Rate, Result};

use crate::math::mul_div;

/// Burn-flow split of an incoming payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnSplit {
    /// Half of the payment, sold for the burn asset.
    pub convert: u64,
    /// Burn asset expected from selling `convert` at the sampled rate.
    pub burn_out: u64,
    /// The other half, forwarded to the platform in the original currency.
    pub platform: u64,
}

impl BurnSplit {
    /// Split `amount` 50/50. `rate` is the price of one burn-asset unit in
    /// the payment currency, so `burn_out = convert × SCALE / rate`.
    ///
    /// Odd amounts put the extra drop on the platform side; nothing is lost.
    pub fn compute(amount: u64, rate: Rate) -> Result<Self> {
        let convert = amount / 2;
        let burn_out = mul_div(convert, SCALE, rate.scaled(), "burn conversion")?;
        Ok(Self {
            convert,
            burn_out,
            platform: amount - convert,
        })
    }

    /// Smallest payment whose converted half buys at least one drop of the
    /// burn asset at `rate`.
    #[must_use]
    pub fn min_amount(rate: Rate) -> u64 {
        rate.scaled().div_ceil(SCALE).max(1).saturating_mul(2)
    }

    /// Either planned transfer would move zero drops.
    #[must_use]
    pub fn is_dust(&self) -> bool {
        self.convert == 0 || self.burn_out == 0
    }
}

/// Escrow-open split of a native payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowOpenSplit {
    /// Native half sold into the quote asset.
    pub sell: u64,
    /// Quote expected from the sale at the open rate.
    pub quote_out: u64,
    /// Native half kept for the escrow.
    pub native_kept: u64,
}

impl EscrowOpenSplit {
    /// `rate` is quote per native unit.
    pub fn compute(amount: u64, rate: Rate) -> Result<Self> {
        let sell = amount / 2;
        let quote_out = mul_div(sell, rate.scaled(), SCALE, "escrow quote leg")?;
        Ok(Self {
            sell,
            quote_out,
            native_kept: amount - sell,
        })
    }

    /// Smallest payment whose sold half yields at least one quote drop at
    /// `rate`.
    #[must_use]
    pub fn min_amount(rate: Rate) -> u64 {
        SCALE
            .div_ceil(rate.scaled().max(1))
            .max(1)
            .saturating_mul(2)
    }

    /// The sale or the locked quote leg would be zero drops.
    #[must_use]
    pub fn is_dust(&self) -> bool {
        self.sell == 0 || self.quote_out == 0
    }
}
