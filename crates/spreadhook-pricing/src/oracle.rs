//! Spot-rate sampling from AMM pool reserves.
//!
//! A single point-in-time read: no staleness window and no averaging. The
//! only protection against the pool moving between sampling and execution
//! is the slippage bound applied to the trade.

use spreadhook_types::constants::SCALE;
use spreadhook_types::{Asset, HookError, Rate, Result};

/// Reserve pair of a pool, oriented as requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateSample {
    pub base_reserve: u64,
    pub quote_reserve: u64,
}

impl RateSample {
    #[must_use]
    pub fn new(base_reserve: u64, quote_reserve: u64) -> Self {
        Self {
            base_reserve,
            quote_reserve,
        }
    }

    /// `quote_reserve × SCALE / base_reserve`. `None` when the base side is
    /// empty or the result overflows `u64`.
    #[must_use]
    pub fn mid_price(&self) -> Option<Rate> {
        if self.base_reserve == 0 {
            return None;
        }
        let wide =
            u128::from(self.quote_reserve) * u128::from(SCALE) / u128::from(self.base_reserve);
        u64::try_from(wide).ok().map(Rate::from_scaled)
    }

    /// The same pool seen from the other side.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self::new(self.quote_reserve, self.base_reserve)
    }
}

/// Read-only pool reserve lookup supplied by the host ledger.
pub trait PoolSource {
    /// Current reserves of the pool trading `base` against `quote`, with
    /// `base_reserve` on the `base` side. `None` when no such pool exists.
    fn pool_reserves(&self, base: &Asset, quote: &Asset) -> Option<RateSample>;
}

/// Price of one `base` unit in `quote`, scaled by [`SCALE`].
///
/// # Errors
/// - [`HookError::PoolNotFound`] when the pool is absent
/// - [`HookError::ZeroReserve`] when either reserve is empty (the price is
///   undefined or zero, and zero cannot be divided by downstream)
/// - [`HookError::Overflow`] when the price exceeds `u64`
pub fn get_rate<P: PoolSource + ?Sized>(pools: &P, base: &Asset, quote: &Asset) -> Result<Rate> {
    let sample = pools
        .pool_reserves(base, quote)
        .ok_or_else(|| HookError::PoolNotFound {
            base: base.to_string(),
            quote: quote.to_string(),
        })?;

    if sample.base_reserve == 0 || sample.quote_reserve == 0 {
        return Err(HookError::ZeroReserve {
            base: base.to_string(),
            quote: quote.to_string(),
        });
    }

    let rate = sample.mid_price().ok_or(HookError::Overflow {
        context: "pool mid-price",
    })?;
    if rate.is_zero() {
        return Err(HookError::ZeroReserve {
            base: base.to_string(),
            quote: quote.to_string(),
        });
    }

    tracing::debug!(
        base = %base,
        quote = %quote,
        base_reserve = sample.base_reserve,
        quote_reserve = sample.quote_reserve,
        rate = %rate,
        "Pool rate sampled"
    );
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use spreadhook_types::AccountId;

    use super::*;

    struct Pools(HashMap<(Asset, Asset), RateSample>);

    impl PoolSource for Pools {
        fn pool_reserves(&self, base: &Asset, quote: &Asset) -> Option<RateSample> {
            self.0.get(&(base.clone(), quote.clone())).copied()
        }
    }

    fn rlusd() -> Asset {
        Asset::issued("RLUSD", AccountId::random())
    }

    #[test]
    fn mid_price_is_quote_per_base() {
        assert_eq!(
            RateSample::new(1_000_000_000, 2_450_000_000).mid_price(),
            Some(Rate(2_450_000))
        );
        assert_eq!(RateSample::new(0, 5).mid_price(), None);
        assert_eq!(RateSample::new(4, 2).flipped(), RateSample::new(2, 4));
    }

    #[test]
    fn get_rate_reads_pool() {
        let quote = rlusd();
        let pools = Pools(HashMap::from([(
            (Asset::Native, quote.clone()),
            RateSample::new(10_000_000, 25_000_000),
        )]));
        let rate = get_rate(&pools, &Asset::Native, &quote).unwrap();
        assert_eq!(rate, Rate(2_500_000));
    }

    #[test]
    fn missing_pool_is_not_found() {
        let pools = Pools(HashMap::new());
        let err = get_rate(&pools, &Asset::Native, &rlusd()).unwrap_err();
        assert!(matches!(err, HookError::PoolNotFound { .. }));
    }

    #[test]
    fn zero_reserve_rejected() {
        let quote = rlusd();
        let pools = Pools(HashMap::from([(
            (Asset::Native, quote.clone()),
            RateSample::new(0, 25_000_000),
        )]));
        let err = get_rate(&pools, &Asset::Native, &quote).unwrap_err();
        assert!(matches!(err, HookError::ZeroReserve { .. }));
    }

    #[test]
    fn dust_price_rejected() {
        // 1 quote drop against a huge base side rounds to a zero price.
        let quote = rlusd();
        let pools = Pools(HashMap::from([(
            (Asset::Native, quote.clone()),
            RateSample::new(u64::MAX, 1),
        )]));
        let err = get_rate(&pools, &Asset::Native, &quote).unwrap_err();
        assert!(matches!(err, HookError::ZeroReserve { .. }));
    }
}
