//! Slippage bounds.

use spreadhook_types::constants::BPS_DENOMINATOR;

/// Minimum acceptable output for a trade expected to yield `expected`,
/// tolerating `slippage_bps` of adverse movement. Rounds down.
#[must_use]
pub fn min_out(expected: u64, slippage_bps: u16) -> u64 {
    let keep = BPS_DENOMINATOR.saturating_sub(u64::from(slippage_bps));
    let wide = u128::from(expected) * u128::from(keep) / u128::from(BPS_DENOMINATOR);
    // keep <= BPS_DENOMINATOR, so the result never exceeds `expected`.
    u64::try_from(wide).unwrap_or(expected)
}
