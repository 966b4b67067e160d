//! Checked fixed-point helpers.

use spreadhook_types::{HookError, Result};

/// `a * b / d` with a `u128` intermediate, truncating.
///
/// # Errors
/// [`HookError::Overflow`] when `d` is zero or the result exceeds `u64`.
pub fn mul_div(a: u64, b: u64, d: u64, context: &'static str) -> Result<u64> {
    if d == 0 {
        return Err(HookError::Overflow { context });
    }
    let wide = u128::from(a) * u128::from(b) / u128::from(d);
    u64::try_from(wide).map_err(|_| HookError::Overflow { context })
}

/// Checked addition with context.
pub fn add(a: u64, b: u64, context: &'static str) -> Result<u64> {
    a.checked_add(b).ok_or(HookError::Overflow { context })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_uses_wide_intermediate() {
        assert_eq!(mul_div(u64::MAX, 2, 4, "t").unwrap(), u64::MAX / 2);
        assert_eq!(mul_div(500_000, 1_000_000, 2_000_000, "t").unwrap(), 250_000);
    }

    #[test]
    fn mul_div_reports_overflow_and_zero_divisor() {
        assert!(matches!(
            mul_div(u64::MAX, u64::MAX, 1, "t"),
            Err(HookError::Overflow { context: "t" })
        ));
        assert!(mul_div(1, 1, 0, "t").is_err());
        assert!(add(u64::MAX, 1, "t").is_err());
    }
}
