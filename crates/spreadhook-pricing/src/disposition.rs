//! Escrow settlement disposition.
//!
//! Given the live escrow legs, the rate stored at open, and a fresh rate,
//! decide what the counterparty receives and what is swept to the platform.
//!
//! ```text
//!   native_now    = native × current_rate / SCALE
//!   native_open   = native × open_rate    / SCALE
//!   current_value = native_now  + quote
//!   locked_value  = native_open + quote
//!
//!   native_now <  locked_value  →  RefundNative: native leg as-is,
//!                                  sweep max(current − locked, 0) in quote
//!   native_now >= locked_value  →  PayLocked: convert native leg to quote,
//!                                  pay locked_value, sweep current − locked
//! ```
//!
//! Appreciation past the open-time value goes to the platform; depreciation
//! is passed through to the counterparty. Cancel and Finish share these
//! rules and differ only in who receives the payout.

use spreadhook_types::constants::SCALE;
use spreadhook_types::{EscrowLegs, Rate, Result};

use crate::math::{add, mul_div};

/// Transient valuation of an escrow at settlement time. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDisposition {
    pub legs: EscrowLegs,
    /// Native leg valued at the current rate, in quote drops.
    pub native_now: u64,
    /// Native leg valued at the open rate, in quote drops.
    pub native_open: u64,
    pub current_value: u64,
    pub locked_value: u64,
}

impl PendingDisposition {
    pub fn value(legs: EscrowLegs, open_rate: Rate, current_rate: Rate) -> Result<Self> {
        let native_now = mul_div(legs.native, current_rate.scaled(), SCALE, "native value now")?;
        let native_open = mul_div(legs.native, open_rate.scaled(), SCALE, "native value at open")?;
        Ok(Self {
            legs,
            native_now,
            native_open,
            current_value: add(native_now, legs.quote, "current value")?,
            locked_value: add(native_open, legs.quote, "locked value")?,
        })
    }

    /// `current_value − locked_value`, floored at zero.
    #[must_use]
    pub fn spread(&self) -> u64 {
        self.current_value.saturating_sub(self.locked_value)
    }

    /// Apply the settlement rules.
    #[must_use]
    pub fn decide(&self) -> Disposition {
        if self.native_now < self.locked_value {
            Disposition::RefundNative {
                native: self.legs.native,
                sweep: self.spread(),
            }
        } else {
            Disposition::PayLocked {
                convert_native: self.legs.native,
                convert_expected: self.native_now,
                payout: self.locked_value,
                sweep: self.spread(),
            }
        }
    }
}

/// Outcome of [`PendingDisposition::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Native leg paid out unchanged; spread (if any) swept in quote.
    RefundNative { native: u64, sweep: u64 },
    /// Native leg converted to quote; locked value paid out in quote,
    /// everything above it swept.
    PayLocked {
        convert_native: u64,
        convert_expected: u64,
        payout: u64,
        sweep: u64,
    },
}

impl Disposition {
    #[must_use]
    pub fn sweep(&self) -> u64 {
        match self {
            Self::RefundNative { sweep, .. } | Self::PayLocked { sweep, .. } => *sweep,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::RefundNative { .. } => "refund_native",
            Self::PayLocked { .. } => "pay_locked",
        }
    }
}
