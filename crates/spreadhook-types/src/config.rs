//! Configuration for the two hook flows.
//!
//! Every wallet, issuer, asset and tolerance is injected here; nothing in the
//! settlement code refers to a hardcoded address.

use chrono::TimeDelta;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BPS_DENOMINATOR, DEFAULT_ESCROW_TIMEOUT_SECS, DEFAULT_SLIPPAGE_BPS, MAX_ESCROW_TIMEOUT_SECS,
};
use crate::{AccountId, Asset, HookError, Result, units_to_drops};

fn default_slippage_bps() -> u16 {
    DEFAULT_SLIPPAGE_BPS
}

fn default_min_amount() -> Decimal {
    Decimal::new(1, 6)
}

fn default_escrow_timeout_secs() -> u64 {
    DEFAULT_ESCROW_TIMEOUT_SECS
}

fn validate_common(slippage_bps: u16, min_amount: Decimal) -> Result<()> {
    if slippage_bps == 0 || u64::from(slippage_bps) >= BPS_DENOMINATOR {
        return Err(HookError::Configuration(format!(
            "slippage_bps must be in 1..{BPS_DENOMINATOR}, got {slippage_bps}"
        )));
    }
    match units_to_drops(min_amount) {
        Some(drops) if drops > 0 => Ok(()),
        _ => Err(HookError::Configuration(format!(
            "min_amount must be at least one drop, got {min_amount}"
        ))),
    }
}

/// Burn flow: split each payment between a burn-asset purchase and the
/// platform wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadConfig {
    /// Asset bought with half of every payment and sent to `burn_sink`.
    pub burn_asset: Asset,
    /// Destination for purchased burn asset.
    pub burn_sink: AccountId,
    /// Receives the unconverted half.
    pub platform_wallet: AccountId,
    /// Payment currencies accepted. Each needs a pool against `burn_asset`.
    pub accepted: Vec<Asset>,
    /// Minimum payment, in whole units.
    #[serde(default = "default_min_amount")]
    pub min_amount: Decimal,
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
}

impl SpreadConfig {
    /// Minimum payment in drops. Call after [`validate`](Self::validate).
    #[must_use]
    pub fn min_amount_drops(&self) -> u64 {
        units_to_drops(self.min_amount).unwrap_or(u64::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        validate_common(self.slippage_bps, self.min_amount)?;
        if self.accepted.is_empty() {
            return Err(HookError::Configuration(
                "burn flow accepts no currencies".into(),
            ));
        }
        if self.accepted.contains(&self.burn_asset) {
            return Err(HookError::Configuration(format!(
                "burn asset {} cannot also be an accepted payment currency",
                self.burn_asset
            )));
        }
        Ok(())
    }
}

/// What Payment does when the correlation id already has an OPEN escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReopenPolicy {
    /// Refuse the second open.
    #[default]
    Reject,
    /// Overwrite the existing record.
    Overwrite,
}

/// Escrow flow: lock half native, half quote, settle with spread rules.
///
/// The open rate is persisted in a 4-byte slot of the escrow record, so the
/// native asset may be worth at most `u32::MAX / SCALE` (4294.967295) quote
/// units when an escrow opens. Above that, Payment fails with
/// [`HookError::RateOutOfRange`] before anything is emitted. Pick a quote
/// asset that keeps the pair below this ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Issued asset the native half is sold into (RLUSD).
    pub quote_asset: Asset,
    /// Receives swept spread.
    pub platform_wallet: AccountId,
    /// Minimum native payment, in whole units.
    #[serde(default = "default_min_amount")]
    pub min_amount: Decimal,
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
    #[serde(default = "default_escrow_timeout_secs")]
    pub escrow_timeout_secs: u64,
    #[serde(default)]
    pub reopen_policy: ReopenPolicy,
}

impl EscrowConfig {
    /// Minimum payment in drops. Call after [`validate`](Self::validate).
    #[must_use]
    pub fn min_amount_drops(&self) -> u64 {
        units_to_drops(self.min_amount).unwrap_or(u64::MAX)
    }

    /// Escrow lifetime.
    #[must_use]
    pub fn escrow_timeout(&self) -> TimeDelta {
        i64::try_from(self.escrow_timeout_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        validate_common(self.slippage_bps, self.min_amount)?;
        if self.quote_asset.is_native() {
            return Err(HookError::Configuration(
                "escrow quote asset must be an issued currency".into(),
            ));
        }
        if self.escrow_timeout_secs == 0 || self.escrow_timeout_secs > MAX_ESCROW_TIMEOUT_SECS {
            return Err(HookError::Configuration(format!(
                "escrow_timeout_secs must be in 1..={MAX_ESCROW_TIMEOUT_SECS}, got {}",
                self.escrow_timeout_secs
            )));
        }
        Ok(())
    }
}

/// Top-level configuration: which flow this deployment runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum HookConfig {
    Burn(SpreadConfig),
    Escrow(EscrowConfig),
}

impl HookConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Burn(cfg) => cfg.validate(),
            Self::Escrow(cfg) => cfg.validate(),
        }
    }
}
