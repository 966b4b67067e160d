//! Transaction-level types: inbound type dispatch, escrow references, and
//! the downstream intents the core asks the host to build and emit.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, Asset, CorrelationId};

/// Inbound transaction types the hook dispatches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    Payment,
    EscrowCancel,
    EscrowFinish,
    /// Anything else. Dispatch treats it as a no-op success.
    Other(String),
}

impl FromStr for TxType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "Payment" => Self::Payment,
            "EscrowCancel" => Self::EscrowCancel,
            "EscrowFinish" => Self::EscrowFinish,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payment => write!(f, "Payment"),
            Self::EscrowCancel => write!(f, "EscrowCancel"),
            Self::EscrowFinish => write!(f, "EscrowFinish"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Identifies a live escrow object: its owner and the sequence of the
/// transaction that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EscrowRef {
    pub owner: AccountId,
    pub sequence: u32,
}

/// Balances held by a live escrow object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowLegs {
    /// Native leg, in drops.
    pub native: u64,
    /// Quote (RLUSD) leg, in drops.
    pub quote: u64,
}

/// A live escrow object as the ledger reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEscrow {
    pub legs: EscrowLegs,
    /// Correlation id the escrow was created with.
    pub correlation_id: CorrelationId,
}

/// Which downstream leg a transaction belongs to. Failure statuses are
/// derived from this so every failure branch is distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    /// Slippage-bounded AMM conversion.
    Conversion,
    /// Converted burn asset sent to the burn sink.
    Burn,
    /// Unconverted half sent to the platform wallet.
    Platform,
    /// Time-locked escrow holding both legs.
    EscrowLock,
    /// Proceeds to the refund_to / pay_to counterparty.
    Payout,
    /// Appreciation swept to the platform wallet.
    Sweep,
}

impl Leg {
    /// Zero-based ordinal used in status derivation.
    #[must_use]
    pub fn ordinal(self) -> i64 {
        match self {
            Self::Conversion => 0,
            Self::Burn => 1,
            Self::Platform => 2,
            Self::EscrowLock => 3,
            Self::Payout => 4,
            Self::Sweep => 5,
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conversion => write!(f, "CONVERSION"),
            Self::Burn => write!(f, "BURN"),
            Self::Platform => write!(f, "PLATFORM"),
            Self::EscrowLock => write!(f, "ESCROW_LOCK"),
            Self::Payout => write!(f, "PAYOUT"),
            Self::Sweep => write!(f, "SWEEP"),
        }
    }
}

/// Sell `sell` into the pool for `buy`, accepting no less than `min_out`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub sell: Amount,
    pub buy: Asset,
    /// Output expected at the sampled rate.
    pub expected_out: u64,
    /// `expected_out` less the slippage tolerance.
    pub min_out: u64,
    pub slippage_bps: u16,
}

/// Direct payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub destination: AccountId,
    pub amount: Amount,
}

/// Time-locked escrow holding a native and a quote leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowCreateIntent {
    pub native: u64,
    pub quote: Amount,
    pub cancel_after: DateTime<Utc>,
    pub correlation_id: CorrelationId,
}

/// A downstream transaction the core wants emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxIntent {
    Trade(TradeIntent),
    Payment(PaymentIntent),
    EscrowCreate(EscrowCreateIntent),
}

impl TxIntent {
    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Trade(_) => "trade",
            Self::Payment(_) => "payment",
            Self::EscrowCreate(_) => "escrow_create",
        }
    }
}

/// An intent tagged with the leg it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTx {
    pub leg: Leg,
    pub intent: TxIntent,
}

/// Host-serialized transaction blob, ready to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTx {
    pub leg: Leg,
    pub blob: Vec<u8>,
}
