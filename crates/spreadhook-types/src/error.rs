//! Error types for the spreadhook settlement core.
//!
//! All errors use the `SH_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by taxonomy:
//! - 1xx: Input validation (type, amount, memo)
//! - 2xx: Not found (record, pool, escrow)
//! - 3xx: Authorization and lifecycle conflicts
//! - 4xx: Arithmetic
//! - 5xx: Downstream (prepare / emit)
//! - 6xx: State store
//! - 9xx: Configuration / internal
//!
//! Every variant also maps to a distinct negative hook status through
//! [`HookError::status`]. Status `0` is reserved for success.

use std::fmt;

use thiserror::Error;

use crate::{AccountId, CorrelationId, Leg, Rate};

/// Memo decoding failures. Each variant has its own status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoError {
    #[error("memo undersized: {len} bytes, minimum {min}")]
    Undersized { len: usize, min: usize },

    #[error("memo oversized: {len} bytes, maximum {max}")]
    Oversized { len: usize, max: usize },

    /// A tag, quote or delimiter byte did not match the schema.
    #[error("memo byte mismatch at offset {offset}: expected {expected:?}")]
    Mismatch { offset: usize, expected: String },

    /// The input ended inside a field or before the closing delimiter.
    #[error("memo truncated in field `{field}`")]
    Truncated { field: &'static str },

    #[error("memo field `{field}` invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("memo has {count} trailing bytes")]
    TrailingBytes { count: usize },
}

impl MemoError {
    #[must_use]
    pub fn status(&self) -> i64 {
        match self {
            Self::Undersized { .. } => -10,
            Self::Oversized { .. } => -11,
            Self::Mismatch { .. } => -12,
            Self::Truncated { .. } => -13,
            Self::InvalidField { .. } => -14,
            Self::TrailingBytes { .. } => -15,
        }
    }
}

/// Failure reported by a host collaborator (prepare, emit, state write).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host call failed: {0}")]
pub struct HostError(pub String);

/// Taxonomy bucket of a [`HookError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InputValidation,
    NotFound,
    Unauthorized,
    Conflict,
    Arithmetic,
    Downstream,
    State,
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputValidation => write!(f, "INPUT_VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Arithmetic => write!(f, "ARITHMETIC"),
            Self::Downstream => write!(f, "DOWNSTREAM"),
            Self::State => write!(f, "STATE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// Central error enum for every hook invocation.
#[derive(Debug, Error)]
pub enum HookError {
    // =================================================================
    // Input Validation (1xx)
    // =================================================================
    /// A transaction field the flow needs was absent.
    #[error("SH_ERR_100: Transaction field missing: {field}")]
    TxFieldMissing { field: &'static str },

    #[error("SH_ERR_101: Amount too small: {amount} drops, minimum {minimum}")]
    AmountTooSmall { amount: u64, minimum: u64 },

    #[error("SH_ERR_102: Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    #[error("SH_ERR_103: Invalid memo: {0}")]
    Memo(#[from] MemoError),

    // =================================================================
    // Not Found (2xx)
    // =================================================================
    #[error("SH_ERR_200: No open escrow record for {0}")]
    RecordNotFound(CorrelationId),

    #[error("SH_ERR_201: No liquidity pool for {base}/{quote}")]
    PoolNotFound { base: String, quote: String },

    #[error("SH_ERR_202: Escrow object not found: {owner} #{sequence}")]
    EscrowNotFound { owner: AccountId, sequence: u32 },

    /// A persisted record no longer decodes.
    #[error("SH_ERR_203: Corrupt escrow record: {reason}")]
    CorruptRecord { reason: String },

    // =================================================================
    // Authorization / Conflict (3xx)
    // =================================================================
    #[error("SH_ERR_300: Unauthorized sender {actual}, expected {expected}")]
    Unauthorized {
        expected: AccountId,
        actual: AccountId,
    },

    /// Payment tried to open an escrow for an id that is already OPEN.
    #[error("SH_ERR_301: Escrow already open for {0}")]
    AlreadyOpen(CorrelationId),

    /// The referenced escrow is not held by the hook account.
    #[error("SH_ERR_302: Escrow {owner} #{sequence} is not owned by the hook account {hook}")]
    ForeignEscrow {
        owner: AccountId,
        sequence: u32,
        hook: AccountId,
    },

    /// The referenced escrow was opened for a different correlation id.
    #[error("SH_ERR_303: Escrow {owner} #{sequence} belongs to {actual}, not {expected}")]
    EscrowMismatch {
        owner: AccountId,
        sequence: u32,
        expected: CorrelationId,
        actual: CorrelationId,
    },

    // =================================================================
    // Arithmetic (4xx)
    // =================================================================
    #[error("SH_ERR_400: Zero reserve in pool {base}/{quote}")]
    ZeroReserve { base: String, quote: String },

    #[error("SH_ERR_401: Arithmetic overflow computing {context}")]
    Overflow { context: &'static str },

    /// The open rate cannot be stored in the record's rate slot.
    #[error("SH_ERR_402: Rate {0} out of range for record")]
    RateOutOfRange(Rate),

    // =================================================================
    // Downstream (5xx)
    // =================================================================
    #[error("SH_ERR_500: Failed to prepare {leg} transaction: {source}")]
    PrepareFailed {
        leg: Leg,
        #[source]
        source: HostError,
    },

    #[error("SH_ERR_501: Failed to emit {leg} transaction: {source}")]
    EmitFailed {
        leg: Leg,
        #[source]
        source: HostError,
    },

    #[error("SH_ERR_502: Prepared {leg} transaction is {len} bytes, maximum {max}")]
    TxBufferOverflow { leg: Leg, len: usize, max: usize },

    #[error("SH_ERR_503: Emission plan full ({max} transactions)")]
    PlanFull { max: usize },

    // =================================================================
    // State (6xx)
    // =================================================================
    #[error("SH_ERR_600: State write failed: {0}")]
    StateWrite(#[source] HostError),

    #[error("SH_ERR_601: State value too large: {len} bytes, maximum {max}")]
    StateValueTooLarge { len: usize, max: usize },

    // =================================================================
    // Configuration / Internal (9xx)
    // =================================================================
    #[error("SH_ERR_900: Configuration error: {0}")]
    Configuration(String),

    #[error("SH_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

impl HookError {
    /// Distinct negative status for this failure branch.
    #[must_use]
    pub fn status(&self) -> i64 {
        match self {
            Self::TxFieldMissing { .. } => -1,
            Self::AmountTooSmall { .. } => -2,
            Self::UnsupportedCurrency { .. } => -3,
            Self::Memo(e) => e.status(),
            Self::RecordNotFound(_) => -20,
            Self::PoolNotFound { .. } => -21,
            Self::EscrowNotFound { .. } => -22,
            Self::CorruptRecord { .. } => -23,
            Self::Unauthorized { .. } => -30,
            Self::AlreadyOpen(_) => -31,
            Self::ForeignEscrow { .. } => -32,
            Self::EscrowMismatch { .. } => -33,
            Self::ZeroReserve { .. } => -40,
            Self::Overflow { .. } => -41,
            Self::RateOutOfRange(_) => -42,
            Self::PrepareFailed { leg, .. } => -50 - leg.ordinal(),
            Self::EmitFailed { leg, .. } => -60 - leg.ordinal(),
            Self::TxBufferOverflow { leg, .. } => -70 - leg.ordinal(),
            Self::PlanFull { .. } => -79,
            Self::StateWrite(_) => -80,
            Self::StateValueTooLarge { .. } => -81,
            Self::Configuration(_) => -90,
            Self::Serialization(_) => -91,
        }
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TxFieldMissing { .. }
            | Self::AmountTooSmall { .. }
            | Self::UnsupportedCurrency { .. }
            | Self::Memo(_) => ErrorCategory::InputValidation,
            Self::RecordNotFound(_)
            | Self::PoolNotFound { .. }
            | Self::EscrowNotFound { .. }
            | Self::CorruptRecord { .. } => ErrorCategory::NotFound,
            Self::Unauthorized { .. }
            | Self::ForeignEscrow { .. }
            | Self::EscrowMismatch { .. } => ErrorCategory::Unauthorized,
            Self::AlreadyOpen(_) => ErrorCategory::Conflict,
            Self::ZeroReserve { .. } | Self::Overflow { .. } | Self::RateOutOfRange(_) => {
                ErrorCategory::Arithmetic
            }
            Self::PrepareFailed { .. }
            | Self::EmitFailed { .. }
            | Self::TxBufferOverflow { .. }
            | Self::PlanFull { .. } => ErrorCategory::Downstream,
            Self::StateWrite(_) | Self::StateValueTooLarge { .. } => ErrorCategory::State,
            Self::Configuration(_) | Self::Serialization(_) => ErrorCategory::Configuration,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, HookError>;

impl From<serde_json::Error> for HookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
