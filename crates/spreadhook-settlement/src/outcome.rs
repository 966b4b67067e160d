//! What an invocation reports back to the host.

use std::fmt;

use serde::Serialize;
use spreadhook_types::{CorrelationId, TxType};

use crate::emitter::EmissionReceipt;

/// Which transition ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Burn,
    EscrowOpen,
    EscrowCancel,
    EscrowFinish,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Burn => write!(f, "BURN"),
            Self::EscrowOpen => write!(f, "ESCROW_OPEN"),
            Self::EscrowCancel => write!(f, "ESCROW_CANCEL"),
            Self::EscrowFinish => write!(f, "ESCROW_FINISH"),
        }
    }
}

/// A completed settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowReport {
    pub flow: Flow,
    pub correlation_id: CorrelationId,
    pub receipt: EmissionReceipt,
    /// Diagnostic value: the principal amount processed, in drops.
    pub trace: u64,
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Settled(FlowReport),
    /// Transaction type this flow does not handle. Accepted without effect.
    Ignored(TxType),
}

impl HookOutcome {
    /// Status reported to the host. Success is always `0`.
    #[must_use]
    pub fn status(&self) -> i64 {
        0
    }

    #[must_use]
    pub fn trace(&self) -> u64 {
        match self {
            Self::Settled(report) => report.trace,
            Self::Ignored(_) => 0,
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&FlowReport> {
        match self {
            Self::Settled(report) => Some(report),
            Self::Ignored(_) => None,
        }
    }
}
