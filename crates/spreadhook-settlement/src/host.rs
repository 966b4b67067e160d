//! Host ledger collaborators.
//!
//! The core treats every ledger primitive as an opaque synchronous call that
//! either returns immediately or fails. No retries, no suspension.

use spreadhook_pricing::PoolSource;
use spreadhook_types::{AccountId, EscrowRef, HostError, LiveEscrow, PlannedTx, PreparedTx};

/// Ledger primitives consumed by the settlement flows.
pub trait Ledger: PoolSource {
    /// Account the hook runs on. Escrows it creates are owned by it.
    fn hook_account(&self) -> AccountId;

    /// Balances and correlation id of a live escrow object, or `None` if it
    /// does not exist.
    fn live_escrow(&self, escrow: &EscrowRef) -> Option<LiveEscrow>;

    /// Serialize a downstream transaction. Nothing is submitted yet.
    fn prepare(&mut self, planned: &PlannedTx) -> Result<Vec<u8>, HostError>;

    /// Submit a prepared transaction. Fire-and-forget: success means the
    /// host accepted it for emission, not that it applied.
    fn emit(&mut self, tx: &PreparedTx) -> Result<(), HostError>;
}
