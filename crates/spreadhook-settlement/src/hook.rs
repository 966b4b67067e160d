//! Hook entry point: type dispatch and status mapping.

use spreadhook_ingress::InboundTx;
use spreadhook_types::{HookConfig, Result, TxType};

use crate::burn::SpreadSettlement;
use crate::escrow::EscrowChoreography;
use crate::host::Ledger;
use crate::outcome::HookOutcome;
use crate::state::StateStore;

/// One deployed flow.
#[derive(Debug)]
pub enum SettlementHook {
    Burn(SpreadSettlement),
    Escrow(EscrowChoreography),
}

impl SettlementHook {
    /// Build the flow named by `config`.
    ///
    /// # Errors
    /// [`HookError::Configuration`](spreadhook_types::HookError::Configuration)
    /// when the config does not validate.
    pub fn from_config(config: HookConfig) -> Result<Self> {
        Ok(match config {
            HookConfig::Burn(cfg) => Self::Burn(SpreadSettlement::new(cfg)?),
            HookConfig::Escrow(cfg) => Self::Escrow(EscrowChoreography::new(cfg)?),
        })
    }

    /// Handle one triggering transaction.
    ///
    /// Transaction types the flow does not handle succeed as
    /// [`HookOutcome::Ignored`] without touching the ledger or state.
    pub fn invoke<L, S>(&self, tx: &InboundTx, ledger: &mut L, state: &mut S) -> Result<HookOutcome>
    where
        L: Ledger + ?Sized,
        S: StateStore + ?Sized,
    {
        let report = match (self, &tx.tx_type) {
            (Self::Burn(flow), TxType::Payment) => flow.on_payment(tx, ledger, state)?,
            (Self::Escrow(flow), TxType::Payment) => flow.on_payment(tx, ledger, state)?,
            (Self::Escrow(flow), TxType::EscrowCancel) => flow.on_cancel(tx, ledger, state)?,
            (Self::Escrow(flow), TxType::EscrowFinish) => flow.on_finish(tx, ledger, state)?,
            (_, other) => {
                tracing::debug!(tx_type = %other, "Transaction type not handled, accepting");
                return Ok(HookOutcome::Ignored(other.clone()));
            }
        };
        Ok(HookOutcome::Settled(report))
    }

    /// [`invoke`](Self::invoke), reduced to the host status: `0` on success,
    /// the error's distinct negative status otherwise.
    pub fn run<L, S>(&self, tx: &InboundTx, ledger: &mut L, state: &mut S) -> i64
    where
        L: Ledger + ?Sized,
        S: StateStore + ?Sized,
    {
        match self.invoke(tx, ledger, state) {
            Ok(outcome) => outcome.status(),
            Err(err) => {
                tracing::warn!(
                    tx_type = %tx.tx_type,
                    account = %tx.account,
                    status = err.status(),
                    category = %err.category(),
                    error = %err,
                    "Transaction rejected"
                );
                err.status()
            }
        }
    }
}
