//! The triggering transaction as the core sees it.
//!
//! The host adapter reads type, sender, amount, memo and escrow reference
//! through its accessor calls and hands them over in one [`InboundTx`].
//! Fields a flow needs but the transaction lacks surface as
//! [`HookError::TxFieldMissing`].

use chrono::{DateTime, Utc};
use spreadhook_types::{AccountId, Amount, EscrowRef, HookError, Result, TxType};

/// Accessor view of the transaction that triggered the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundTx {
    pub tx_type: TxType,
    /// Sending account.
    pub account: AccountId,
    pub amount: Option<Amount>,
    /// Raw memo bytes, undecoded.
    pub memo: Option<Vec<u8>>,
    /// Escrow targeted by EscrowCancel / EscrowFinish.
    pub escrow: Option<EscrowRef>,
    /// Close time of the ledger applying this transaction.
    pub ledger_time: DateTime<Utc>,
}

impl InboundTx {
    #[must_use]
    pub fn payment(
        account: AccountId,
        amount: Amount,
        memo: Vec<u8>,
        ledger_time: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_type: TxType::Payment,
            account,
            amount: Some(amount),
            memo: Some(memo),
            escrow: None,
            ledger_time,
        }
    }

    #[must_use]
    pub fn escrow_cancel(
        account: AccountId,
        escrow: EscrowRef,
        memo: Vec<u8>,
        ledger_time: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_type: TxType::EscrowCancel,
            account,
            amount: None,
            memo: Some(memo),
            escrow: Some(escrow),
            ledger_time,
        }
    }

    #[must_use]
    pub fn escrow_finish(
        account: AccountId,
        escrow: EscrowRef,
        memo: Vec<u8>,
        ledger_time: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_type: TxType::EscrowFinish,
            ..Self::escrow_cancel(account, escrow, memo, ledger_time)
        }
    }

    pub fn require_amount(&self) -> Result<&Amount> {
        self.amount
            .as_ref()
            .ok_or(HookError::TxFieldMissing { field: "amount" })
    }

    pub fn require_memo(&self) -> Result<&[u8]> {
        self.memo
            .as_deref()
            .ok_or(HookError::TxFieldMissing { field: "memo" })
    }

    pub fn require_escrow(&self) -> Result<EscrowRef> {
        self.escrow
            .ok_or(HookError::TxFieldMissing { field: "escrow" })
    }
}
