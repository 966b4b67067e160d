//! Escrow choreography.
//!
//! ```text
//!   NONE ──Payment──▶ OPEN ──EscrowCancel (refund_to)──▶ (record deleted)
//!                          └─EscrowFinish (pay_to)─────▶ (record deleted)
//! ```
//!
//! Payment sells half of a native payment into the quote asset and locks
//! the rest plus the proceeds in a time-locked escrow, recording the rate it
//! opened at. Cancel and Finish revalue the escrow at the current rate,
//! apply [`Disposition`] and pay the counterparty; they differ only in who
//! may send them and who is paid. The referenced escrow must be owned by the
//! hook account and carry the same correlation id as the record. The record
//! is deleted only after every settlement transaction has been emitted.

use spreadhook_ingress::{InboundTx, PaymentGate, decode_escrow_memo, decode_id_memo};
use spreadhook_pricing::{Disposition, EscrowOpenSplit, PendingDisposition, get_rate, min_out};
use spreadhook_types::{
    AccountId, Amount, Asset, EscrowConfig, EscrowCreateIntent, EscrowRecord, HookError, Leg,
    PaymentIntent, ReopenPolicy, Result, TradeIntent, TxIntent,
};

use crate::emitter::{EmissionPlan, TxEmitter};
use crate::host::Ledger;
use crate::outcome::{Flow, FlowReport};
use crate::state::{self, StateStore};

/// Which settlement transaction is being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Cancel,
    Finish,
}

impl Side {
    fn counterparty(self, record: &EscrowRecord) -> AccountId {
        match self {
            Self::Cancel => record.refund_to,
            Self::Finish => record.pay_to,
        }
    }

    fn flow(self) -> Flow {
        match self {
            Self::Cancel => Flow::EscrowCancel,
            Self::Finish => Flow::EscrowFinish,
        }
    }
}

/// Escrow-flow handler.
#[derive(Debug)]
pub struct EscrowChoreography {
    config: EscrowConfig,
    gate: PaymentGate,
}

impl EscrowChoreography {
    /// # Errors
    /// [`HookError::Configuration`] when `config` does not validate.
    pub fn new(config: EscrowConfig) -> Result<Self> {
        config.validate()?;
        let gate = PaymentGate::new(config.min_amount_drops(), vec![Asset::Native]);
        Ok(Self { config, gate })
    }

    #[must_use]
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// Open an escrow: NONE → OPEN.
    ///
    /// # Errors
    /// - [`HookError::AmountTooSmall`], memo errors, [`HookError::UnsupportedCurrency`]
    /// - [`HookError::AlreadyOpen`] when the id is OPEN and re-opens are rejected
    /// - oracle, arithmetic, downstream and state errors
    pub fn on_payment<L, S>(&self, tx: &InboundTx, ledger: &mut L, state: &mut S) -> Result<FlowReport>
    where
        L: Ledger + ?Sized,
        S: StateStore + ?Sized,
    {
        let amount = tx.require_amount()?;
        self.gate.check_minimum(amount)?;
        let memo = decode_escrow_memo(tx.require_memo()?)?;
        self.gate.check_currency(amount)?;

        if state::contains(state, &memo.id) {
            match self.config.reopen_policy {
                ReopenPolicy::Reject => return Err(HookError::AlreadyOpen(memo.id)),
                ReopenPolicy::Overwrite => {
                    tracing::warn!(correlation_id = %memo.id, "Overwriting OPEN escrow record");
                }
            }
        }

        let quote = &self.config.quote_asset;
        let rate = get_rate(&*ledger, &Asset::Native, quote)?;
        let split = EscrowOpenSplit::compute(amount.drops, rate)?;
        if split.is_dust() {
            return Err(HookError::AmountTooSmall {
                amount: amount.drops,
                minimum: EscrowOpenSplit::min_amount(rate).max(self.gate.minimum()),
            });
        }

        let record = EscrowRecord {
            refund_to: memo.refund_to,
            pay_to: memo.pay_to,
            correlation_id: memo.id,
            open_rate: rate,
        };
        // Fail on an unrepresentable rate before anything is emitted.
        record.to_bytes()?;

        let cancel_after = tx
            .ledger_time
            .checked_add_signed(self.config.escrow_timeout())
            .ok_or(HookError::Overflow {
                context: "escrow cancel_after",
            })?;

        tracing::debug!(
            correlation_id = %memo.id,
            rate = %rate,
            sell = split.sell,
            quote_out = split.quote_out,
            native_kept = split.native_kept,
            %cancel_after,
            "Escrow open planned"
        );

        let mut plan = EmissionPlan::new();
        plan.push(
            Leg::Conversion,
            TxIntent::Trade(TradeIntent {
                sell: Amount::native(split.sell),
                buy: quote.clone(),
                expected_out: split.quote_out,
                min_out: min_out(split.quote_out, self.config.slippage_bps),
                slippage_bps: self.config.slippage_bps,
            }),
        )?;
        plan.push(
            Leg::EscrowLock,
            TxIntent::EscrowCreate(EscrowCreateIntent {
                native: split.native_kept,
                quote: Amount::new(quote.clone(), split.quote_out),
                cancel_after,
                correlation_id: memo.id,
            }),
        )?;

        let receipt = TxEmitter::new(ledger).submit(&plan)?;
        state::save_escrow(state, &record)?;

        tracing::info!(
            correlation_id = %memo.id,
            refund_to = %record.refund_to,
            pay_to = %record.pay_to,
            open_rate = %rate,
            native = split.native_kept,
            quote = split.quote_out,
            "Escrow opened"
        );

        Ok(FlowReport {
            flow: Flow::EscrowOpen,
            correlation_id: memo.id,
            receipt,
            trace: amount.drops,
        })
    }

    /// Unwind an escrow to `refund_to`. Only `refund_to` may send it.
    pub fn on_cancel<L, S>(&self, tx: &InboundTx, ledger: &mut L, state: &mut S) -> Result<FlowReport>
    where
        L: Ledger + ?Sized,
        S: StateStore + ?Sized,
    {
        self.settle(Side::Cancel, tx, ledger, state)
    }

    /// Settle an escrow to `pay_to`. Only `pay_to` may send it.
    pub fn on_finish<L, S>(&self, tx: &InboundTx, ledger: &mut L, state: &mut S) -> Result<FlowReport>
    where
        L: Ledger + ?Sized,
        S: StateStore + ?Sized,
    {
        self.settle(Side::Finish, tx, ledger, state)
    }

    /// OPEN → deleted. On any error the record is left untouched.
    fn settle<L, S>(&self, side: Side, tx: &InboundTx, ledger: &mut L, state: &mut S) -> Result<FlowReport>
    where
        L: Ledger + ?Sized,
        S: StateStore + ?Sized,
    {
        let id = decode_id_memo(tx.require_memo()?)?;
        let record = state::load_escrow(state, &id)?;

        let recipient = side.counterparty(&record);
        if tx.account != recipient {
            return Err(HookError::Unauthorized {
                expected: recipient,
                actual: tx.account,
            });
        }

        let escrow = tx.require_escrow()?;
        let hook = ledger.hook_account();
        if escrow.owner != hook {
            return Err(HookError::ForeignEscrow {
                owner: escrow.owner,
                sequence: escrow.sequence,
                hook,
            });
        }
        let live = ledger
            .live_escrow(&escrow)
            .ok_or(HookError::EscrowNotFound {
                owner: escrow.owner,
                sequence: escrow.sequence,
            })?;
        if live.correlation_id != id {
            return Err(HookError::EscrowMismatch {
                owner: escrow.owner,
                sequence: escrow.sequence,
                expected: id,
                actual: live.correlation_id,
            });
        }
        let legs = live.legs;

        let quote = &self.config.quote_asset;
        let current_rate = get_rate(&*ledger, &Asset::Native, quote)?;
        let pending = PendingDisposition::value(legs, record.open_rate, current_rate)?;
        let disposition = pending.decide();

        tracing::debug!(
            correlation_id = %id,
            open_rate = %record.open_rate,
            current_rate = %current_rate,
            current_value = pending.current_value,
            locked_value = pending.locked_value,
            branch = disposition.label(),
            "Escrow revalued"
        );

        let plan = self.settlement_plan(&disposition, recipient)?;
        let receipt = TxEmitter::new(ledger).submit(&plan)?;
        state::clear(state, &id)?;

        tracing::info!(
            correlation_id = %id,
            flow = %side.flow(),
            recipient = %recipient,
            branch = disposition.label(),
            swept = disposition.sweep(),
            "Escrow settled"
        );

        Ok(FlowReport {
            flow: side.flow(),
            correlation_id: id,
            receipt,
            trace: pending.current_value,
        })
    }

    /// Transactions realizing `disposition`. Zero-amount legs are omitted.
    fn settlement_plan(&self, disposition: &Disposition, recipient: AccountId) -> Result<EmissionPlan> {
        let quote = &self.config.quote_asset;
        let mut plan = EmissionPlan::new();

        match *disposition {
            Disposition::RefundNative { native, .. } => {
                if native > 0 {
                    plan.push(
                        Leg::Payout,
                        TxIntent::Payment(PaymentIntent {
                            destination: recipient,
                            amount: Amount::native(native),
                        }),
                    )?;
                }
            }
            Disposition::PayLocked {
                convert_native,
                convert_expected,
                payout,
                ..
            } => {
                if convert_native > 0 {
                    plan.push(
                        Leg::Conversion,
                        TxIntent::Trade(TradeIntent {
                            sell: Amount::native(convert_native),
                            buy: quote.clone(),
                            expected_out: convert_expected,
                            min_out: min_out(convert_expected, self.config.slippage_bps),
                            slippage_bps: self.config.slippage_bps,
                        }),
                    )?;
                }
                if payout > 0 {
                    plan.push(
                        Leg::Payout,
                        TxIntent::Payment(PaymentIntent {
                            destination: recipient,
                            amount: Amount::new(quote.clone(), payout),
                        }),
                    )?;
                }
            }
        }

        let sweep = disposition.sweep();
        if sweep > 0 {
            plan.push(
                Leg::Sweep,
                TxIntent::Payment(PaymentIntent {
                    destination: self.config.platform_wallet,
                    amount: Amount::new(quote.clone(), sweep),
                }),
            )?;
        }
        Ok(plan)
    }
}
