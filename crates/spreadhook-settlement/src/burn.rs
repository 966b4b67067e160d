//! Burn flow.
//!
//! Every accepted payment is split in half:
//! 1. Gate the amount, decode the `{"id":...}` memo, match the currency
//! 2. Sample the burn-asset price in the payment currency; reject payments
//!    too small to buy a single drop of it
//! 3. Sell one half for the burn asset under a slippage bound
//! 4. Send the purchased burn asset to the burn sink
//! 5. Forward the other half, unconverted, to the platform wallet
//!
//! A tracking marker keyed by the correlation id is written once every leg
//! is prepared and cleared once every leg is emitted. A marker left behind
//! means emission stopped part-way.

use spreadhook_ingress::{InboundTx, PaymentGate, decode_id_memo};
use spreadhook_pricing::{BurnSplit, get_rate, min_out};
use spreadhook_types::{
    Amount, HookError, Leg, PaymentIntent, Result, SpreadConfig, TradeIntent, TxIntent,
};

use crate::emitter::{EmissionPlan, TxEmitter};
use crate::host::Ledger;
use crate::outcome::{Flow, FlowReport};
use crate::state::{self, StateStore};

/// Burn-flow handler.
#[derive(Debug)]
pub struct SpreadSettlement {
    config: SpreadConfig,
    gate: PaymentGate,
}

impl SpreadSettlement {
    /// # Errors
    /// `HookError::Configuration` when `config` does not validate.
    pub fn new(config: SpreadConfig) -> Result<Self> {
        config.validate()?;
        let gate = PaymentGate::new(config.min_amount_drops(), config.accepted.clone());
        Ok(Self { config, gate })
    }

    #[must_use]
    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Settle an incoming Payment.
    pub fn on_payment<L, S>(&self, tx: &InboundTx, ledger: &mut L, state: &mut S) -> Result<FlowReport>
    where
        L: Ledger + ?Sized,
        S: StateStore + ?Sized,
    {
        let amount = tx.require_amount()?;
        self.gate.check_minimum(amount)?;
        let id = decode_id_memo(tx.require_memo()?)?;
        let paid_in = self.gate.check_currency(amount)?;

        let rate = get_rate(&*ledger, &self.config.burn_asset, paid_in)?;
        let split = BurnSplit::compute(amount.drops, rate)?;
        if split.is_dust() {
            return Err(HookError::AmountTooSmall {
                amount: amount.drops,
                minimum: BurnSplit::min_amount(rate).max(self.gate.minimum()),
            });
        }
        tracing::debug!(
            correlation_id = %id,
            currency = %paid_in,
            rate = %rate,
            convert = split.convert,
            burn_out = split.burn_out,
            platform = split.platform,
            "Burn split computed"
        );

        let mut plan = EmissionPlan::new();
        plan.push(
            Leg::Conversion,
            TxIntent::Trade(TradeIntent {
                sell: Amount::new(paid_in.clone(), split.convert),
                buy: self.config.burn_asset.clone(),
                expected_out: split.burn_out,
                min_out: min_out(split.burn_out, self.config.slippage_bps),
                slippage_bps: self.config.slippage_bps,
            }),
        )?;
        plan.push(
            Leg::Burn,
            TxIntent::Payment(PaymentIntent {
                destination: self.config.burn_sink,
                amount: Amount::new(self.config.burn_asset.clone(), split.burn_out),
            }),
        )?;
        plan.push(
            Leg::Platform,
            TxIntent::Payment(PaymentIntent {
                destination: self.config.platform_wallet,
                amount: Amount::new(paid_in.clone(), split.platform),
            }),
        )?;

        let mut emitter = TxEmitter::new(ledger);
        let prepared = emitter.prepare_all(&plan)?;

        if state::contains(state, &id) {
            tracing::warn!(
                correlation_id = %id,
                "Tracking marker from an earlier partial emission still present"
            );
        }
        state::put(state, &id, id.as_slot())?;
        let receipt = emitter.emit_all(&prepared)?;
        state::clear(state, &id)?;

        tracing::info!(
            correlation_id = %id,
            amount = amount.drops,
            currency = %paid_in,
            burned = split.burn_out,
            digest = %receipt.digest_hex(),
            "Burn settlement emitted"
        );

        Ok(FlowReport {
            flow: Flow::Burn,
            correlation_id: id,
            receipt,
            trace: amount.drops,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use spreadhook_ingress::memo::encode_id_memo;
    use spreadhook_pricing::RateSample;
    use spreadhook_types::{AccountId, Asset, CorrelationId};

    use super::*;
    use crate::sim::SimLedger;
    use crate::state::MemoryStateStore;

    fn acct(s: &str) -> AccountId {
        AccountId::parse(s).unwrap()
    }

    fn rlusd() -> Asset {
        Asset::issued("RLUSD", acct("rMxCKbEDwqr76QuheSUMdEGf4B9xJ8m5De"))
    }

    fn fse() -> Asset {
        Asset::issued("FSE", acct("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"))
    }

    fn settlement() -> SpreadSettlement {
        SpreadSettlement::new(SpreadConfig {
            burn_asset: fse(),
            burn_sink: acct("rrrrrrrrrrrrrrrrrrrrBZbvji"),
            platform_wallet: acct("rPEPPER7kfTD9w2To4CQk6UCfuHM9c6GDY"),
            accepted: vec![rlusd(), Asset::Native],
            min_amount: rust_decimal::Decimal::new(1, 6),
            slippage_bps: 200,
        })
        .unwrap()
    }

    fn id() -> CorrelationId {
        CorrelationId::from_slice(b"order-000000000042").unwrap()
    }

    fn payment(amount: Amount) -> InboundTx {
        InboundTx::payment(
            AccountId::random(),
            amount,
            encode_id_memo(&id()),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn ledger() -> SimLedger {
        let mut ledger = SimLedger::new(AccountId::random());
        // 2 RLUSD per FSE
        ledger.set_pool(fse(), rlusd(), RateSample::new(1_000_000, 2_000_000));
        ledger
    }

    #[test]
    fn splits_and_emits_three_legs() {
        let mut ledger = ledger();
        let mut state = MemoryStateStore::new();
        let report = settlement()
            .on_payment(&payment(Amount::new(rlusd(), 1_000_000)), &mut ledger, &mut state)
            .unwrap();

        assert_eq!(report.flow, Flow::Burn);
        assert_eq!(report.trace, 1_000_000);
        assert_eq!(
            report.receipt.legs,
            vec![Leg::Conversion, Leg::Burn, Leg::Platform]
        );

        let emitted = ledger.emitted();
        let TxIntent::Trade(trade) = &emitted[0].intent else {
            panic!("expected trade");
        };
        assert_eq!(trade.sell.drops, 500_000);
        assert_eq!(trade.expected_out, 250_000);
        assert_eq!(trade.min_out, 245_000);

        let TxIntent::Payment(burn) = &emitted[1].intent else {
            panic!("expected burn payment");
        };
        assert_eq!(burn.amount, Amount::new(fse(), 250_000));

        let TxIntent::Payment(platform) = &emitted[2].intent else {
            panic!("expected platform payment");
        };
        assert_eq!(platform.amount, Amount::new(rlusd(), 500_000));
        assert!(state.is_empty(), "marker cleared after emission");
    }

    #[test]
    fn unsupported_currency_rejected_before_rate() {
        let mut ledger = ledger();
        let mut state = MemoryStateStore::new();
        let usd = Asset::issued("USD", AccountId::random());
        let err = settlement()
            .on_payment(&payment(Amount::new(usd, 1_000_000)), &mut ledger, &mut state)
            .unwrap_err();
        assert!(matches!(err, HookError::UnsupportedCurrency { .. }));
        assert_eq!(err.status(), -3);
        assert!(ledger.emitted().is_empty());
    }

    #[test]
    fn missing_pool_is_not_found() {
        let mut ledger = ledger();
        let mut state = MemoryStateStore::new();
        let err = settlement()
            .on_payment(&payment(Amount::native(1_000_000)), &mut ledger, &mut state)
            .unwrap_err();
        assert!(matches!(err, HookError::PoolNotFound { .. }));
        assert!(state.is_empty());
    }

    #[test]
    fn marker_survives_partial_emission() {
        let mut ledger = ledger();
        ledger.fail_emit_on(Leg::Platform);
        let mut state = MemoryStateStore::new();
        let err = settlement()
            .on_payment(&payment(Amount::new(rlusd(), 1_000_000)), &mut ledger, &mut state)
            .unwrap_err();
        assert_eq!(err.status(), -62);
        assert_eq!(ledger.emitted().len(), 2);
        assert_eq!(state.get(&id()).unwrap(), id().as_slot().to_vec());
    }

    #[test]
    fn prepare_failure_leaves_no_marker() {
        let mut ledger = ledger();
        ledger.fail_prepare_on(Leg::Burn);
        let mut state = MemoryStateStore::new();
        let err = settlement()
            .on_payment(&payment(Amount::new(rlusd(), 1_000_000)), &mut ledger, &mut state)
            .unwrap_err();
        assert_eq!(err.status(), -51);
        assert!(ledger.emitted().is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn dust_payment_rejected_before_planning() {
        let mut ledger = ledger();
        let mut state = MemoryStateStore::new();
        let err = settlement()
            .on_payment(&payment(Amount::new(rlusd(), 3)), &mut ledger, &mut state)
            .unwrap_err();
        assert!(matches!(err, HookError::AmountTooSmall { amount: 3, minimum: 4 }));
        assert_eq!(err.status(), -2);
        assert!(ledger.emitted().is_empty());
        assert!(state.is_empty());

        settlement()
            .on_payment(&payment(Amount::new(rlusd(), 4)), &mut ledger, &mut state)
            .unwrap();
        assert_eq!(ledger.emitted().len(), 3);
    }
}
