//! Transaction emitter: build all, then emit all.
//!
//! A flow collects its downstream transactions into an [`EmissionPlan`],
//! has the host prepare every one of them, and only then emits. A
//! preparation failure therefore aborts before anything leaves the hook. An
//! emission failure part-way through cannot retract what was already
//! emitted; the [`EmissionReceipt`] only exists when all of them went out.

use serde::Serialize;
use sha2::{Digest, Sha256};
use spreadhook_types::constants::{MAX_EMISSIONS, TX_BUFFER_LEN};
use spreadhook_types::{HookError, Leg, PlannedTx, PreparedTx, Result, TxIntent};

use crate::host::Ledger;

/// Ordered, bounded list of downstream transactions for one invocation.
#[derive(Debug, Clone, Default)]
pub struct EmissionPlan {
    txs: Vec<PlannedTx>,
}

impl EmissionPlan {
    #[must_use]
    pub fn new() -> Self {
        Self {
            txs: Vec::with_capacity(MAX_EMISSIONS),
        }
    }

    /// Append a transaction.
    ///
    /// # Errors
    /// [`HookError::PlanFull`] beyond [`MAX_EMISSIONS`] entries.
    pub fn push(&mut self, leg: Leg, intent: TxIntent) -> Result<()> {
        if self.txs.len() >= MAX_EMISSIONS {
            return Err(HookError::PlanFull { max: MAX_EMISSIONS });
        }
        self.txs.push(PlannedTx { leg, intent });
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.txs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedTx> {
        self.txs.iter()
    }
}

/// Proof that every transaction of a plan was handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmissionReceipt {
    /// Legs in emission order.
    pub legs: Vec<Leg>,
    /// SHA-256 over the emitted blobs.
    pub digest: [u8; 32],
}

impl EmissionReceipt {
    #[must_use]
    pub fn count(&self) -> usize {
        self.legs.len()
    }

    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Digest over prepared blobs.
///
/// `SHA-256(domain_sep || count || for each tx: leg || len || blob)`
fn compute_digest(prepared: &[PreparedTx]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"spreadhook:emission:v1:");
    hasher.update((prepared.len() as u64).to_le_bytes());
    for tx in prepared {
        hasher.update(tx.leg.ordinal().to_le_bytes());
        hasher.update((tx.blob.len() as u64).to_le_bytes());
        hasher.update(&tx.blob);
    }
    hasher.finalize().into()
}

/// Prepares and emits plans through a [`Ledger`].
pub struct TxEmitter<'l, L: Ledger + ?Sized> {
    ledger: &'l mut L,
}

impl<'l, L: Ledger + ?Sized> TxEmitter<'l, L> {
    pub fn new(ledger: &'l mut L) -> Self {
        Self { ledger }
    }

    /// Prepare every transaction in `plan`. Nothing is emitted.
    ///
    /// # Errors
    /// - [`HookError::PrepareFailed`] when the host rejects a transaction
    /// - [`HookError::TxBufferOverflow`] when a blob exceeds the tx buffer
    pub fn prepare_all(&mut self, plan: &EmissionPlan) -> Result<Vec<PreparedTx>> {
        let mut prepared = Vec::with_capacity(plan.len());
        for planned in plan.iter() {
            let blob = self
                .ledger
                .prepare(planned)
                .map_err(|source| HookError::PrepareFailed {
                    leg: planned.leg,
                    source,
                })?;
            if blob.len() > TX_BUFFER_LEN {
                return Err(HookError::TxBufferOverflow {
                    leg: planned.leg,
                    len: blob.len(),
                    max: TX_BUFFER_LEN,
                });
            }
            tracing::debug!(
                leg = %planned.leg,
                kind = planned.intent.kind(),
                bytes = blob.len(),
                "Transaction prepared"
            );
            prepared.push(PreparedTx {
                leg: planned.leg,
                blob,
            });
        }
        Ok(prepared)
    }

    /// Emit prepared transactions in order.
    ///
    /// # Errors
    /// [`HookError::EmitFailed`] naming the first leg the host refused.
    /// Earlier legs have already been emitted.
    pub fn emit_all(&mut self, prepared: &[PreparedTx]) -> Result<EmissionReceipt> {
        for (index, tx) in prepared.iter().enumerate() {
            if let Err(source) = self.ledger.emit(tx) {
                if index > 0 {
                    tracing::warn!(
                        leg = %tx.leg,
                        already_emitted = index,
                        "Emission failed after earlier legs went out"
                    );
                }
                return Err(HookError::EmitFailed {
                    leg: tx.leg,
                    source,
                });
            }
        }
        Ok(EmissionReceipt {
            legs: prepared.iter().map(|tx| tx.leg).collect(),
            digest: compute_digest(prepared),
        })
    }

    /// Prepare then emit.
    pub fn submit(&mut self, plan: &EmissionPlan) -> Result<EmissionReceipt> {
        let prepared = self.prepare_all(plan)?;
        self.emit_all(&prepared)
    }
}
