//! In-memory ledger.
//!
//! Implements every [`Ledger`] primitive without a host: pool reserves,
//! escrow objects, transaction preparation and emission. Emitting an
//! escrow-create registers a live escrow owned by the hook account, so a
//! whole Payment → Cancel/Finish choreography can run against it.
//!
//! Failures can be injected per [`Leg`] at prepare or emit time.

use std::collections::{HashMap, HashSet};

use spreadhook_pricing::{PoolSource, RateSample};
use spreadhook_types::constants::TX_BUFFER_LEN;
use spreadhook_types::{
    AccountId, Asset, EscrowLegs, EscrowRef, HostError, Leg, LiveEscrow, PlannedTx, PreparedTx,
    TxIntent,
};

use crate::host::Ledger;

/// Bytes of the staging index at the head of every blob.
const HANDLE_LEN: usize = 4;

/// Simulated host ledger.
#[derive(Debug)]
pub struct SimLedger {
    hook_account: AccountId,
    pools: HashMap<(Asset, Asset), RateSample>,
    escrows: HashMap<EscrowRef, LiveEscrow>,
    /// Every transaction ever prepared, indexed by blob handle.
    staged: Vec<PlannedTx>,
    emitted: Vec<PlannedTx>,
    next_sequence: u32,
    last_escrow: Option<EscrowRef>,
    fail_prepare: HashSet<Leg>,
    fail_emit: HashSet<Leg>,
    oversize: HashSet<Leg>,
}

impl SimLedger {
    /// A ledger whose escrows are owned by `hook_account`.
    #[must_use]
    pub fn new(hook_account: AccountId) -> Self {
        Self {
            hook_account,
            pools: HashMap::new(),
            escrows: HashMap::new(),
            staged: Vec::new(),
            emitted: Vec::new(),
            next_sequence: 1,
            last_escrow: None,
            fail_prepare: HashSet::new(),
            fail_emit: HashSet::new(),
            oversize: HashSet::new(),
        }
    }

    /// Set the reserves of the `base`/`quote` pool. Lookups in the opposite
    /// orientation see the flipped sample.
    pub fn set_pool(&mut self, base: Asset, quote: Asset, sample: RateSample) {
        self.pools.remove(&(quote.clone(), base.clone()));
        self.pools.insert((base, quote), sample);
    }

    pub fn remove_pool(&mut self, base: &Asset, quote: &Asset) {
        self.pools.remove(&(base.clone(), quote.clone()));
        self.pools.remove(&(quote.clone(), base.clone()));
    }

    /// Register (or replace) a live escrow object.
    pub fn put_escrow(&mut self, escrow: EscrowRef, live: LiveEscrow) {
        self.escrows.insert(escrow, live);
    }

    pub fn remove_escrow(&mut self, escrow: &EscrowRef) -> Option<LiveEscrow> {
        self.escrows.remove(escrow)
    }

    /// Most recently created escrow.
    #[must_use]
    pub fn last_escrow(&self) -> Option<EscrowRef> {
        self.last_escrow
    }

    /// Transactions emitted so far, in order.
    #[must_use]
    pub fn emitted(&self) -> &[PlannedTx] {
        &self.emitted
    }

    pub fn fail_prepare_on(&mut self, leg: Leg) {
        self.fail_prepare.insert(leg);
    }

    pub fn fail_emit_on(&mut self, leg: Leg) {
        self.fail_emit.insert(leg);
    }

    /// Prepare `leg` into a blob larger than the transaction buffer.
    pub fn oversize_on(&mut self, leg: Leg) {
        self.oversize.insert(leg);
    }

    /// Remove every injected failure.
    pub fn heal(&mut self) {
        self.fail_prepare.clear();
        self.fail_emit.clear();
        self.oversize.clear();
    }
}

impl PoolSource for SimLedger {
    fn pool_reserves(&self, base: &Asset, quote: &Asset) -> Option<RateSample> {
        self.pools
            .get(&(base.clone(), quote.clone()))
            .copied()
            .or_else(|| {
                self.pools
                    .get(&(quote.clone(), base.clone()))
                    .map(|sample| sample.flipped())
            })
    }
}

impl Ledger for SimLedger {
    fn hook_account(&self) -> AccountId {
        self.hook_account
    }

    fn live_escrow(&self, escrow: &EscrowRef) -> Option<LiveEscrow> {
        self.escrows.get(escrow).copied()
    }

    fn prepare(&mut self, planned: &PlannedTx) -> Result<Vec<u8>, HostError> {
        if self.fail_prepare.contains(&planned.leg) {
            return Err(HostError(format!("{} rejected at prepare", planned.leg)));
        }
        let handle = u32::try_from(self.staged.len())
            .map_err(|_| HostError("staging area exhausted".into()))?;
        self.staged.push(planned.clone());

        let mut blob = handle.to_be_bytes().to_vec();
        blob.extend_from_slice(planned.intent.kind().as_bytes());
        if self.oversize.contains(&planned.leg) {
            blob.resize(TX_BUFFER_LEN + 44, 0);
        }
        Ok(blob)
    }

    fn emit(&mut self, tx: &PreparedTx) -> Result<(), HostError> {
        if self.fail_emit.contains(&tx.leg) {
            return Err(HostError(format!("{} rejected at emit", tx.leg)));
        }
        let handle = tx
            .blob
            .get(..HANDLE_LEN)
            .and_then(|head| <[u8; HANDLE_LEN]>::try_from(head).ok())
            .map(u32::from_be_bytes)
            .ok_or_else(|| HostError("blob too short".into()))?;
        let planned = usize::try_from(handle)
            .ok()
            .and_then(|i| self.staged.get(i))
            .cloned()
            .ok_or_else(|| HostError(format!("unknown blob handle {handle}")))?;

        if let TxIntent::EscrowCreate(create) = &planned.intent {
            let escrow = EscrowRef {
                owner: self.hook_account,
                sequence: self.next_sequence,
            };
            self.next_sequence = self.next_sequence.wrapping_add(1);
            self.escrows.insert(
                escrow,
                LiveEscrow {
                    legs: EscrowLegs {
                        native: create.native,
                        quote: create.quote.drops,
                    },
                    correlation_id: create.correlation_id,
                },
            );
            self.last_escrow = Some(escrow);
        }
        self.emitted.push(planned);
        Ok(())
    }
}
