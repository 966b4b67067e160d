//! # spreadhook-settlement
//!
//! **Settlement plane**: turns a validated triggering transaction into the
//! downstream transactions that settle it.
//!
//! ## Flows
//!
//! - **Burn** ([`SpreadSettlement`]): half of each payment buys the burn
//!   asset for the burn sink, the other half goes to the platform wallet
//! - **Escrow** ([`EscrowChoreography`]): Payment opens a half-native,
//!   half-quote escrow; EscrowCancel / EscrowFinish revalue it and pay the
//!   counterparty, sweeping appreciation to the platform
//!
//! ## Invocation
//!
//! 1. [`SettlementHook`] dispatches on the transaction type
//! 2. The flow validates, samples rates and builds an [`EmissionPlan`]
//! 3. [`TxEmitter`] prepares every transaction, then emits them in order
//! 4. Correlation-id state is written or cleared through [`StateStore`]
//!
//! Host primitives are behind [`Ledger`] and [`StateStore`];
//! [`SimLedger`] and [`MemoryStateStore`] implement both in memory.

pub mod burn;
pub mod emitter;
pub mod escrow;
pub mod hook;
pub mod host;
pub mod outcome;
pub mod sim;
pub mod state;

pub use burn::SpreadSettlement;
pub use emitter::{EmissionPlan, EmissionReceipt, TxEmitter};
pub use escrow::EscrowChoreography;
pub use hook::SettlementHook;
pub use host::Ledger;
pub use outcome::{Flow, FlowReport, HookOutcome};
pub use sim::SimLedger;
pub use state::{MemoryStateStore, StateStore};
