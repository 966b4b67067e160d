//! # spreadhook-types
//!
//! Shared types, errors, and configuration for the **spreadhook** settlement
//! core.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`CorrelationId`], [`AccountId`]
//! - **Assets**: [`Asset`], [`Amount`], drop/unit conversion
//! - **Pricing**: [`Rate`] (6-decimal fixed point)
//! - **Persisted state**: [`EscrowRecord`] (104-byte layout)
//! - **Transactions**: [`TxType`], [`EscrowRef`], [`EscrowLegs`], [`LiveEscrow`], [`TxIntent`], [`Leg`]
//! - **Configuration**: [`HookConfig`], [`SpreadConfig`], [`EscrowConfig`]
//! - **Errors**: [`HookError`] with `SH_ERR_` prefix codes and hook statuses

pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod rate;
pub mod record;
pub mod tx;

pub use asset::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use rate::*;
pub use record::*;
pub use tx::*;

// Constants are accessed via `spreadhook_types::constants::FOO`
// (not re-exported to avoid name collisions).
