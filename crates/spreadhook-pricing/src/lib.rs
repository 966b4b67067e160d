//! # spreadhook-pricing
//!
//! **Pure settlement arithmetic for spreadhook.**
//!
//! Everything here is a deterministic function of its inputs:
//!
//! - **Zero side effects**: no state reads or writes, no emission
//! - **Integer fixed point**: drops and 6-decimal rates, `u128` intermediates
//! - **Checked**: every multiply/divide reports overflow instead of wrapping
//!
//! The only collaborator is [`PoolSource`], the read-only pool reserve
//! lookup used by [`get_rate`].

pub mod disposition;
pub mod math;
pub mod oracle;
pub mod slippage;
pub mod split;

pub use disposition::{Disposition, PendingDisposition};
pub use math::mul_div;
pub use oracle::{PoolSource, RateSample, get_rate};
pub use slippage::min_out;
pub use split::{BurnSplit, EscrowOpenSplit};
