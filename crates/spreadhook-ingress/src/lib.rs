//! # spreadhook-ingress
//!
//! **Inbound plane**: everything between the host handing over a triggering
//! transaction and a flow handler receiving validated inputs.
//!
//! 1. **InboundTx**: the accessor surface of the triggering transaction
//! 2. **memo**: strict, versioned decoder for the positional memo schema
//! 3. **PaymentGate**: minimum amount and accepted-currency checks
//!
//! ```text
//! host → InboundTx → PaymentGate.check_minimum() → memo::decode_*()
//!      → PaymentGate.check_currency() → flow handler
//! ```

pub mod gate;
pub mod inbound;
pub mod memo;

pub use gate::PaymentGate;
pub use inbound::InboundTx;
pub use memo::{EscrowMemo, decode_escrow_memo, decode_id_memo};
