//! Persisted escrow record.
//!
//! ## Layout (104 bytes)
//!
//! ```text
//!   [  0.. 34]  refund_to       classic address, zero-padded
//!   [ 34.. 68]  pay_to          classic address, zero-padded
//!   [ 68..100]  correlation_id  zero-padded
//!   [100..104]  open_rate       u32 big-endian, scaled by SCALE
//! ```
//!
//! The open-time rate occupies the trailing four bytes. Payment writes it and
//! Cancel/Finish read it back; both sides go through [`EscrowRecord`] so the
//! offset cannot drift.

use serde::{Deserialize, Serialize};

use crate::constants::{ACCOUNT_ID_LEN, CORRELATION_ID_LEN, ESCROW_RECORD_LEN};
use crate::{AccountId, CorrelationId, HookError, Rate, Result};

const REFUND_TO: usize = 0;
const PAY_TO: usize = REFUND_TO + ACCOUNT_ID_LEN;
const CORRELATION: usize = PAY_TO + ACCOUNT_ID_LEN;
const OPEN_RATE: usize = CORRELATION + CORRELATION_ID_LEN;

const _: () = assert!(OPEN_RATE + 4 == ESCROW_RECORD_LEN);

/// State bridging an escrow-open Payment and its Cancel or Finish.
///
/// Exists iff an OPEN escrow exists for `correlation_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// Receives proceeds on EscrowCancel; the only account allowed to cancel.
    pub refund_to: AccountId,
    /// Receives proceeds on EscrowFinish; the only account allowed to finish.
    pub pay_to: AccountId,
    pub correlation_id: CorrelationId,
    /// Native/quote rate sampled when the escrow was opened.
    pub open_rate: Rate,
}

impl EscrowRecord {
    /// Serialize into the fixed 104-byte layout.
    ///
    /// # Errors
    /// [`HookError::RateOutOfRange`] when the open rate does not fit the
    /// 4-byte slot.
    pub fn to_bytes(&self) -> Result<[u8; ESCROW_RECORD_LEN]> {
        let rate = u32::try_from(self.open_rate.scaled())
            .map_err(|_| HookError::RateOutOfRange(self.open_rate))?;

        let mut buf = [0u8; ESCROW_RECORD_LEN];
        buf[REFUND_TO..PAY_TO].copy_from_slice(self.refund_to.as_slot());
        buf[PAY_TO..CORRELATION].copy_from_slice(self.pay_to.as_slot());
        buf[CORRELATION..OPEN_RATE].copy_from_slice(self.correlation_id.as_slot());
        buf[OPEN_RATE..].copy_from_slice(&rate.to_be_bytes());
        Ok(buf)
    }

    /// Parse a persisted value.
    ///
    /// # Errors
    /// [`HookError::CorruptRecord`] on a length mismatch or a slot that no
    /// longer decodes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let buf: &[u8; ESCROW_RECORD_LEN] =
            bytes.try_into().map_err(|_| HookError::CorruptRecord {
                reason: format!("expected {ESCROW_RECORD_LEN} bytes, got {}", bytes.len()),
            })?;

        let mut refund_slot = [0u8; ACCOUNT_ID_LEN];
        refund_slot.copy_from_slice(&buf[REFUND_TO..PAY_TO]);
        let mut pay_slot = [0u8; ACCOUNT_ID_LEN];
        pay_slot.copy_from_slice(&buf[PAY_TO..CORRELATION]);
        let mut id_slot = [0u8; CORRELATION_ID_LEN];
        id_slot.copy_from_slice(&buf[CORRELATION..OPEN_RATE]);
        let mut rate = [0u8; 4];
        rate.copy_from_slice(&buf[OPEN_RATE..]);

        let corrupt = |field: &str| HookError::CorruptRecord {
            reason: format!("{field} slot does not decode ({})", crate::slot_hex(buf)),
        };

        Ok(Self {
            refund_to: AccountId::from_slot(refund_slot).ok_or_else(|| corrupt("refund_to"))?,
            pay_to: AccountId::from_slot(pay_slot).ok_or_else(|| corrupt("pay_to"))?,
            correlation_id: CorrelationId::from_slot(id_slot)
                .ok_or_else(|| corrupt("correlation_id"))?,
            open_rate: Rate::from_scaled(u64::from(u32::from_be_bytes(rate))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EscrowRecord {
        EscrowRecord {
            refund_to: AccountId::parse("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh").unwrap(),
            pay_to: AccountId::parse("rPEPPER7kfTD9w2To4CQk6UCfuHM9c6GDY").unwrap(),
            correlation_id: CorrelationId::from_slice(b"external_db_key_123").unwrap(),
            open_rate: Rate(2_450_000),
        }
    }

    #[test]
    fn layout_places_rate_in_trailing_bytes() {
        let bytes = record().to_bytes().unwrap();
        assert_eq!(bytes.len(), 104);
        assert_eq!(&bytes[..2], b"rH");
        assert_eq!(&bytes[34..36], b"rP");
        assert_eq!(&bytes[68..87], b"external_db_key_123");
        assert_eq!(u32::from_be_bytes(bytes[100..104].try_into().unwrap()), 2_450_000);
    }

    #[test]
    fn parses_what_it_writes() {
        let rec = record();
        let back = EscrowRecord::from_bytes(&rec.to_bytes().unwrap()).unwrap();
        assert_eq!(rec, back);
    }

    #[test]
    fn rate_at_slot_ceiling_fits() {
        let mut rec = record();
        rec.open_rate = Rate(u64::from(u32::MAX));
        let back = EscrowRecord::from_bytes(&rec.to_bytes().unwrap()).unwrap();
        assert_eq!(back.open_rate.to_string(), "4294.967295");
    }

    #[test]
    fn rate_beyond_slot_rejected() {
        let mut rec = record();
        rec.open_rate = Rate(u64::from(u32::MAX) + 1);
        let err = rec.to_bytes().unwrap_err();
        assert!(matches!(err, HookError::RateOutOfRange(_)));
    }

    #[test]
    fn wrong_length_is_corrupt() {
        let err = EscrowRecord::from_bytes(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, HookError::CorruptRecord { .. }));
    }

    #[test]
    fn zeroed_slot_is_corrupt() {
        let mut bytes = record().to_bytes().unwrap();
        bytes[34..68].fill(0);
        let err = EscrowRecord::from_bytes(&bytes).unwrap_err();
        assert!(format!("{err}").contains("pay_to"), "Got: {err}");
    }
}
