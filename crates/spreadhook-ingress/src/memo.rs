//! Memo codec.
//!
//! Memos are a fixed schema, not general structured text. Version 1 has two
//! shapes, each matched byte-for-byte with tags in a fixed order:
//!
//! ```text
//!   id-only : {"id":"<id>"}
//!   escrow  : {"refund_to":"<addr>","pay_to":"<addr>","id":"<id>"}
//! ```
//!
//! Any deviation (leading bytes, reordered or renamed tags, whitespace,
//! trailing bytes) is rejected. Values are printable ASCII without quotes or
//! backslashes; each is bounds-checked against its slot width before it is
//! copied, so a short trailing field cannot read past the buffer.

use spreadhook_types::constants::{
    ACCOUNT_ID_LEN, CORRELATION_ID_LEN, ESCROW_MEMO_MIN_LEN, ID_MEMO_MIN_LEN, MEMO_MAX_LEN,
};
use spreadhook_types::{AccountId, CorrelationId, MemoError};

const ID_OPEN: &[u8] = br#"{"id":""#;
const REFUND_OPEN: &[u8] = br#"{"refund_to":""#;
const PAY_TO_SEP: &[u8] = br#"","pay_to":""#;
const ID_SEP: &[u8] = br#"","id":""#;
const CLOSE: &[u8] = br#""}"#;

/// Decoded escrow-open memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowMemo {
    pub refund_to: AccountId,
    pub pay_to: AccountId,
    pub id: CorrelationId,
}

/// Bounds-checked read cursor over a memo.
struct MemoCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MemoCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Consume `literal` exactly.
    fn expect(&mut self, literal: &[u8], field: &'static str) -> Result<(), MemoError> {
        for &want in literal {
            let Some(&got) = self.data.get(self.pos) else {
                return Err(MemoError::Truncated { field });
            };
            if got != want {
                return Err(MemoError::Mismatch {
                    offset: self.pos,
                    expected: String::from_utf8_lossy(literal).into_owned(),
                });
            }
            self.pos += 1;
        }
        Ok(())
    }

    /// Read a value up to (not including) the next `"`, at most `max` bytes.
    fn value(&mut self, field: &'static str, max: usize) -> Result<&'a [u8], MemoError> {
        let data: &'a [u8] = self.data;
        let rest = &data[self.pos..];
        let window = &rest[..rest.len().min(max + 1)];
        match window.iter().position(|&b| b == b'"') {
            Some(len) => {
                let value = &rest[..len];
                self.pos += len;
                Ok(value)
            }
            None if window.len() == rest.len() => Err(MemoError::Truncated { field }),
            None => Err(MemoError::InvalidField {
                field,
                reason: format!("longer than {max} bytes"),
            }),
        }
    }

    fn finish(&self) -> Result<(), MemoError> {
        match self.data.len() - self.pos {
            0 => Ok(()),
            count => Err(MemoError::TrailingBytes { count }),
        }
    }
}

fn check_len(memo: &[u8], min: usize) -> Result<(), MemoError> {
    if memo.len() > MEMO_MAX_LEN {
        return Err(MemoError::Oversized {
            len: memo.len(),
            max: MEMO_MAX_LEN,
        });
    }
    if memo.len() < min {
        return Err(MemoError::Undersized {
            len: memo.len(),
            min,
        });
    }
    Ok(())
}

fn correlation_id(raw: &[u8]) -> Result<CorrelationId, MemoError> {
    CorrelationId::from_slice(raw).ok_or_else(|| MemoError::InvalidField {
        field: "id",
        reason: "must be 1..=32 printable bytes".into(),
    })
}

fn account(raw: &[u8], field: &'static str) -> Result<AccountId, MemoError> {
    AccountId::from_slice(raw).ok_or_else(|| MemoError::InvalidField {
        field,
        reason: "not a classic address".into(),
    })
}

/// Decode an id-only memo (burn flow, EscrowCancel, EscrowFinish).
///
/// Overall length must be in `[20, 256]`.
pub fn decode_id_memo(memo: &[u8]) -> Result<CorrelationId, MemoError> {
    check_len(memo, ID_MEMO_MIN_LEN)?;
    let mut cur = MemoCursor::new(memo);
    cur.expect(ID_OPEN, "id")?;
    let id = cur.value("id", CORRELATION_ID_LEN)?;
    cur.expect(CLOSE, "id")?;
    cur.finish()?;
    correlation_id(id)
}

/// Decode an escrow-open memo: refund_to, pay_to, id, in that order.
///
/// Overall length must be in `[50, 256]`.
pub fn decode_escrow_memo(memo: &[u8]) -> Result<EscrowMemo, MemoError> {
    check_len(memo, ESCROW_MEMO_MIN_LEN)?;
    let mut cur = MemoCursor::new(memo);
    cur.expect(REFUND_OPEN, "refund_to")?;
    let refund_to = cur.value("refund_to", ACCOUNT_ID_LEN)?;
    cur.expect(PAY_TO_SEP, "pay_to")?;
    let pay_to = cur.value("pay_to", ACCOUNT_ID_LEN)?;
    cur.expect(ID_SEP, "id")?;
    let id = cur.value("id", CORRELATION_ID_LEN)?;
    cur.expect(CLOSE, "id")?;
    cur.finish()?;

    Ok(EscrowMemo {
        refund_to: account(refund_to, "refund_to")?,
        pay_to: account(pay_to, "pay_to")?,
        id: correlation_id(id)?,
    })
}

/// Encode an id-only memo in the V1 schema.
#[must_use]
pub fn encode_id_memo(id: &CorrelationId) -> Vec<u8> {
    let mut out = Vec::with_capacity(ID_OPEN.len() + CORRELATION_ID_LEN + CLOSE.len());
    out.extend_from_slice(ID_OPEN);
    out.extend_from_slice(id.as_bytes());
    out.extend_from_slice(CLOSE);
    out
}

/// Encode an escrow-open memo in the V1 schema.
#[must_use]
pub fn encode_escrow_memo(memo: &EscrowMemo) -> Vec<u8> {
    let mut out = Vec::with_capacity(MEMO_MAX_LEN);
    out.extend_from_slice(REFUND_OPEN);
    out.extend_from_slice(memo.refund_to.as_str().as_bytes());
    out.extend_from_slice(PAY_TO_SEP);
    out.extend_from_slice(memo.pay_to.as_str().as_bytes());
    out.extend_from_slice(ID_SEP);
    out.extend_from_slice(memo.id.as_bytes());
    out.extend_from_slice(CLOSE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENTER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    const OWNER: &str = "rPEPPER7kfTD9w2To4CQk6UCfuHM9c6GDY";

    fn escrow_json(refund_to: &str, pay_to: &str, id: &str) -> Vec<u8> {
        format!(r#"{{"refund_to":"{refund_to}","pay_to":"{pay_to}","id":"{id}"}}"#).into_bytes()
    }

    #[test]
    fn decodes_id_memo() {
        let id = decode_id_memo(br#"{"id":"external_db_key_123"}"#).unwrap();
        assert_eq!(id.as_str(), "external_db_key_123");
    }

    #[test]
    fn decodes_escrow_memo() {
        let memo = decode_escrow_memo(&escrow_json(RENTER, OWNER, "external_db_key_123")).unwrap();
        assert_eq!(memo.refund_to.as_str(), RENTER);
        assert_eq!(memo.pay_to.as_str(), OWNER);
        assert_eq!(memo.id.as_str(), "external_db_key_123");
    }

    #[test]
    fn encoder_output_decodes() {
        let memo = EscrowMemo {
            refund_to: AccountId::random(),
            pay_to: AccountId::random(),
            id: CorrelationId::random(),
        };
        assert_eq!(decode_escrow_memo(&encode_escrow_memo(&memo)).unwrap(), memo);
        let id = CorrelationId::from_slice(b"order-000000000042").unwrap();
        assert_eq!(decode_id_memo(&encode_id_memo(&id)).unwrap(), id);
    }

    #[test]
    fn length_gates() {
        let err = decode_id_memo(br#"{"id":"short"}"#).unwrap_err();
        assert!(matches!(err, MemoError::Undersized { len: 14, min: 20 }));

        let err = decode_escrow_memo(br#"{"refund_to":"rA","pay_to":"rB","id":"x"}"#).unwrap_err();
        assert!(matches!(err, MemoError::Undersized { min: 50, .. }));

        let big = vec![b'a'; 257];
        assert!(matches!(
            decode_id_memo(&big),
            Err(MemoError::Oversized { len: 257, max: 256 })
        ));
        assert!(matches!(
            decode_escrow_memo(&big),
            Err(MemoError::Oversized { .. })
        ));
    }

    #[test]
    fn leading_garbage_rejected() {
        let err = decode_id_memo(br#"xx{"id":"external_db_key_123"}"#).unwrap_err();
        assert!(matches!(err, MemoError::Mismatch { offset: 0, .. }));
    }

    #[test]
    fn reordered_fields_rejected() {
        let memo = format!(r#"{{"pay_to":"{OWNER}","refund_to":"{RENTER}","id":"external_db_key_123"}}"#);
        let err = decode_escrow_memo(memo.as_bytes()).unwrap_err();
        assert!(matches!(err, MemoError::Mismatch { offset: 2, .. }), "Got: {err:?}");
    }

    #[test]
    fn whitespace_rejected() {
        let err = decode_id_memo(br#"{"id": "external_db_key_123"}"#).unwrap_err();
        assert!(matches!(err, MemoError::Mismatch { offset: 6, .. }), "Got: {err:?}");
    }

    #[test]
    fn missing_closing_delimiter_is_truncated() {
        let err = decode_id_memo(br#"{"id":"external_db_key_123"#).unwrap_err();
        assert!(matches!(err, MemoError::Truncated { field: "id" }));

        let err = decode_id_memo(br#"{"id":"external_db_key_123""#).unwrap_err();
        assert!(matches!(err, MemoError::Truncated { field: "id" }));
    }

    #[test]
    fn overlong_field_rejected_without_reading_past_slot() {
        let long_id = "a".repeat(40);
        let memo = format!(r#"{{"id":"{long_id}"}}"#);
        let err = decode_id_memo(memo.as_bytes()).unwrap_err();
        assert!(matches!(err, MemoError::InvalidField { field: "id", .. }));

        let long_addr = format!("{RENTER}XYZ");
        let err = decode_escrow_memo(&escrow_json(&long_addr, OWNER, "external_db_key_123")).unwrap_err();
        assert!(matches!(err, MemoError::InvalidField { field: "refund_to", .. }));
    }

    #[test]
    fn invalid_address_rejected() {
        let bad = "xHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
        let err = decode_escrow_memo(&escrow_json(RENTER, bad, "external_db_key_123")).unwrap_err();
        assert!(matches!(err, MemoError::InvalidField { field: "pay_to", .. }));
    }

    #[test]
    fn empty_id_rejected() {
        let err = decode_escrow_memo(&escrow_json(RENTER, OWNER, "")).unwrap_err();
        assert!(matches!(err, MemoError::InvalidField { field: "id", .. }));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let err = decode_id_memo(br#"{"id":"external_db_key_123"}  "#).unwrap_err();
        assert!(matches!(err, MemoError::TrailingBytes { count: 2 }));
    }

    #[test]
    fn escrow_truncated_in_second_field() {
        let memo = format!(r#"{{"refund_to":"{RENTER}","pay_to":"rPEPPER7"#);
        let err = decode_escrow_memo(memo.as_bytes()).unwrap_err();
        assert!(matches!(err, MemoError::Truncated { field: "pay_to" }));
    }
}
