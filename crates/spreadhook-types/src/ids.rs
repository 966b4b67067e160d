//! Fixed-width identifiers carried through memos and persisted state.
//!
//! Both identifiers are stored zero-padded in a fixed-size slot, which is the
//! exact form they take inside an [`EscrowRecord`](crate::EscrowRecord).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{ACCOUNT_ID_LEN, ACCOUNT_ID_MIN_LEN, CORRELATION_ID_LEN};

/// Ledger base58 alphabet used by classic addresses.
const ADDRESS_ALPHABET: &[u8] = b"rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz";

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_graphic() && b != b'"' && b != b'\\'
}

fn trimmed(slot: &[u8]) -> &[u8] {
    let end = slot.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &slot[..end]
}

// ---------------------------------------------------------------------------
// CorrelationId
// ---------------------------------------------------------------------------

/// Caller-supplied token linking a Payment to its later Cancel/Finish.
///
/// Keys all persisted state. Up to 32 printable ASCII bytes, zero-padded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CorrelationId([u8; CORRELATION_ID_LEN]);

impl CorrelationId {
    /// Build an id from its raw bytes. Returns `None` when the input is
    /// empty, longer than the slot, or contains non-token bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() || bytes.len() > CORRELATION_ID_LEN {
            return None;
        }
        if !bytes.iter().copied().all(is_token_byte) {
            return None;
        }
        let mut slot = [0u8; CORRELATION_ID_LEN];
        slot[..bytes.len()].copy_from_slice(bytes);
        Some(Self(slot))
    }

    /// Rebuild an id from a persisted slot.
    #[must_use]
    pub fn from_slot(slot: [u8; CORRELATION_ID_LEN]) -> Option<Self> {
        Self::from_slice(trimmed(&slot))
    }

    /// The zero-padded slot, as stored.
    #[must_use]
    pub fn as_slot(&self) -> &[u8; CORRELATION_ID_LEN] {
        &self.0
    }

    /// The significant bytes, without padding.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        trimmed(&self.0)
    }

    /// The id as text. Token bytes are ASCII, so this never fails.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Random alphanumeric id for tests.
    #[cfg(feature = "test-helpers")]
    #[must_use]
    pub fn random() -> Self {
        use rand::{Rng, distributions::Alphanumeric};
        let raw: Vec<u8> = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CORRELATION_ID_LEN)
            .collect();
        let mut slot = [0u8; CORRELATION_ID_LEN];
        slot.copy_from_slice(&raw);
        Self(slot)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationId({})", self.as_str())
    }
}

impl Serialize for CorrelationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CorrelationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_slice(s.as_bytes())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid correlation id: {s}")))
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Classic ledger address (`r...`), zero-padded into a 34-byte slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// Parse a classic address. Accepts 25..=34 bytes of the base58
    /// alphabet with a leading `r`.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < ACCOUNT_ID_MIN_LEN || bytes.len() > ACCOUNT_ID_LEN {
            return None;
        }
        if bytes[0] != b'r' || !bytes.iter().all(|b| ADDRESS_ALPHABET.contains(b)) {
            return None;
        }
        let mut slot = [0u8; ACCOUNT_ID_LEN];
        slot[..bytes.len()].copy_from_slice(bytes);
        Some(Self(slot))
    }

    /// Parse from text.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_slice(s.as_bytes())
    }

    /// Rebuild an address from a persisted slot.
    #[must_use]
    pub fn from_slot(slot: [u8; ACCOUNT_ID_LEN]) -> Option<Self> {
        Self::from_slice(trimmed(&slot))
    }

    /// The zero-padded slot, as stored.
    #[must_use]
    pub fn as_slot(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(trimmed(&self.0)).unwrap_or_default()
    }

    /// Short form for log lines: first 8 characters.
    #[must_use]
    pub fn short(&self) -> &str {
        let s = self.as_str();
        &s[..s.len().min(8)]
    }

    /// Random syntactically valid address for tests.
    #[cfg(feature = "test-helpers")]
    #[must_use]
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let mut slot = [0u8; ACCOUNT_ID_LEN];
        slot[0] = b'r';
        for b in &mut slot[1..] {
            *b = ADDRESS_ALPHABET[rng.gen_range(0..ADDRESS_ALPHABET.len())];
        }
        Self(slot)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.as_str())
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid classic address: {s}")))
    }
}

/// Hex rendering of a raw slot, used in diagnostics for ids that fail to
/// round-trip through text.
#[must_use]
pub fn slot_hex(slot: &[u8]) -> String {
    hex::encode(trimmed(slot))
}
