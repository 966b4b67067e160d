//! Correlation-id keyed state.
//!
//! The host exposes a flat key/value namespace; `set` with an empty value
//! deletes. There is no TTL: a record whose escrow expired without a Cancel
//! or Finish stays until one arrives.

use std::collections::HashMap;

use spreadhook_types::constants::STATE_VALUE_MAX_LEN;
use spreadhook_types::{CorrelationId, EscrowRecord, HookError, HostError, Result};

/// Host key/value state.
pub trait StateStore {
    fn get(&self, key: &CorrelationId) -> Option<Vec<u8>>;

    /// Insert or overwrite. An empty `value` deletes the key.
    fn set(&mut self, key: &CorrelationId, value: &[u8]) -> std::result::Result<(), HostError>;
}

/// Write `value` under `key`, enforcing the fixed value size.
pub fn put<S: StateStore + ?Sized>(store: &mut S, key: &CorrelationId, value: &[u8]) -> Result<()> {
    if value.len() > STATE_VALUE_MAX_LEN {
        return Err(HookError::StateValueTooLarge {
            len: value.len(),
            max: STATE_VALUE_MAX_LEN,
        });
    }
    store.set(key, value).map_err(HookError::StateWrite)
}

/// Delete `key`.
pub fn clear<S: StateStore + ?Sized>(store: &mut S, key: &CorrelationId) -> Result<()> {
    store.set(key, &[]).map_err(HookError::StateWrite)
}

#[must_use]
pub fn contains<S: StateStore + ?Sized>(store: &S, key: &CorrelationId) -> bool {
    store.get(key).is_some()
}

/// Load the OPEN escrow record for `id`.
///
/// # Errors
/// - [`HookError::RecordNotFound`] when no record exists
/// - [`HookError::CorruptRecord`] when the stored bytes do not decode
pub fn load_escrow<S: StateStore + ?Sized>(store: &S, id: &CorrelationId) -> Result<EscrowRecord> {
    let bytes = store.get(id).ok_or(HookError::RecordNotFound(*id))?;
    EscrowRecord::from_bytes(&bytes)
}

/// Persist an escrow record under its correlation id.
pub fn save_escrow<S: StateStore + ?Sized>(store: &mut S, record: &EscrowRecord) -> Result<()> {
    let bytes = record.to_bytes()?;
    put(store, &record.correlation_id, &bytes)
}

/// In-process [`StateStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: HashMap<CorrelationId, Vec<u8>>,
    fail_writes: bool,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &CorrelationId) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &CorrelationId, value: &[u8]) -> std::result::Result<(), HostError> {
        if self.fail_writes {
            return Err(HostError(format!("state write rejected for {key}")));
        }
        if value.is_empty() {
            self.entries.remove(key);
        } else {
            self.entries.insert(*key, value.to_vec());
        }
        Ok(())
    }
}
