//! System-wide constants for the spreadhook settlement core.

/// Fixed-point scale for rates: 6 decimal places.
pub const SCALE: u64 = 1_000_000;

/// Drops per whole unit of any asset handled by the core.
pub const DROPS_PER_UNIT: u64 = 1_000_000;

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default slippage tolerance applied to every trade (2%).
pub const DEFAULT_SLIPPAGE_BPS: u16 = 200;

/// Default escrow timeout in seconds (7 days).
pub const DEFAULT_ESCROW_TIMEOUT_SECS: u64 = 604_800;

/// Upper bound accepted for a configured escrow timeout (1 year).
pub const MAX_ESCROW_TIMEOUT_SECS: u64 = 31_536_000;

/// Maximum memo payload accepted, in bytes.
pub const MEMO_MAX_LEN: usize = 256;

/// Minimum length of an id-only memo (burn flow, cancel, finish).
pub const ID_MEMO_MIN_LEN: usize = 20;

/// Minimum length of an escrow-open memo.
pub const ESCROW_MEMO_MIN_LEN: usize = 50;

/// Width of a correlation id slot.
pub const CORRELATION_ID_LEN: usize = 32;

/// Width of an account address slot.
pub const ACCOUNT_ID_LEN: usize = 34;

/// Shortest classic address the codec accepts.
pub const ACCOUNT_ID_MIN_LEN: usize = 25;

/// Size of a persisted escrow record.
pub const ESCROW_RECORD_LEN: usize = 104;

/// Maximum size of any persisted state value.
pub const STATE_VALUE_MAX_LEN: usize = 256;

/// Maximum size of a prepared downstream transaction blob.
pub const TX_BUFFER_LEN: usize = 256;

/// Maximum number of downstream transactions per invocation.
pub const MAX_EMISSIONS: usize = 3;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
