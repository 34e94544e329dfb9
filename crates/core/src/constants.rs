//! Constants for the federation protocol.

/// Length in bytes of a single share.
pub const SHARE_LEN: usize = 16;

/// Number of shares required to reconstruct when not configured.
pub const DEFAULT_QUORUM: usize = 2;

/// Version byte that prefixes every partition token.
pub const TOKEN_VERSION: u8 = 0x80;

/// Tokens stamped further than this many seconds in the future
/// are rejected when a TTL is enforced.
pub const MAX_CLOCK_SKEW: u64 = 60;
