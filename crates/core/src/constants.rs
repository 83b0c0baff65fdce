//! Shared constants for the SAHPAATHI backend.
//!
//! Centralizes magic numbers and default strings used across crates.

/// Display name given to sessions created without an explicit name.
pub const DEFAULT_SESSION_NAME: &str = "New Chat";

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 5;

/// PostgreSQL connection pool: acquire timeout in seconds.
///
/// Also bounds the startup reachability probe: if no connection can be
/// established within this window the store starts in degraded mode.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// System instruction used when `SAHPAATHI_INSTRUCTION` is not set and no
/// teacher persona is selected.
pub const DEFAULT_INSTRUCTION: &str =
    "You are SAHPAATHI, an AI assistant designed to help students with their studies.";

/// Error message when the LLM backend is not configured.
pub const LLM_NOT_CONFIGURED: &str =
    "API key not configured. Please set SAHPAATHI_API_KEY or GOOGLE_API_KEY.";
