//! Check constants and option defaults.
//!
//! All defaults are defined here so the CLI, the config layer and the
//! client agree on them.

// ═══════════════════════════════════════════════════════════════════════════════
// CONNECTION DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default HTTP host of the Solr service
pub const DEFAULT_HOST: &str = "localhost";

/// Default HTTP port of the Solr service
pub const DEFAULT_PORT: u16 = 8080;

/// Default request timeout (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default number of attempts (no retry)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Base delay between attempts, multiplied by the attempt number
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("check_solr_search/", env!("CARGO_PKG_VERSION"));

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default search query (match all documents)
pub const DEFAULT_QUERY: &str = "*:*";

/// Rows requested; only the most recent document is inspected
pub const SEARCH_ROWS: u32 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// THRESHOLD DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Expected minimum number of matching documents
pub const DEFAULT_MIN_HITS: u64 = 1_000_000;

/// Maximum acceptable query processing time in milliseconds
pub const DEFAULT_MAX_QTIME_MS: u64 = 200;

/// Age after which the most recent document is considered stale (minutes)
pub const DEFAULT_STALE_AFTER_MINS: u64 = 30;
