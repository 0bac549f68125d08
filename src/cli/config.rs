//! Check Configuration.
//!
//! All options recognized by the probe, their defaults and validation.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::monitoring::health::Thresholds;
#[cfg(feature = "http-client")]
use crate::search::client::SolrClientConfig;
use crate::search::types::SearchQuery;
use crate::utils::constants::*;

// ═══════════════════════════════════════════════════════════════════════════════
// CHECK CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Check configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// HTTP host of the Solr service
    pub host: String,
    /// HTTP port of the Solr service
    pub port: u16,
    /// Solr core name
    pub core: String,
    /// Search query
    pub query: String,
    /// Date field to sort on (descending) and check for freshness
    pub sort_key: String,
    /// Expected minimum number of hits
    pub min_hits: u64,
    /// Maximum query processing time in milliseconds
    pub max_qtime_ms: u64,
    /// Maximum age of the most recent document in minutes
    pub stale_after_mins: u64,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Attempts for transient transport failures
    pub max_attempts: u32,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            core: String::new(),
            query: DEFAULT_QUERY.into(),
            sort_key: String::new(),
            min_hits: DEFAULT_MIN_HITS,
            max_qtime_ms: DEFAULT_MAX_QTIME_MS,
            stale_after_mins: DEFAULT_STALE_AFTER_MINS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl CheckConfig {
    /// Create configuration for a core and sort key, defaults elsewhere
    pub fn new(core: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            core: core.into(),
            sort_key: sort_key.into(),
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", "cannot be empty"));
        }

        if self.port == 0 {
            return Err(invalid("port", "must be greater than 0"));
        }

        if self.sort_key.trim().is_empty() {
            return Err(invalid("sortkey", "a date field to sort on is required"));
        }

        if self.query.trim().is_empty() {
            return Err(invalid("query", "cannot be empty"));
        }

        if self.stale_after_mins == 0 {
            return Err(invalid("stale-after", "must be greater than 0"));
        }

        if self.stale_after_mins > i64::MAX as u64 / 60_000 {
            return Err(invalid("stale-after", "is too large"));
        }

        if self.timeout_ms == 0 {
            return Err(invalid("timeout", "must be greater than 0"));
        }

        if self.max_attempts == 0 {
            return Err(invalid("attempts", "must be at least 1"));
        }

        Ok(())
    }

    /// Alerting thresholds
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.sort_key.clone())
            .with_min_hits(self.min_hits)
            .with_max_query_time_ms(self.max_qtime_ms)
            .with_stale_after(Duration::minutes(self.stale_after_mins as i64))
    }

    /// Query parameters
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new(self.query.clone(), self.sort_key.clone())
    }

    /// Connection settings for the HTTP client
    #[cfg(feature = "http-client")]
    pub fn client_config(&self) -> SolrClientConfig {
        SolrClientConfig {
            host: self.host.clone(),
            port: self.port,
            core: self.core.clone(),
            timeout_ms: self.timeout_ms,
            max_attempts: self.max_attempts,
            ..Default::default()
        }
    }
}

fn invalid(name: &str, reason: &str) -> Error {
    Error::InvalidParameter {
        name: name.into(),
        reason: reason.into(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
