//! Error types for the Solr search check.
//!
//! Errors never leave the probe as a crash: the check runner turns every
//! variant into an UNKNOWN verdict. They exist so the collaborators (config,
//! HTTP client, response decoding) can report precisely what went wrong.

use thiserror::Error;

/// Result type alias for check operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Invalid configuration parameter
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Transport Errors
    // ═══════════════════════════════════════════════════════════════════

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Request could not be sent or no response was received
    #[error("Search request failed: {0}")]
    Request(String),

    /// Request timed out
    #[error("Search request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },

    /// Solr answered with a non-success HTTP status
    #[error("Solr returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Response Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Response body could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ═══════════════════════════════════════════════════════════════════
    // Internal Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Request(_) | Error::Timeout { .. })
    }

    /// Returns true if the error comes from the configuration rather than Solr
    pub fn is_config(&self) -> bool {
        matches!(self, Error::InvalidParameter { .. } | Error::Client(_))
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Configuration errors: 1xxx
            Error::InvalidParameter { .. } => 1001,
            Error::Client(_) => 1002,

            // Transport errors: 2xxx
            Error::Request(_) => 2001,
            Error::Timeout { .. } => 2002,
            Error::HttpStatus { .. } => 2003,

            // Response errors: 3xxx
            Error::Deserialization(_) => 3001,

            // Internal errors: 9xxx
            Error::Internal(_) => 9001,
        }
    }
}
