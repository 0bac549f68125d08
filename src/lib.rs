//! # check_solr_search
//!
//! Monitoring probe for a Solr collection. Runs one sorted search and
//! reports a Nagios-compatible verdict on:
//!
//! - the search status and the presence of results
//! - the number of matching documents
//! - the server-reported query time
//! - the age of the most recent document (by the sort-key date field)
//!
//! Query time and document count are returned as perfdata.
//!
//! ## Architecture
//!
//! - **Monitoring**: the pure evaluator mapping a query result to a verdict
//! - **Search**: result model and the HTTP client for the `select` handler
//! - **Check**: runner turning every outcome into exactly one verdict
//! - **CLI**: configuration and verdict rendering
//!
//! ## Example
//!
//! ```rust,ignore
//! use solr_check::prelude::*;
//!
//! let thresholds = Thresholds::new("last_update").with_min_hits(10_000);
//! let verdict = evaluate(&result, &thresholds, chrono::Utc::now());
//! std::process::exit(OutputFormatter::default().emit(&verdict));
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod check;
pub mod cli;
pub mod error;
pub mod monitoring;
pub mod search;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cli::{
        config::CheckConfig,
        output::{OutputFormat, OutputFormatter},
    };
    pub use crate::error::{Error, Result};
    pub use crate::monitoring::{
        health::{evaluate, Severity, Thresholds, Verdict},
        metrics::{PerfData, PerfDatum, PerfUnit},
    };
    pub use crate::search::types::{Document, FieldError, QueryResult, SearchQuery};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
