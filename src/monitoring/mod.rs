//! Health evaluation for a Solr collection.
//!
//! # Components
//!
//! - **Health**: threshold checks and verdict aggregation
//! - **Metrics**: performance data attached to verdicts

pub mod health;
pub mod metrics;

pub use health::*;
pub use metrics::*;
