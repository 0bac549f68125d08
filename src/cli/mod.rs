//! Command line surface of the probe.
//!
//! Configuration (options, defaults, validation) and verdict output.

pub mod config;
pub mod output;

pub use config::*;
pub use output::*;
