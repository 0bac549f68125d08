//! Solr search collaborator.
//!
//! - **Types**: query result model, typed document field access, wire format
//! - **Client**: HTTP client for the `select` handler

pub mod types;
#[cfg(feature = "http-client")]
pub mod client;

pub use types::*;
#[cfg(feature = "http-client")]
pub use client::*;
