//! HTTP client for the Solr `select` request handler.
//!
//! Issues one sorted query per check and decodes the JSON response writer's
//! output into a [`QueryResult`]. Transport failures, HTTP errors and
//! undecodable bodies come back as distinct [`Error`] variants so the caller
//! can turn them into an UNKNOWN verdict instead of aborting.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::search::types::{QueryResult, SearchQuery, SelectResponse};
use crate::utils::constants::{
    DEFAULT_HOST, DEFAULT_MAX_ATTEMPTS, DEFAULT_PORT, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS,
    USER_AGENT,
};

// ═══════════════════════════════════════════════════════════════════════════════
// CLIENT CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Connection settings for the Solr service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolrClientConfig {
    /// HTTP host
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Core (collection) name; empty targets the default core
    pub core: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Total attempts for transient failures
    pub max_attempts: u32,
    /// Base delay between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for SolrClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            core: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl SolrClientConfig {
    /// Base URL of the Solr core
    pub fn base_url(&self) -> String {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };

        let core = self.core.trim_matches('/');
        if core.is_empty() {
            format!("http://{}:{}/solr", host, self.port)
        } else {
            format!("http://{}:{}/solr/{}", host, self.port, core)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOLR CLIENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Solr search client
#[derive(Debug)]
pub struct SolrClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: SolrClientConfig,
}

impl SolrClient {
    /// Create a new client
    pub fn new(config: SolrClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// URL of the select handler
    pub fn select_url(&self) -> String {
        format!("{}/select", self.config.base_url())
    }

    /// Run the query, retrying transient failures
    pub async fn select(&self, query: &SearchQuery) -> Result<QueryResult> {
        let attempts = self.config.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            match self.select_once(query).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_transient() && attempt + 1 < attempts => {
                    warn!(attempt = attempt + 1, error = %e, "search attempt failed, retrying");
                    tokio::time::sleep(Duration::from_millis(
                        self.config.retry_delay_ms * (attempt as u64 + 1),
                    ))
                    .await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Internal("no search attempt was made".into())))
    }

    async fn select_once(&self, query: &SearchQuery) -> Result<QueryResult> {
        let url = self.select_url();
        debug!(%url, q = %query.query, sort_key = %query.sort_key, "sending search query");
        let started = Instant::now();

        let response = self
            .client
            .get(&url)
            .query(&query.params())
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        debug!(
            http_status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "received search response"
        );

        // Solr error responses still carry a decodable header with a non-zero status
        match serde_json::from_str::<SelectResponse>(&body) {
            Ok(decoded) => Ok(QueryResult::from(decoded)),
            Err(_) if !status.is_success() => Err(Error::HttpStatus {
                status: status.as_u16(),
            }),
            Err(e) => Err(Error::Deserialization(format!(
                "Failed to parse Solr response: {}",
                e
            ))),
        }
    }

    fn request_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            Error::Request(err.to_string())
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = SolrClientConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_base_url() {
        let mut config = SolrClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8080/solr");

        config.core = "products".into();
        assert_eq!(config.base_url(), "http://localhost:8080/solr/products");

        config.core = "/products/".into();
        assert_eq!(config.base_url(), "http://localhost:8080/solr/products");
    }

    #[test]
    fn test_base_url_ipv6() {
        let config = SolrClientConfig {
            host: "::1".into(),
            port: 8983,
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://[::1]:8983/solr");
    }

    #[test]
    fn test_select_url() {
        let client = SolrClient::new(SolrClientConfig {
            core: "logs".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.select_url(), "http://localhost:8080/solr/logs/select");
    }
}
