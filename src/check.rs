//! Check runner.
//!
//! Wires configuration, the Solr client and the evaluator together. Every
//! path ends in exactly one [`Verdict`]: configuration and transport
//! failures become UNKNOWN instead of aborting the process.

use chrono::{DateTime, Utc};
#[cfg(feature = "http-client")]
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::monitoring::health::{evaluate, Thresholds, Verdict};
use crate::search::types::QueryResult;
#[cfg(feature = "http-client")]
use crate::{
    cli::config::CheckConfig,
    search::{client::SolrClient, types::SearchQuery},
};

/// Message for an unusable configuration
pub const MSG_INVALID_CONNECTION: &str = "Invalid connection parameters";

/// Message for a query that could not be performed
pub const MSG_QUERY_FAILED: &str =
    "Unable to perform search query, check parameters and connection";

/// Verdict for a configuration that failed validation
pub fn config_failure(err: &Error) -> Verdict {
    Verdict::unknown(MSG_INVALID_CONNECTION).with_detail(err.to_string())
}

/// Map the search outcome to a verdict
pub fn verdict_for(outcome: Result<QueryResult>, thresholds: &Thresholds, now: DateTime<Utc>) -> Verdict {
    match outcome {
        Ok(result) => evaluate(&result, thresholds, now),
        Err(e) if e.is_config() => config_failure(&e),
        Err(e) => Verdict::unknown(MSG_QUERY_FAILED).with_detail(e.to_string()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOLR SEARCH CHECK
// ═══════════════════════════════════════════════════════════════════════════════

/// A configured, ready-to-run check
#[cfg(feature = "http-client")]
#[derive(Debug)]
pub struct SolrSearchCheck {
    client: SolrClient,
    query: SearchQuery,
    thresholds: Thresholds,
}

#[cfg(feature = "http-client")]
impl SolrSearchCheck {
    /// Validate the configuration and build the client
    pub fn new(config: &CheckConfig) -> Result<Self> {
        config.validate()?;
        let client = SolrClient::new(config.client_config())?;

        Ok(Self {
            client,
            query: config.search_query(),
            thresholds: config.thresholds(),
        })
    }

    /// Run the query and evaluate it against the current time
    pub async fn run(&self) -> Verdict {
        self.run_with_clock(Utc::now).await
    }

    /// Run the query and evaluate it at the time `clock` reports.
    ///
    /// The clock is read once, after the search (including retries) returns.
    pub async fn run_with_clock<C>(&self, clock: C) -> Verdict
    where
        C: FnOnce() -> DateTime<Utc>,
    {
        let outcome = self.client.select(&self.query).await;

        match &outcome {
            Ok(result) => debug!(
                status = result.status,
                num_found = result.num_found,
                qtime_ms = result.query_time_ms,
                returned = result.documents.len(),
                "search completed"
            ),
            Err(e) => error!(code = e.code(), error = %e, url = %self.client.select_url(), "search query failed"),
        }

        verdict_for(outcome, &self.thresholds, clock())
    }
}

/// Build and run a check from configuration
#[cfg(feature = "http-client")]
pub async fn execute(config: &CheckConfig) -> Verdict {
    execute_with_clock(config, Utc::now).await
}

/// [`execute`] with an injected clock
#[cfg(feature = "http-client")]
pub async fn execute_with_clock<C>(config: &CheckConfig, clock: C) -> Verdict
where
    C: FnOnce() -> DateTime<Utc>,
{
    match SolrSearchCheck::new(config) {
        Ok(check) => check.run_with_clock(clock).await,
        Err(e) => {
            error!(code = e.code(), error = %e, "invalid check configuration");
            config_failure(&e)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::health::Severity;
    use crate::search::types::Document;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_transport_error_is_unknown() {
        let outcome = Err(Error::Request("connection refused".into()));
        let verdict = verdict_for(outcome, &Thresholds::new("ts"), now());

        assert_eq!(verdict.severity, Severity::Unknown);
        assert_eq!(verdict.message, MSG_QUERY_FAILED);
        assert!(verdict.metrics.is_empty());
        assert_eq!(verdict.details, vec!["Search request failed: connection refused".to_string()]);
    }

    #[test]
    fn test_http_status_is_unknown() {
        let outcome = Err(Error::HttpStatus { status: 503 });
        let verdict = verdict_for(outcome, &Thresholds::new("ts"), now());
        assert_eq!(verdict.exit_code(), 3);
    }

    #[test]
    fn test_config_error_is_invalid_connection() {
        let outcome = Err(Error::Client("tls backend unavailable".into()));
        let verdict = verdict_for(outcome, &Thresholds::new("ts"), now());
        assert_eq!(verdict.message, MSG_INVALID_CONNECTION);
    }

    #[test]
    fn test_success_is_evaluated() {
        let doc = Document::new().with_field("ts", "2024-05-01T11:59:00Z");
        let outcome = Ok(QueryResult::new(5_000_000, vec![doc], 20));
        let verdict = verdict_for(outcome, &Thresholds::new("ts"), now());
        assert_eq!(verdict.severity, Severity::Ok);
    }

    #[cfg(feature = "http-client")]
    #[test]
    fn test_new_rejects_invalid_config() {
        let err = SolrSearchCheck::new(&CheckConfig::default()).unwrap_err();
        assert!(err.is_config());
    }

    #[cfg(feature = "http-client")]
    #[tokio::test]
    async fn test_execute_invalid_config_is_unknown() {
        let verdict = execute(&CheckConfig::default()).await;
        assert_eq!(verdict.severity, Severity::Unknown);
        assert_eq!(verdict.message, MSG_INVALID_CONNECTION);
        assert!(verdict.details[0].contains("sortkey"));
    }
}
