//! Search Health Evaluation.
//!
//! Maps one query result and a set of thresholds to one verdict. The checks
//! run in a fixed order:
//!
//! 1. search status (terminal CRITICAL)
//! 2. empty result set (terminal CRITICAL)
//! 3. hit count below minimum (WARNING, evaluation continues)
//! 4. query time above maximum (CRITICAL)
//! 5. sort-key timestamp of the most recent document (UNKNOWN if unreadable,
//!    CRITICAL if stale)
//!
//! From step 3 on the verdict only ever rises in rank; UNKNOWN ends the
//! evaluation regardless of what was accumulated.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use nagiosplugin::ServiceState;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::metrics::PerfData;
use crate::search::types::QueryResult;
use crate::utils::constants::{DEFAULT_MAX_QTIME_MS, DEFAULT_MIN_HITS, DEFAULT_STALE_AFTER_MINS};

/// Message for a non-zero search status
pub const MSG_INVALID_STATUS: &str = "Search failed: invalid response status.";

/// Message for an empty result set
pub const MSG_ZERO_DOCUMENTS: &str = "Search returned zero documents.";

/// Message for a hit count below the minimum
pub const MSG_LOW_HITS: &str = "Number of document hits is lower than expected.";

/// Message for an unreadable sort-key field
pub const MSG_UNPARSEABLE_SORT_KEY: &str = "Cannot parse date field specified in sort key.";

// ═══════════════════════════════════════════════════════════════════════════════
// SEVERITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Verdict severity.
///
/// `Ok < Warning < Critical` by rank. `Unknown` means the state could not be
/// determined and has no rank. Status words and exit codes come from the
/// matching [`ServiceState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// All checks passed
    Ok,
    /// Degraded, attention needed
    Warning,
    /// Failing
    Critical,
    /// State could not be determined
    Unknown,
}

impl Severity {
    /// Nagios service state
    pub fn service_state(&self) -> ServiceState {
        match self {
            Severity::Ok => ServiceState::Ok,
            Severity::Warning => ServiceState::Warning,
            Severity::Critical => ServiceState::Critical,
            Severity::Unknown => ServiceState::Unknown,
        }
    }

    /// Plugin exit code
    pub fn exit_code(&self) -> i32 {
        self.service_state().exit_code()
    }

    /// Rank on the OK < WARNING < CRITICAL scale; `None` for UNKNOWN
    pub fn rank(&self) -> Option<u8> {
        match self {
            Severity::Ok => Some(0),
            Severity::Warning => Some(1),
            Severity::Critical => Some(2),
            Severity::Unknown => None,
        }
    }

    /// Check whether this severity outranks another ranked severity
    pub fn outranks(&self, other: Severity) -> bool {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }
}

impl From<Severity> for ServiceState {
    fn from(severity: Severity) -> Self {
        severity.service_state()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.service_state())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// THRESHOLDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Alerting thresholds, fixed for the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    /// Minimum expected matching documents
    pub min_hits: u64,
    /// Maximum acceptable query time in milliseconds
    pub max_query_time_ms: u64,
    /// Maximum age of the most recent document
    pub stale_after: Duration,
    /// Date field used for sorting and freshness
    pub sort_key: String,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_hits: DEFAULT_MIN_HITS,
            max_query_time_ms: DEFAULT_MAX_QTIME_MS,
            stale_after: Duration::minutes(DEFAULT_STALE_AFTER_MINS as i64),
            sort_key: String::new(),
        }
    }
}

impl Thresholds {
    /// Create thresholds with defaults for the given sort key
    pub fn new(sort_key: impl Into<String>) -> Self {
        Self {
            sort_key: sort_key.into(),
            ..Default::default()
        }
    }

    /// Set minimum hits
    pub fn with_min_hits(mut self, min_hits: u64) -> Self {
        self.min_hits = min_hits;
        self
    }

    /// Set maximum query time
    pub fn with_max_query_time_ms(mut self, max_query_time_ms: u64) -> Self {
        self.max_query_time_ms = max_query_time_ms;
        self
    }

    /// Set staleness limit
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VERDICT
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Severity
    pub severity: Severity,
    /// Explanation of the dominant condition
    pub message: String,
    /// Performance data
    pub metrics: PerfData,
    /// Additional diagnostic lines
    pub details: Vec<String>,
}

impl Verdict {
    /// Create verdict without metrics
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            metrics: PerfData::new(),
            details: Vec::new(),
        }
    }

    /// CRITICAL verdict
    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, message)
    }

    /// UNKNOWN verdict
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Severity::Unknown, message)
    }

    /// Attach metrics
    pub fn with_metrics(mut self, metrics: PerfData) -> Self {
        self.metrics = metrics;
        self
    }

    /// Add a diagnostic line
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Plugin exit code
    pub fn exit_code(&self) -> i32 {
        self.severity.exit_code()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSESSMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Best verdict so far while the ranked checks run
#[derive(Debug, Clone)]
struct Assessment {
    severity: Severity,
    message: String,
    details: Vec<String>,
}

impl Assessment {
    fn new(message: String) -> Self {
        Self {
            severity: Severity::Ok,
            message,
            details: Vec::new(),
        }
    }

    /// Record a triggered check; the verdict changes only if it outranks
    fn raise(&mut self, severity: Severity, message: impl Into<String>, detail: String) {
        debug_assert!(severity.rank().is_some(), "UNKNOWN is terminal, not ranked");
        if severity.outranks(self.severity) {
            self.severity = severity;
            self.message = message.into();
        }
        self.details.push(detail);
    }

    fn into_verdict(self, metrics: PerfData) -> Verdict {
        Verdict {
            severity: self.severity,
            message: self.message,
            metrics,
            details: self.details,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVALUATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Evaluate one query result against the thresholds at time `now`.
///
/// Pure: the same inputs always produce the same verdict.
pub fn evaluate(result: &QueryResult, thresholds: &Thresholds, now: DateTime<Utc>) -> Verdict {
    if result.status != 0 {
        return Verdict::critical(MSG_INVALID_STATUS)
            .with_detail(format!("search status {}", result.status));
    }

    let Some(latest) = result.first_document() else {
        return Verdict::critical(MSG_ZERO_DOCUMENTS);
    };

    let metrics = PerfData::query_metrics(result.query_time_ms, result.num_found);
    let mut assessment = Assessment::new(format!(
        "Search processed in {}ms, {} documents found",
        result.query_time_ms, result.num_found
    ));

    if result.num_found < thresholds.min_hits {
        assessment.raise(
            Severity::Warning,
            MSG_LOW_HITS,
            format!(
                "{} documents found, expected at least {}",
                result.num_found, thresholds.min_hits
            ),
        );
    }

    if result.query_time_ms > thresholds.max_query_time_ms {
        assessment.raise(
            Severity::Critical,
            format!("Response too slow: {} ms", result.query_time_ms),
            format!(
                "query time {} ms exceeds {} ms",
                result.query_time_ms, thresholds.max_query_time_ms
            ),
        );
        return assessment.into_verdict(metrics);
    }

    let last_update = match latest.timestamp(&thresholds.sort_key) {
        Ok(ts) => ts,
        Err(e) => {
            return Verdict::unknown(MSG_UNPARSEABLE_SORT_KEY)
                .with_metrics(metrics)
                .with_detail(e.to_string());
        }
    };

    let age = now.signed_duration_since(last_update);
    if age > thresholds.stale_after {
        assessment.raise(
            Severity::Critical,
            format!(
                "Collection update issue: last document is too old ({})",
                last_update.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
            format!(
                "last document is {} minutes old, limit {} minutes",
                age.num_minutes(),
                thresholds.stale_after.num_minutes()
            ),
        );
    }

    assessment.into_verdict(metrics)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::metrics::{DOCUMENTS_LABEL, QTIME_LABEL};
    use crate::search::types::Document;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn doc_at(ts: DateTime<Utc>) -> Document {
        Document::new().with_field("last_update", ts.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    fn thresholds() -> Thresholds {
        Thresholds::new("last_update")
            .with_min_hits(1_000_000)
            .with_max_query_time_ms(200)
            .with_stale_after(Duration::minutes(30))
    }

    fn result(num_found: u64, qtime: u64, age: Duration) -> QueryResult {
        QueryResult::new(num_found, vec![doc_at(now() - age)], qtime)
    }

    #[test]
    fn test_severity_rank() {
        assert!(Severity::Critical.outranks(Severity::Warning));
        assert!(Severity::Warning.outranks(Severity::Ok));
        assert!(!Severity::Ok.outranks(Severity::Warning));
        assert!(!Severity::Warning.outranks(Severity::Warning));
        assert!(!Severity::Unknown.outranks(Severity::Ok));
        assert!(!Severity::Critical.outranks(Severity::Unknown));
        assert_eq!(Severity::Unknown.rank(), None);
    }

    #[test]
    fn test_severity_exit_codes() {
        assert_eq!(Severity::Ok.exit_code(), 0);
        assert_eq!(Severity::Warning.exit_code(), 1);
        assert_eq!(Severity::Critical.exit_code(), 2);
        assert_eq!(Severity::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_severity_maps_to_service_state() {
        assert_eq!(ServiceState::from(Severity::Ok), ServiceState::Ok);
        assert_eq!(ServiceState::from(Severity::Warning), ServiceState::Warning);
        assert_eq!(ServiceState::from(Severity::Critical), ServiceState::Critical);
        assert_eq!(ServiceState::from(Severity::Unknown), ServiceState::Unknown);
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_thresholds_default() {
        let t = Thresholds::default();
        assert_eq!(t.min_hits, 1_000_000);
        assert_eq!(t.max_query_time_ms, 200);
        assert_eq!(t.stale_after, Duration::minutes(30));
    }

    #[test]
    fn test_healthy_is_ok() {
        let verdict = evaluate(&result(2_000_000, 50, Duration::minutes(1)), &thresholds(), now());

        assert_eq!(verdict.severity, Severity::Ok);
        assert_eq!(verdict.message, "Search processed in 50ms, 2000000 documents found");
        assert_eq!(verdict.metrics.value(QTIME_LABEL), Some(50.0));
        assert_eq!(verdict.metrics.value(DOCUMENTS_LABEL), Some(2_000_000.0));
        assert!(verdict.details.is_empty());
    }

    #[test]
    fn test_bad_status_is_terminal_critical() {
        let r = result(2_000_000, 50, Duration::minutes(1)).with_status(500);
        let verdict = evaluate(&r, &thresholds(), now());

        assert_eq!(verdict.severity, Severity::Critical);
        assert_eq!(verdict.message, MSG_INVALID_STATUS);
        assert!(verdict.metrics.is_empty());
    }

    #[test]
    fn test_bad_status_checked_before_empty_results() {
        let r = QueryResult::new(0, Vec::new(), 5).with_status(1);
        let verdict = evaluate(&r, &thresholds(), now());
        assert_eq!(verdict.message, MSG_INVALID_STATUS);
    }

    #[test]
    fn test_zero_documents_is_critical_without_metrics() {
        let r = QueryResult::new(5_000_000, Vec::new(), 5);
        let verdict = evaluate(&r, &thresholds(), now());

        assert_eq!(verdict.severity, Severity::Critical);
        assert_eq!(verdict.message, MSG_ZERO_DOCUMENTS);
        assert!(verdict.metrics.is_empty());
    }

    #[test]
    fn test_low_hits_alone_is_warning() {
        let verdict = evaluate(&result(500_000, 50, Duration::minutes(1)), &thresholds(), now());

        assert_eq!(verdict.severity, Severity::Warning);
        assert_eq!(verdict.message, MSG_LOW_HITS);
        assert_eq!(verdict.metrics, PerfData::query_metrics(50, 500_000));
        assert_eq!(verdict.details.len(), 1);
    }

    #[test]
    fn test_hits_at_minimum_is_ok() {
        let verdict = evaluate(&result(1_000_000, 50, Duration::minutes(1)), &thresholds(), now());
        assert_eq!(verdict.severity, Severity::Ok);
    }

    #[test]
    fn test_slow_query_is_critical() {
        let verdict = evaluate(&result(2_000_000, 400, Duration::minutes(1)), &thresholds(), now());

        assert_eq!(verdict.severity, Severity::Critical);
        assert_eq!(verdict.message, "Response too slow: 400 ms");
        assert_eq!(verdict.metrics.value(QTIME_LABEL), Some(400.0));
    }

    #[test]
    fn test_query_time_at_limit_is_ok() {
        let verdict = evaluate(&result(2_000_000, 200, Duration::minutes(1)), &thresholds(), now());
        assert_eq!(verdict.severity, Severity::Ok);
    }

    #[test]
    fn test_slow_query_overrides_low_hits() {
        let verdict = evaluate(&result(10, 400, Duration::minutes(1)), &thresholds(), now());

        assert_eq!(verdict.severity, Severity::Critical);
        assert!(verdict.message.contains("too slow"));
        // both triggered checks are recorded
        assert_eq!(verdict.details.len(), 2);
    }

    #[test]
    fn test_slow_query_skips_sort_key_check() {
        let r = QueryResult::new(2_000_000, vec![Document::new()], 400);
        let verdict = evaluate(&r, &thresholds(), now());
        assert_eq!(verdict.severity, Severity::Critical);
    }

    #[test]
    fn test_stale_document_is_critical() {
        let verdict = evaluate(&result(2_000_000, 50, Duration::minutes(45)), &thresholds(), now());

        assert_eq!(verdict.severity, Severity::Critical);
        assert_eq!(
            verdict.message,
            "Collection update issue: last document is too old (2024-05-01T11:15:00Z)"
        );
        assert_eq!(verdict.metrics.len(), 2);
    }

    #[test]
    fn test_stale_overrides_low_hits() {
        let verdict = evaluate(&result(10, 50, Duration::hours(3)), &thresholds(), now());
        assert_eq!(verdict.severity, Severity::Critical);
        assert!(verdict.message.starts_with("Collection update issue"));
    }

    #[test]
    fn test_age_at_limit_is_not_stale() {
        let verdict = evaluate(&result(2_000_000, 50, Duration::minutes(30)), &thresholds(), now());
        assert_eq!(verdict.severity, Severity::Ok);
    }

    #[test]
    fn test_future_document_is_not_stale() {
        let verdict = evaluate(&result(2_000_000, 50, Duration::minutes(-10)), &thresholds(), now());
        assert_eq!(verdict.severity, Severity::Ok);
    }

    #[test]
    fn test_missing_sort_key_is_unknown() {
        let r = QueryResult::new(2_000_000, vec![Document::new().with_field("id", "1")], 50);
        let verdict = evaluate(&r, &thresholds(), now());

        assert_eq!(verdict.severity, Severity::Unknown);
        assert_eq!(verdict.message, MSG_UNPARSEABLE_SORT_KEY);
        assert!(verdict.details[0].contains("missing"));
        assert!(!verdict.metrics.is_empty());
    }

    #[test]
    fn test_wrong_type_sort_key_is_unknown() {
        let r = QueryResult::new(
            2_000_000,
            vec![Document::new().with_field("last_update", 1_714_564_800_i64)],
            50,
        );
        let verdict = evaluate(&r, &thresholds(), now());

        assert_eq!(verdict.severity, Severity::Unknown);
        assert!(verdict.details[0].contains("number"));
    }

    #[test]
    fn test_unknown_replaces_warning() {
        let r = QueryResult::new(10, vec![Document::new().with_field("last_update", "soon")], 50);
        let verdict = evaluate(&r, &thresholds(), now());
        assert_eq!(verdict.severity, Severity::Unknown);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let r = result(500_000, 50, Duration::minutes(10));
        assert_eq!(evaluate(&r, &thresholds(), now()), evaluate(&r, &thresholds(), now()));
    }
}
