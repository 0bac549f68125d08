//! Performance Data.
//!
//! Numeric measurements attached to a verdict for trending, independent of
//! the pass/fail severity. Serialized in the Nagios perfdata syntax
//! (`label=value[unit]`).

use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// METRIC LABELS
// ═══════════════════════════════════════════════════════════════════════════════

/// Label of the server-reported query time metric
pub const QTIME_LABEL: &str = "qtime";

/// Label of the matching document count metric
pub const DOCUMENTS_LABEL: &str = "documents";

// ═══════════════════════════════════════════════════════════════════════════════
// PERF UNIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Unit of measurement of a perfdata value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerfUnit {
    /// Milliseconds
    Milliseconds,
    /// Continuous counter
    Counter,
}

impl PerfUnit {
    /// Unit-of-measure suffix used in perfdata output
    pub fn suffix(&self) -> &'static str {
        match self {
            PerfUnit::Milliseconds => "ms",
            PerfUnit::Counter => "c",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PERF DATUM
// ═══════════════════════════════════════════════════════════════════════════════

/// A single labelled measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfDatum {
    /// Metric label
    pub label: String,
    /// Measured value
    pub value: f64,
    /// Unit of the value
    pub unit: PerfUnit,
}

impl PerfDatum {
    /// Create new datum
    pub fn new(label: impl Into<String>, value: f64, unit: PerfUnit) -> Self {
        Self {
            label: label.into(),
            value,
            unit,
        }
    }

    /// Quote labels that the perfdata grammar cannot carry bare
    fn quoted_label(&self) -> String {
        if self.label.contains(|c: char| c == ' ' || c == '=' || c == '\'') {
            format!("'{}'", self.label.replace('\'', "''"))
        } else {
            self.label.clone()
        }
    }
}

impl fmt::Display for PerfDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}{}", self.quoted_label(), self.value, self.unit.suffix())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PERF DATA
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered set of measurements, unique by label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerfData {
    data: Vec<PerfDatum>,
}

impl PerfData {
    /// Create empty perfdata
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a datum; a datum with the same label is replaced in place
    pub fn add(&mut self, datum: PerfDatum) {
        match self.data.iter_mut().find(|d| d.label == datum.label) {
            Some(existing) => *existing = datum,
            None => self.data.push(datum),
        }
    }

    /// Builder-style [`PerfData::add`]
    pub fn with(mut self, datum: PerfDatum) -> Self {
        self.add(datum);
        self
    }

    /// Look up a datum by label
    pub fn get(&self, label: &str) -> Option<&PerfDatum> {
        self.data.iter().find(|d| d.label == label)
    }

    /// Value of a datum by label
    pub fn value(&self, label: &str) -> Option<f64> {
        self.get(label).map(|d| d.value)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PerfDatum> {
        self.data.iter()
    }

    /// Number of data
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Query-time and document-count pair attached to most verdicts
    pub fn query_metrics(query_time_ms: u64, documents: u64) -> Self {
        Self::new()
            .with(PerfDatum::new(QTIME_LABEL, query_time_ms as f64, PerfUnit::Milliseconds))
            .with(PerfDatum::new(DOCUMENTS_LABEL, documents as f64, PerfUnit::Counter))
    }
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.data.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
