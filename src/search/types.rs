//! Search result model and Solr wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::utils::constants::SEARCH_ROWS;

// ═══════════════════════════════════════════════════════════════════════════════
// DOCUMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// A returned document: field name to JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Create empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Read a field as a UTC timestamp.
    ///
    /// Solr renders date fields as RFC 3339 strings in UTC
    /// (`2024-05-01T12:00:00Z`, optionally with fractional seconds).
    pub fn timestamp(&self, name: &str) -> std::result::Result<DateTime<Utc>, FieldError> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Err(FieldError::Missing {
                field: name.to_string(),
            }),
            Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| FieldError::Unparseable {
                    field: name.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                }),
            Some(other) => Err(FieldError::WrongType {
                field: name.to_string(),
                found: json_type_name(other),
            }),
        }
    }
}

/// JSON type with its indefinite article, for messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Why a document field could not be read as a timestamp
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field absent from the document
    #[error("field '{field}' is missing from the document")]
    Missing {
        /// Field name
        field: String,
    },

    /// Field present but not a string
    #[error("field '{field}' holds {found}, expected a date string")]
    WrongType {
        /// Field name
        field: String,
        /// JSON type found
        found: &'static str,
    },

    /// Field is a string but not a valid timestamp
    #[error("field '{field}' value '{value}' is not a valid timestamp: {reason}")]
    Unparseable {
        /// Field name
        field: String,
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of one search query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Search status (0 = the search call succeeded)
    pub status: i64,
    /// Matching documents in the whole collection
    pub num_found: u64,
    /// Documents actually returned
    pub documents: Vec<Document>,
    /// Server-reported processing time
    pub query_time_ms: u64,
}

impl QueryResult {
    /// Create a successful result
    pub fn new(num_found: u64, documents: Vec<Document>, query_time_ms: u64) -> Self {
        Self {
            status: 0,
            num_found,
            documents,
            query_time_ms,
        }
    }

    /// Set search status
    pub fn with_status(mut self, status: i64) -> Self {
        self.status = status;
        self
    }

    /// First (most recent, given a descending sort) document
    pub fn first_document(&self) -> Option<&Document> {
        self.documents.first()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SEARCH QUERY
// ═══════════════════════════════════════════════════════════════════════════════

/// Parameters of the health query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query (`q`)
    pub query: String,
    /// Field to sort on, descending
    pub sort_key: String,
    /// Rows to return
    pub rows: u32,
}

impl SearchQuery {
    /// Create a query returning the single most recent document
    pub fn new(query: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sort_key: sort_key.into(),
            rows: SEARCH_ROWS,
        }
    }

    /// URL query parameters
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query.clone()),
            ("rows", self.rows.to_string()),
            ("sort", format!("{} desc", self.sort_key)),
            ("wt", "json".to_string()),
        ]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOLR WIRE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Body of a `select` response written by the JSON response writer
#[derive(Debug, Deserialize)]
pub struct SelectResponse {
    /// Response header
    #[serde(rename = "responseHeader")]
    pub response_header: ResponseHeader,
    /// Result set (absent on error responses)
    #[serde(default)]
    pub response: Option<ResultSet>,
}

/// Solr response header
#[derive(Debug, Deserialize)]
pub struct ResponseHeader {
    /// Request status (0 = success)
    pub status: i64,
    /// Query time in milliseconds
    #[serde(rename = "QTime", default)]
    pub qtime: u64,
}

/// Solr result set
#[derive(Debug, Deserialize)]
pub struct ResultSet {
    /// Total matching documents
    #[serde(rename = "numFound")]
    pub num_found: u64,
    /// Returned documents
    #[serde(default)]
    pub docs: Vec<Document>,
}

impl From<SelectResponse> for QueryResult {
    fn from(response: SelectResponse) -> Self {
        let (num_found, documents) = match response.response {
            Some(set) => (set.num_found, set.docs),
            None => (0, Vec::new()),
        };

        Self {
            status: response.response_header.status,
            num_found,
            documents,
            query_time_ms: response.response_header.qtime,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
