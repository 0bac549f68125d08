//! Verdict Output.
//!
//! Renders a verdict for the monitoring supervisor: the Nagios plugin text
//! format (status line, perfdata after `|`, long output lines) or JSON. The
//! status word and exit code are those of the verdict's [`ServiceState`].

use nagiosplugin::ServiceState;
use serde::Serialize;

use crate::monitoring::health::Verdict;
use crate::monitoring::metrics::PerfDatum;

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Nagios plugin text
    #[default]
    Text,
    /// JSON format
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "nagios" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON REPORT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct JsonReport<'a> {
    status: String,
    exit_code: i32,
    message: &'a str,
    metrics: Vec<&'a PerfDatum>,
    details: &'a [String],
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMATTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Verdict renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormatter {
    /// Output format
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create new formatter
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Get format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render the verdict
    pub fn render(&self, verdict: &Verdict) -> String {
        match self.format {
            OutputFormat::Text => render_text(verdict),
            OutputFormat::Json => render_json(verdict),
        }
    }

    /// Print the verdict to stdout and return the exit code
    pub fn emit(&self, verdict: &Verdict) -> i32 {
        println!("{}", self.render(verdict));
        verdict.exit_code()
    }
}

/// Nagios plugin output: `STATUS: message | perfdata` plus long output lines
pub fn render_text(verdict: &Verdict) -> String {
    let state: ServiceState = verdict.severity.into();

    // `|` separates perfdata, so it cannot appear in the text part
    let mut out = format!("{}: {}", state, verdict.message.replace('|', "/"));

    if !verdict.metrics.is_empty() {
        out.push_str(" | ");
        out.push_str(&verdict.metrics.to_string());
    }

    for detail in &verdict.details {
        out.push('\n');
        out.push_str(&detail.replace('|', "/"));
    }

    out
}

/// Single-line JSON report
pub fn render_json(verdict: &Verdict) -> String {
    let report = JsonReport {
        status: verdict.severity.service_state().to_string(),
        exit_code: verdict.exit_code(),
        message: &verdict.message,
        metrics: verdict.metrics.iter().collect(),
        details: &verdict.details,
    };

    serde_json::to_string(&report).unwrap_or_else(|e| {
        format!(
            r#"{{"status":"UNKNOWN","exit_code":3,"message":"failed to encode report: {}"}}"#,
            e
        )
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
