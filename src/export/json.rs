//! JSON output formatter.

use crate::export::formatter::OutputFormatter;
use crate::pipeline::RuleReport;
use crate::report::RunReport;
use serde::Serialize;

/// JSON output formatter.
#[derive(Debug, Default)]
pub struct JsonFormatter {
    /// Whether to pretty print the output.
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport) -> String {
        let json_report = JsonReport::from(report);
        if self.pretty {
            serde_json::to_string_pretty(&json_report)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(&json_report)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// JSON-serializable report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Tool version
    pub version: String,

    /// Run timestamp
    pub timestamp: String,

    /// Run duration in milliseconds
    pub duration_ms: u64,

    /// Documents analyzed
    pub files_analyzed: &'a [String],

    /// Summary statistics
    pub summary: JsonSummary,

    /// Per-rule results with their findings
    pub results: &'a [RuleReport],
}

/// Summary statistics.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl<'a> From<&'a RunReport> for JsonReport<'a> {
    fn from(report: &'a RunReport) -> Self {
        Self {
            version: report.version.clone(),
            timestamp: report.timestamp.to_rfc3339(),
            duration_ms: report.duration.as_millis() as u64,
            files_analyzed: &report.files_analyzed,
            summary: JsonSummary {
                total: report.total_findings(),
                high: report.stats.findings_by_severity.high,
                medium: report.stats.findings_by_severity.medium,
                low: report.stats.findings_by_severity.low,
                info: report.stats.findings_by_severity.info,
            },
            results: &report.results,
        }
    }
}
