//! Text output formatter.

use crate::export::formatter::{format_location, OutputFormatter};
use crate::report::RunReport;

/// Plain text output formatter.
#[derive(Debug, Default)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Solhound Analysis Report\n\
             ========================\n\n\
             Documents analyzed: {}\n\
             Duration: {:.2}s\n\n",
            report.files_analyzed.len(),
            report.duration.as_secs_f64()
        ));

        output.push_str(&format!(
            "Summary:\n\
             - High: {}\n\
             - Medium: {}\n\
             - Low: {}\n\
             - Info: {}\n\
             - Total: {}\n\n",
            report.stats.findings_by_severity.high,
            report.stats.findings_by_severity.medium,
            report.stats.findings_by_severity.low,
            report.stats.findings_by_severity.info,
            report.total_findings(),
        ));

        if report.results.is_empty() {
            output.push_str("No issues found.\n");
        } else {
            output.push_str("Findings:\n");
            output.push_str("---------\n\n");

            for result in &report.results {
                output.push_str(&format!("[{}] {}\n", result.severity, result.name));
                output.push_str(&format!("    {}\n", result.description));

                for finding in &result.findings {
                    output.push_str(&format!("    - {}\n", format_location(finding)));
                    if let Some(snippet) = &finding.snippet {
                        for line in snippet.lines() {
                            output.push_str(&format!("        {}\n", line));
                        }
                    }
                }

                if !result.action_items.is_empty() {
                    output.push_str("    Action items:\n");
                    for item in &result.action_items {
                        output.push_str(&format!("    * {}\n", item));
                    }
                }

                output.push('\n');
            }
        }

        output
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }
}
