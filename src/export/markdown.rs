//! Markdown output formatter.

use crate::export::formatter::{format_location, OutputFormatter};
use crate::report::RunReport;

/// Markdown output formatter.
#[derive(Debug, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format(&self, report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str("# Solhound Analysis Report\n\n");
        output.push_str(&format!(
            "- Documents analyzed: {}\n- Duration: {:.2}s\n- Total findings: {}\n\n",
            report.files_analyzed.len(),
            report.duration.as_secs_f64(),
            report.total_findings(),
        ));

        output.push_str("| Severity | Count |\n|----------|-------|\n");
        output.push_str(&format!("| High | {} |\n", report.stats.findings_by_severity.high));
        output.push_str(&format!("| Medium | {} |\n", report.stats.findings_by_severity.medium));
        output.push_str(&format!("| Low | {} |\n", report.stats.findings_by_severity.low));
        output.push_str(&format!("| Info | {} |\n\n", report.stats.findings_by_severity.info));

        if report.results.is_empty() {
            output.push_str("No issues found.\n");
            return output;
        }

        for result in &report.results {
            output.push_str(&format!("## {} ({})\n\n", result.name, result.severity));
            output.push_str(&format!("{}\n\n", result.description));

            for finding in &result.findings {
                output.push_str(&format!("- `{}`\n", format_location(finding)));
                if let Some(snippet) = &finding.snippet {
                    output.push_str("\n  ```solidity\n");
                    for line in snippet.lines() {
                        output.push_str(&format!("  {}\n", line));
                    }
                    output.push_str("  ```\n");
                }
            }

            if !result.references.is_empty() {
                output.push_str("\nReferences:\n");
                for reference in &result.references {
                    output.push_str(&format!("- <{}>\n", reference));
                }
            }
            output.push('\n');
        }

        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn content_type(&self) -> &'static str {
        "text/markdown"
    }
}
