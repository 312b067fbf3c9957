//! Output formatter trait.

use crate::pipeline::Finding;
use crate::report::RunReport;

/// Trait for output formatters.
pub trait OutputFormatter {
    /// Format the run report.
    fn format(&self, report: &RunReport) -> String;

    /// Get the file extension for this format.
    fn extension(&self) -> &'static str;

    /// Get the content type for this format.
    fn content_type(&self) -> &'static str;
}

/// Format a finding's location for display.
pub fn format_location(finding: &Finding) -> String {
    match &finding.lines {
        Some(lines) => format!("{} ({})", finding.file, lines),
        None => finding.file.clone(),
    }
}
