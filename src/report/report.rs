//! Run report data structures.
//!
//! Contains the aggregate types used for presenting analysis results
//! through the output formatters.

use crate::pipeline::{RuleReport, Severity};
use std::time::Duration;

/// Aggregate report over a whole run, ready for output formatting.
pub struct RunReport {
    /// Per-rule reports with findings, in pipeline completion order.
    pub results: Vec<RuleReport>,

    /// AST documents analyzed.
    pub files_analyzed: Vec<String>,

    /// Total run duration.
    pub duration: Duration,

    /// Tool version.
    pub version: String,

    /// Run timestamp.
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Statistics.
    pub stats: RunStats,
}

/// Run statistics.
#[derive(Debug, Default)]
pub struct RunStats {
    /// Number of rules that contributed findings.
    pub rules_reporting: usize,

    /// Findings by severity.
    pub findings_by_severity: FindingsBySeverity,
}

/// Finding counts by severity.
#[derive(Debug, Default)]
pub struct FindingsBySeverity {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl RunReport {
    /// Create a new run report.
    pub fn new(results: Vec<RuleReport>, files_analyzed: Vec<String>, duration: Duration) -> Self {
        let mut stats = RunStats { rules_reporting: results.len(), ..RunStats::default() };

        for result in &results {
            let count = result.findings.len();
            match result.severity {
                Severity::High => stats.findings_by_severity.high += count,
                Severity::Medium => stats.findings_by_severity.medium += count,
                Severity::Low => stats.findings_by_severity.low += count,
                Severity::Info => stats.findings_by_severity.info += count,
            }
        }

        Self {
            results,
            files_analyzed,
            duration,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            stats,
        }
    }

    /// Get total finding count.
    pub fn total_findings(&self) -> usize {
        self.results.iter().map(|r| r.findings.len()).sum()
    }

    /// Check if there are any findings.
    pub fn has_findings(&self) -> bool {
        !self.results.is_empty()
    }

    /// Check if there are high severity findings.
    pub fn has_high_severity(&self) -> bool {
        self.stats.findings_by_severity.high > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = RunReport::new(vec![], vec![], Duration::from_secs(1));
        assert_eq!(report.total_findings(), 0);
        assert!(!report.has_findings());
        assert!(!report.has_high_severity());
    }
}
