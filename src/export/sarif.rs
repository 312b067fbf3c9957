//! SARIF output formatter.
//!
//! SARIF (Static Analysis Results Interchange Format) is a standard format
//! for the output of static analysis tools.

use crate::export::formatter::OutputFormatter;
use crate::pipeline::{RuleReport, Severity};
use crate::report::RunReport;
use serde::{Deserialize, Serialize};

/// SARIF output formatter.
#[derive(Debug, Default)]
pub struct SarifFormatter {
    /// Whether to pretty print the output.
    pub pretty: bool,
}

impl SarifFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for SarifFormatter {
    fn format(&self, report: &RunReport) -> String {
        let sarif = SarifLog::from(report);
        if self.pretty {
            serde_json::to_string_pretty(&sarif)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(&sarif).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }

    fn extension(&self) -> &'static str {
        "sarif"
    }

    fn content_type(&self) -> &'static str {
        "application/sarif+json"
    }
}

/// SARIF log structure (v2.1.0).
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

/// A single run of analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
    pub artifacts: Vec<SarifArtifact>,
    pub invocations: Vec<SarifInvocation>,
}

/// Tool information.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifToolDriver,
}

/// Tool driver information.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifToolDriver {
    pub name: String,
    pub version: String,
    #[serde(rename = "informationUri")]
    pub information_uri: String,
    pub rules: Vec<SarifRule>,
}

/// A rule.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "fullDescription", skip_serializing_if = "Option::is_none")]
    pub full_description: Option<SarifMessage>,
    #[serde(rename = "helpUri", skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
    #[serde(rename = "defaultConfiguration")]
    pub default_configuration: SarifRuleConfiguration,
}

/// Rule configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRuleConfiguration {
    pub level: String,
}

/// A message.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

/// An analysis result.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

/// A location.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

/// A physical location.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

/// An artifact location.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifArtifactLocation {
    pub uri: String,
}

/// A region in a file.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
    #[serde(rename = "startColumn", skip_serializing_if = "Option::is_none")]
    pub start_column: Option<usize>,
    #[serde(rename = "endColumn", skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

/// An artifact (source file).
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifArtifact {
    pub location: SarifArtifactLocation,
}

/// Invocation information.
#[derive(Debug, Serialize, Deserialize)]
pub struct SarifInvocation {
    #[serde(rename = "executionSuccessful")]
    pub execution_successful: bool,
    #[serde(rename = "endTimeUtc")]
    pub end_time_utc: String,
}

impl From<&RunReport> for SarifLog {
    fn from(report: &RunReport) -> Self {
        let rules: Vec<_> = report.results.iter().map(sarif_rule).collect();

        let results: Vec<_> = report
            .results
            .iter()
            .flat_map(|result| {
                result.findings.iter().map(move |finding| SarifResult {
                    rule_id: result.id.clone(),
                    level: severity_to_sarif(result.severity),
                    message: SarifMessage {
                        text: finding
                            .extra
                            .get("detail")
                            .and_then(|d| d.as_str())
                            .unwrap_or(&result.description)
                            .to_string(),
                    },
                    locations: vec![SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation {
                                uri: finding.file.clone(),
                            },
                            region: finding.span.map(|span| SarifRegion {
                                start_line: span.line,
                                start_column: Some(span.start_column),
                                end_column: Some(span.end_column),
                            }),
                        },
                    }],
                })
            })
            .collect();

        let artifacts: Vec<_> = report
            .files_analyzed
            .iter()
            .map(|f| SarifArtifact { location: SarifArtifactLocation { uri: f.clone() } })
            .collect();

        SarifLog {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json".to_string(),
            version: "2.1.0".to_string(),
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifToolDriver {
                        name: "Solhound".to_string(),
                        version: report.version.clone(),
                        information_uri: "https://github.com/example/solhound".to_string(),
                        rules,
                    },
                },
                results,
                artifacts,
                invocations: vec![SarifInvocation {
                    execution_successful: true,
                    end_time_utc: report.timestamp.to_rfc3339(),
                }],
            }],
        }
    }
}

fn sarif_rule(result: &RuleReport) -> SarifRule {
    SarifRule {
        id: result.id.clone(),
        name: result.name.clone(),
        short_description: SarifMessage { text: result.name.clone() },
        full_description: Some(SarifMessage { text: result.description.clone() }),
        help_uri: result.references.first().cloned(),
        default_configuration: SarifRuleConfiguration {
            level: severity_to_sarif(result.severity),
        },
    }
}

fn severity_to_sarif(severity: Severity) -> String {
    match severity {
        Severity::High => "error".to_string(),
        Severity::Medium => "warning".to_string(),
        Severity::Low | Severity::Info => "note".to_string(),
    }
}
