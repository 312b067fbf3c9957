//! CLI configuration.
//!
//! Layered configuration: a TOML file provides defaults, command-line flags
//! override individual fields. The core pipeline receives explicit config
//! structs; nothing here is process-global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
    Sarif,
}

impl OutputFormat {
    /// Parse a CLI format name; unknown names fall back to text.
    pub fn parse(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            "markdown" | "md" => OutputFormat::Markdown,
            "sarif" => OutputFormat::Sarif,
            _ => OutputFormat::Text,
        }
    }
}

/// Tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub rules: RulesConfig,
    pub output: OutputConfig,
    pub project: ProjectConfig,
}

/// `[analysis]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Enable parallel rule execution.
    pub parallel: bool,

    /// Maximum number of worker threads (0 = auto-detect).
    pub max_workers: usize,

    /// Wall-clock budget per rule, in seconds.
    pub rule_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { parallel: true, max_workers: 0, rule_timeout_secs: 30 }
    }
}

/// `[rules]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule IDs to enable (empty = all).
    pub enabled: Vec<String>,

    /// Rule IDs to disable.
    pub disabled: Vec<String>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: text, json, markdown, sarif.
    pub format: OutputFormat,

    /// Severities suppressed from the report, matched case-insensitively.
    pub exclude_severities: Vec<String>,

    /// Report absolute paths instead of project-relative ones.
    pub absolute_paths: bool,
}

/// `[project]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Root directory against which source paths resolve.
    pub root: PathBuf,

    /// Path substrings whose files are dropped during tree reduction.
    pub excluded_paths: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("."), excluded_paths: Vec::new() }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Default configuration file contents for `init-config`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Solhound Configuration File

[analysis]
# Enable parallel rule execution
parallel = true
# Maximum number of worker threads (0 = auto-detect)
max_workers = 0
# Wall-clock budget per rule, in seconds
rule_timeout_secs = 30

[rules]
# Explicitly enable specific rules (empty = all enabled)
# enabled = ["reentrancy", "tx-origin"]
enabled = []

# Explicitly disable specific rules
disabled = []

[output]
# Output format: "text", "json", "markdown", "sarif"
format = "text"
# Severities to suppress from the report
exclude_severities = []
# Report absolute paths instead of project-relative ones
absolute_paths = false

[project]
# Root directory against which source paths resolve
root = "."
# Files whose path contains any of these substrings are excluded
excluded_paths = [
    "node_modules",
    "lib/forge-std",
]
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analysis.parallel);
        assert_eq!(config.analysis.rule_timeout_secs, 30);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.project.root, PathBuf::from("."));
    }

    #[test]
    fn test_template_round_trips() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(config.analysis.parallel);
        assert_eq!(config.project.excluded_paths.len(), 2);
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str("[output]\nformat = \"sarif\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Sarif);
        assert!(config.analysis.parallel);
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("md"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::parse("anything"), OutputFormat::Text);
    }
}
