//! Rule trait and supporting types.
//!
//! A rule is an independent detector: a pure function of the normalized
//! tree, the source file list, and the project root, producing zero or more
//! findings. The pipeline guarantees isolation (a rule's error, panic, or
//! hang never affects its siblings), so rule bodies stay free of defensive
//! scaffolding.

use crate::ast::{LineSpan, LocationResolver, ResolvedLocation};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for rule evaluation.
pub type RuleResult<T> = Result<T, RuleError>;

/// Failure modes recovered at the rule boundary.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule evaluation failed: {0}")]
    Evaluation(String),

    #[error("rule panicked: {0}")]
    Panicked(String),

    #[error("rule timed out after {0:?}")]
    Timeout(Duration),
}

/// Coarse priority classification of a rule and its findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        }
    }

    /// Case-insensitive parse; unrecognized text maps to `Info`.
    pub fn parse(text: &str) -> Self {
        match text.to_ascii_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How precise a rule's matching is (its false-positive propensity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    High,
    Medium,
    Low,
}

impl Precision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::High => "High",
            Precision::Medium => "Medium",
            Precision::Low => "Low",
        }
    }
}

/// A single reported issue.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Resolved file path, or a resolver sentinel message.
    pub file: String,

    /// `"Line L Columns C1-C2"`, absent when resolution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<String>,

    /// The literal source text of the span.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Numeric coordinates for machine consumers (SARIF).
    #[serde(flatten)]
    pub span: Option<LineSpan>,

    /// Rule-specific extra fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Finding {
    pub fn new(location: ResolvedLocation) -> Self {
        Self {
            file: location.file,
            lines: location.lines,
            snippet: location.snippet,
            span: location.span,
            extra: Map::new(),
        }
    }

    /// Attach a rule-specific field.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// Shared, read-only inputs bound to every rule evaluation.
///
/// The tree and file list are behind `Arc`: immutability of the shared state
/// is enforced by the type system, not by convention.
#[derive(Debug, Clone)]
pub struct RuleContext {
    pub tree: Arc<Value>,
    pub source_files: Arc<Vec<String>>,
    pub resolver: LocationResolver,
}

impl RuleContext {
    pub fn new(tree: Arc<Value>, source_files: Arc<Vec<String>>, resolver: LocationResolver) -> Self {
        Self { tree, source_files, resolver }
    }

    pub fn project_root(&self) -> &Path {
        self.resolver.project_root()
    }

    /// Resolve a node's source location against this context's file list.
    pub fn resolve(&self, node: &Value) -> ResolvedLocation {
        self.resolver.resolve(node, &self.source_files)
    }
}

/// An independent detector with declared metadata and an executable body.
///
/// `evaluate` must be a pure function of the context; the pipeline runs
/// rules concurrently against the same shared tree.
pub trait Rule: Send + Sync {
    /// Stable identifier used for enable/disable lists, e.g. `"tx-origin"`.
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    fn severity(&self) -> Severity;

    fn precision(&self) -> Precision;

    fn description(&self) -> &'static str;

    /// Suggested remediations.
    fn action_items(&self) -> Vec<&'static str> {
        vec![]
    }

    /// Background reading.
    fn references(&self) -> Vec<&'static str> {
        vec![]
    }

    /// Links to public reports of this issue class.
    fn reports(&self) -> Vec<&'static str> {
        vec![]
    }

    /// Inspect the tree and produce findings.
    fn evaluate(&self, ctx: &RuleContext) -> RuleResult<Vec<Finding>>;
}

/// Build a finding for `node` with a `detail` message attached.
///
/// Location resolution never fails hard: an unresolvable node still yields a
/// finding whose file slot carries the resolver's sentinel message.
pub fn create_finding(ctx: &RuleContext, node: &Value, detail: &str) -> Finding {
    Finding::new(ctx.resolve(node)).with_detail("detail", detail)
}
