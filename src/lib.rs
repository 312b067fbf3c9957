//! Solhound - Solidity AST Static Analysis
//!
//! This crate analyzes solc-produced JSON ASTs with a set of detection
//! rules and reports findings with precise source-location highlighting.
//!
//! # Architecture
//!
//! - `ast`: AST handling
//!   - Query engine: pre-order structural search over the raw JSON tree
//!   - `LocationResolver`: `"start:length:fileIndex"` descriptors back to
//!     line/column coordinates and source text
//!   - Tree reduction: source-file list extraction and excluded-file removal
//! - `pipeline`: Rule execution
//!   - `Rule`: trait for detection rules (metadata + `evaluate`)
//!   - `PipelineEngine`: concurrent fan-out with per-rule timeout and
//!     failure isolation
//!   - `RuleRegistry`: rule registration and discovery
//! - `rules`: Built-in rules (reentrancy, tx.origin, delegatecall, ...)
//! - `report`: Aggregate run report
//! - `export`: Output formatting (text, JSON, Markdown, SARIF)
//! - `config`: CLI configuration
//!
//! # Usage
//!
//! ```ignore
//! use solhound::{reduce, LocationResolver, PipelineConfig, PipelineEngine, RuleContext};
//! use std::sync::Arc;
//!
//! let (tree, source_files) = reduce(raw_document, &excluded_paths);
//! let ctx = RuleContext::new(
//!     Arc::new(tree),
//!     Arc::new(source_files),
//!     LocationResolver::new(project_root, false),
//! );
//! let result = PipelineEngine::new(PipelineConfig::default()).run(ctx);
//! println!("Found {} issues", result.total_findings());
//! ```

// AST querying, location resolution, and reduction
pub mod ast;

// Rule execution pipeline
pub mod pipeline;

// Built-in rules
pub mod rules;

// Report data structures
pub mod report;

// Export formatting
pub mod export;

// CLI configuration
pub mod config;

// Re-export core AST operations for convenience
pub use ast::{
    find_nearest_ancestor_of_type, find_nodes_by_signature, find_nodes_by_type,
    find_nodes_by_type_filtered, reduce, LocationResolver, ResolvedLocation,
};

// Re-export from the pipeline framework
pub use pipeline::{
    create_finding, register_all_rules, Finding, PipelineConfig, PipelineEngine, PipelineResult,
    Precision, Rule, RuleContext, RuleError, RuleRegistry, RuleReport, Severity,
};

// Re-export report, export, and config types
pub use config::{Config, OutputFormat};
pub use export::{
    JsonFormatter, MarkdownFormatter, OutputFormatter, SarifFormatter, TextFormatter,
};
pub use report::RunReport;
