//! Rule Execution Pipeline
//!
//! Coordinates the fan-out of rule units against the normalized tree:
//!
//! - **Scheduling**: rules run concurrently on a bounded worker pool
//! - **Isolation**: one rule's error, panic, or hang never aborts the batch
//! - **Timeout**: each rule gets a fixed wall-clock budget
//! - **Aggregation**: findings are collected in completion order and
//!   filtered by the configured severity exclusions
//!
//! # Usage
//!
//! ```ignore
//! use solhound::{PipelineConfig, PipelineEngine, RuleContext};
//!
//! let engine = PipelineEngine::new(PipelineConfig::default());
//! let result = engine.run(ctx);
//! println!("Found {} issues", result.total_findings());
//! ```

pub mod engine;
pub mod registry;
pub mod rule;

pub use engine::{
    PipelineConfig, PipelineEngine, PipelineResult, RuleReport, RuleStats, DEFAULT_RULE_TIMEOUT,
};
pub use registry::{register_all_rules, RuleRegistry};
pub use rule::{
    create_finding, Finding, Precision, Rule, RuleContext, RuleError, RuleResult, Severity,
};
