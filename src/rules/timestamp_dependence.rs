//! Timestamp Dependence Rule
//!
//! Detects reads of `block.timestamp` (and the deprecated alias `now`),
//! which validators can manipulate within a small window.

use crate::ast::{find_nodes_by_type, find_nodes_by_type_filtered};
use crate::pipeline::rule::{
    create_finding, Finding, Precision, Rule, RuleContext, RuleResult, Severity,
};
use serde_json::{json, Value};

/// Rule flagging block-timestamp reads.
#[derive(Debug, Default)]
pub struct TimestampDependenceRule;

impl TimestampDependenceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TimestampDependenceRule {
    fn id(&self) -> &'static str {
        "timestamp-dependence"
    }

    fn name(&self) -> &'static str {
        "Block timestamp dependence"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn precision(&self) -> Precision {
        Precision::Medium
    }

    fn description(&self) -> &'static str {
        "block.timestamp can be influenced by the block producer within a \
         small window. Logic that gates value transfers or randomness on it \
         can be gamed."
    }

    fn action_items(&self) -> Vec<&'static str> {
        vec![
            "Avoid timestamp comparisons with sub-minute precision.",
            "Never derive randomness from block attributes.",
        ]
    }

    fn references(&self) -> Vec<&'static str> {
        vec!["https://swcregistry.io/docs/SWC-116"]
    }

    fn evaluate(&self, ctx: &RuleContext) -> RuleResult<Vec<Finding>> {
        let mut findings = Vec::new();

        let accesses = find_nodes_by_type_filtered(
            &ctx.tree,
            &["MemberAccess"],
            "memberName",
            &json!("timestamp"),
        );
        for node in accesses {
            if is_block_expression(node) {
                findings.push(create_finding(
                    ctx,
                    node,
                    "block.timestamp read; block producers can skew it.",
                ));
            }
        }

        // The deprecated global alias.
        for node in find_nodes_by_type(&ctx.tree, &["Identifier"]) {
            if node.get("name").and_then(Value::as_str) == Some("now") {
                findings.push(create_finding(
                    ctx,
                    node,
                    "'now' is a deprecated alias of block.timestamp.",
                ));
            }
        }

        Ok(findings)
    }
}

fn is_block_expression(node: &Value) -> bool {
    node.get("expression")
        .and_then(|e| e.get("name"))
        .and_then(Value::as_str)
        == Some("block")
}
