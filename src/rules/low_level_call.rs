//! Low-Level Call Rule
//!
//! Detects bound low-level call members (`call`, `staticcall`) by their
//! function-type signature rather than their member name, so identically
//! named members on user structs are not flagged.

use crate::ast::find_nodes_by_signature;
use crate::pipeline::rule::{
    create_finding, Finding, Precision, Rule, RuleContext, RuleResult, Severity,
};

/// Bound-member type strings solc assigns to the low-level address calls.
const LOW_LEVEL_SIGNATURES: &[(&str, &str)] = &[
    ("call", "function (bytes memory) payable returns (bool,bytes memory)"),
    ("staticcall", "function (bytes memory) view returns (bool,bytes memory)"),
];

/// Rule flagging low-level calls.
#[derive(Debug, Default)]
pub struct LowLevelCallRule;

impl LowLevelCallRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for LowLevelCallRule {
    fn id(&self) -> &'static str {
        "low-level-call"
    }

    fn name(&self) -> &'static str {
        "Low-level calls"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn precision(&self) -> Precision {
        Precision::High
    }

    fn description(&self) -> &'static str {
        "Low-level calls bypass type checking and do not revert on failure; \
         their boolean return value must be checked explicitly. Prefer \
         higher-level function calls when possible."
    }

    fn action_items(&self) -> Vec<&'static str> {
        vec![
            "Check the boolean return value of every low-level call.",
            "Prefer typed external calls or OpenZeppelin's Address helpers.",
        ]
    }

    fn references(&self) -> Vec<&'static str> {
        vec![
            "https://docs.soliditylang.org/en/latest/units-and-global-variables.html#members-of-address-types",
        ]
    }

    fn evaluate(&self, ctx: &RuleContext) -> RuleResult<Vec<Finding>> {
        let mut findings = Vec::new();
        for (member, signature) in LOW_LEVEL_SIGNATURES {
            for node in find_nodes_by_signature(&ctx.tree, signature) {
                findings.push(create_finding(
                    ctx,
                    node,
                    &format!("Low-level '{}' detected; its result must be checked.", member),
                ));
            }
        }
        Ok(findings)
    }
}
