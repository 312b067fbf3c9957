//! tx.origin Rule
//!
//! Detects usage of `tx.origin` for authentication.

use crate::ast::{find_nearest_ancestor_of_type, find_nodes_by_type_filtered, node_id};
use crate::pipeline::rule::{
    create_finding, Finding, Precision, Rule, RuleContext, RuleResult, Severity,
};
use serde_json::{json, Value};

/// Rule flagging `tx.origin` reads.
///
/// Using `tx.origin` for authentication is vulnerable to phishing attacks:
/// an attacker can trick a user into calling a malicious contract that then
/// calls the vulnerable contract, and `tx.origin` will still be the user's
/// address.
#[derive(Debug, Default)]
pub struct TxOriginRule;

impl TxOriginRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TxOriginRule {
    fn id(&self) -> &'static str {
        "tx-origin"
    }

    fn name(&self) -> &'static str {
        "Dangerous use of tx.origin"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn precision(&self) -> Precision {
        Precision::High
    }

    fn description(&self) -> &'static str {
        "tx.origin refers to the original external account that started the \
         transaction, not the immediate caller. Authentication based on it \
         can be bypassed by routing the call through an attacker contract."
    }

    fn action_items(&self) -> Vec<&'static str> {
        vec!["Use msg.sender instead of tx.origin for authentication."]
    }

    fn references(&self) -> Vec<&'static str> {
        vec![
            "https://swcregistry.io/docs/SWC-115",
            "https://consensys.github.io/smart-contract-best-practices/development-recommendations/solidity-specific/tx-origin/",
        ]
    }

    fn evaluate(&self, ctx: &RuleContext) -> RuleResult<Vec<Finding>> {
        let mut findings = Vec::new();

        let accesses =
            find_nodes_by_type_filtered(&ctx.tree, &["MemberAccess"], "memberName", &json!("origin"));
        for node in accesses {
            if !is_tx_expression(node) {
                continue;
            }
            let mut finding = create_finding(
                ctx,
                node,
                "tx.origin used for authentication. Consider using msg.sender instead.",
            );
            if let Some(function) = enclosing_function_name(&ctx.tree, node) {
                finding = finding.with_detail("function", function);
            }
            findings.push(finding);
        }

        Ok(findings)
    }
}

/// The member access must hang off the `tx` builtin, not some struct field
/// that happens to be called `origin`.
fn is_tx_expression(node: &Value) -> bool {
    node.get("expression")
        .and_then(|e| e.get("name"))
        .and_then(Value::as_str)
        == Some("tx")
}

fn enclosing_function_name(tree: &Value, node: &Value) -> Option<String> {
    let id = node_id(node)?;
    let function = find_nearest_ancestor_of_type(tree, id, "FunctionDefinition")?;
    function.get("name").and_then(Value::as_str).map(str::to_string)
}
