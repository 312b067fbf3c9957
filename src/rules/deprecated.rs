//! Deprecated Constructs Rule
//!
//! Detects constructs removed or deprecated in modern Solidity: `sha3`,
//! `suicide`, `callcode`, `throw`, and `block.blockhash`.

use crate::ast::{find_nodes_by_type, find_nodes_by_type_filtered};
use crate::pipeline::rule::{
    create_finding, Finding, Precision, Rule, RuleContext, RuleResult, Severity,
};
use serde_json::{json, Value};

/// Deprecated global identifiers and their replacements.
const DEPRECATED_GLOBALS: &[(&str, &str)] =
    &[("sha3", "keccak256"), ("suicide", "selfdestruct")];

/// Rule flagging deprecated language constructs.
#[derive(Debug, Default)]
pub struct DeprecatedConstructsRule;

impl DeprecatedConstructsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DeprecatedConstructsRule {
    fn id(&self) -> &'static str {
        "deprecated-constructs"
    }

    fn name(&self) -> &'static str {
        "Deprecated language constructs"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn precision(&self) -> Precision {
        Precision::High
    }

    fn description(&self) -> &'static str {
        "Deprecated constructs behave subtly differently from their \
         replacements and are removed in newer compiler versions."
    }

    fn action_items(&self) -> Vec<&'static str> {
        vec![
            "Replace sha3 with keccak256, suicide with selfdestruct, and \
             throw with revert().",
        ]
    }

    fn references(&self) -> Vec<&'static str> {
        vec!["https://swcregistry.io/docs/SWC-111"]
    }

    fn evaluate(&self, ctx: &RuleContext) -> RuleResult<Vec<Finding>> {
        let mut findings = Vec::new();

        for (name, replacement) in DEPRECATED_GLOBALS {
            let uses =
                find_nodes_by_type_filtered(&ctx.tree, &["Identifier"], "name", &json!(name));
            for node in uses {
                findings.push(create_finding(
                    ctx,
                    node,
                    &format!("'{}' is deprecated; use '{}' instead.", name, replacement),
                ));
            }
        }

        // addr.callcode predates delegatecall and does not forward msg.sender.
        let callcodes = find_nodes_by_type_filtered(
            &ctx.tree,
            &["MemberAccess"],
            "memberName",
            &json!("callcode"),
        );
        for node in callcodes {
            findings.push(create_finding(
                ctx,
                node,
                "'callcode' is deprecated; use 'delegatecall' instead.",
            ));
        }

        for node in find_nodes_by_type(&ctx.tree, &["Throw"]) {
            findings.push(create_finding(
                ctx,
                node,
                "'throw' is deprecated; use revert(), require() or assert().",
            ));
        }

        // block.blockhash became the global blockhash() in 0.5.
        let accesses = find_nodes_by_type_filtered(
            &ctx.tree,
            &["MemberAccess"],
            "memberName",
            &json!("blockhash"),
        );
        for node in accesses {
            if node
                .get("expression")
                .and_then(|e| e.get("name"))
                .and_then(Value::as_str)
                == Some("block")
            {
                findings.push(create_finding(
                    ctx,
                    node,
                    "'block.blockhash' is deprecated; use the global blockhash().",
                ));
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LocationResolver;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_flags_deprecated_constructs() {
        let tree = json!({
            "nodeType": "SourceUnit",
            "nodes": [
                { "nodeType": "Identifier", "name": "sha3" },
                { "nodeType": "Identifier", "name": "suicide" },
                { "nodeType": "Throw" },
                {
                    "nodeType": "MemberAccess",
                    "memberName": "blockhash",
                    "expression": { "nodeType": "Identifier", "name": "block" }
                },
                { "nodeType": "Identifier", "name": "keccak256" }
            ]
        });
        let ctx = RuleContext::new(
            Arc::new(tree),
            Arc::new(vec![]),
            LocationResolver::new(".", false),
        );
        let findings = DeprecatedConstructsRule::new().evaluate(&ctx).unwrap();
        assert_eq!(findings.len(), 4);
    }
}
