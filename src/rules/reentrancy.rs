//! Reentrancy Rule
//!
//! Detects functions that write state after making an external call, the
//! classic checks-effects-interactions violation. The external call hands
//! control to the callee, which can re-enter the function before the
//! pending state update lands.

use crate::ast::{
    find_nearest_ancestor_of_type, find_nodes_by_type, node_id, src_offset, type_string,
};
use crate::pipeline::rule::{
    create_finding, Finding, Precision, Rule, RuleContext, RuleResult, Severity,
};
use serde_json::Value;

/// Address members that transfer control to another contract.
const EXTERNAL_CALL_MEMBERS: &[&str] = &["call", "send", "transfer"];

/// Rule flagging state writes after external calls.
#[derive(Debug, Default)]
pub struct ReentrancyRule;

impl ReentrancyRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ReentrancyRule {
    fn id(&self) -> &'static str {
        "reentrancy"
    }

    fn name(&self) -> &'static str {
        "Reentrancy"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn precision(&self) -> Precision {
        Precision::Medium
    }

    fn description(&self) -> &'static str {
        "An external call followed by a state update lets the callee \
         re-enter the function while the contract is still in its \
         pre-update state, classically enabling repeated withdrawals."
    }

    fn action_items(&self) -> Vec<&'static str> {
        vec![
            "Follow the checks-effects-interactions pattern: update state \
             before making external calls.",
            "Consider a reentrancy guard (e.g. OpenZeppelin's \
             ReentrancyGuard).",
        ]
    }

    fn references(&self) -> Vec<&'static str> {
        vec![
            "https://swcregistry.io/docs/SWC-107",
            "https://consensys.github.io/smart-contract-best-practices/attacks/reentrancy/",
        ]
    }

    fn reports(&self) -> Vec<&'static str> {
        vec!["https://blog.chain.link/reentrancy-attacks-and-the-dao-hack/"]
    }

    fn evaluate(&self, ctx: &RuleContext) -> RuleResult<Vec<Finding>> {
        let mut findings = Vec::new();

        for call in external_call_nodes(&ctx.tree) {
            let Some(call_id) = node_id(call) else { continue };
            let Some(call_offset) = src_offset(call) else { continue };

            let Some(function) =
                find_nearest_ancestor_of_type(&ctx.tree, call_id, "FunctionDefinition")
            else {
                continue;
            };
            if has_reentrancy_guard(function) {
                continue;
            }

            if let Some(write_offset) = state_write_after(function, call_offset) {
                let mut finding = create_finding(
                    ctx,
                    call,
                    "State is written after this external call; the callee can \
                     re-enter before the update takes effect.",
                );
                if let Some(name) = function.get("name").and_then(Value::as_str) {
                    finding = finding.with_detail("function", name);
                }
                finding = finding.with_detail("state_write_offset", write_offset);
                findings.push(finding);
            }
        }

        Ok(findings)
    }
}

/// Member accesses on addresses that hand control to another contract.
///
/// The member name alone is not enough: user structs may carry fields named
/// `call` or `send`, so the receiver's type string must be an address.
fn external_call_nodes(tree: &Value) -> Vec<&Value> {
    find_nodes_by_type(tree, &["MemberAccess"])
        .into_iter()
        .filter(|node| {
            let member = node.get("memberName").and_then(Value::as_str);
            let on_address = node
                .get("expression")
                .and_then(|e| type_string(e).map(|t| t.starts_with("address")))
                .unwrap_or(false);
            member.is_some_and(|m| EXTERNAL_CALL_MEMBERS.contains(&m)) && on_address
        })
        .collect()
}

/// Whether the function carries a nonReentrant-style modifier.
fn has_reentrancy_guard(function: &Value) -> bool {
    let Some(modifiers) = function.get("modifiers").and_then(Value::as_array) else {
        return false;
    };
    modifiers.iter().any(|m| {
        m.get("modifierName")
            .and_then(|n| n.get("name"))
            .and_then(Value::as_str)
            .map(|name| {
                let name = name.to_ascii_lowercase();
                name == "nonreentrant" || name.contains("reentran")
            })
            .unwrap_or(false)
    })
}

/// First assignment in the function whose source offset follows the call.
fn state_write_after(function: &Value, call_offset: usize) -> Option<u64> {
    find_nodes_by_type(function, &["Assignment"])
        .into_iter()
        .filter_map(src_offset)
        .find(|&offset| offset > call_offset)
        .map(|offset| offset as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LocationResolver;
    use serde_json::json;
    use std::sync::Arc;

    fn withdraw_function(modifiers: Value) -> Value {
        json!({
            "nodeType": "SourceUnit",
            "nodes": [{
                "nodeType": "FunctionDefinition",
                "id": 1,
                "name": "withdraw",
                "modifiers": modifiers,
                "body": {
                    "nodeType": "Block",
                    "id": 2,
                    "statements": [
                        {
                            "nodeType": "FunctionCall",
                            "id": 3,
                            "expression": {
                                "nodeType": "MemberAccess",
                                "id": 4,
                                "memberName": "call",
                                "src": "100:20:0",
                                "expression": {
                                    "nodeType": "Identifier",
                                    "name": "recipient",
                                    "typeDescriptions": { "typeString": "address payable" }
                                }
                            }
                        },
                        {
                            "nodeType": "Assignment",
                            "id": 5,
                            "src": "140:12:0",
                            "operator": "="
                        }
                    ]
                }
            }]
        })
    }

    fn context_for(tree: Value) -> RuleContext {
        RuleContext::new(Arc::new(tree), Arc::new(vec![]), LocationResolver::new(".", false))
    }

    #[test]
    fn test_flags_state_write_after_call() {
        let ctx = context_for(withdraw_function(json!([])));
        let findings = ReentrancyRule::new().evaluate(&ctx).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].extra["function"], "withdraw");
        assert_eq!(findings[0].extra["state_write_offset"], 140);
    }

    #[test]
    fn test_guarded_function_is_skipped() {
        let guarded = withdraw_function(json!([
            { "modifierName": { "name": "nonReentrant" } }
        ]));
        let findings = ReentrancyRule::new().evaluate(&context_for(guarded)).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_write_before_call_is_clean() {
        let mut tree = withdraw_function(json!([]));
        // Move the assignment before the call.
        tree["nodes"][0]["body"]["statements"][1]["src"] = json!("50:12:0");
        let findings = ReentrancyRule::new().evaluate(&context_for(tree)).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_struct_member_named_call_is_ignored() {
        let tree = json!({
            "nodeType": "SourceUnit",
            "nodes": [{
                "nodeType": "FunctionDefinition",
                "id": 1,
                "name": "config",
                "body": {
                    "nodeType": "MemberAccess",
                    "id": 2,
                    "memberName": "call",
                    "src": "10:9:0",
                    "expression": {
                        "nodeType": "Identifier",
                        "name": "settings",
                        "typeDescriptions": { "typeString": "struct Settings storage ref" }
                    }
                }
            }]
        });
        let findings = ReentrancyRule::new().evaluate(&context_for(tree)).unwrap();
        assert!(findings.is_empty());
    }
}
