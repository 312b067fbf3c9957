//! Delegatecall Rule
//!
//! Detects `delegatecall` invocations, which execute foreign code in the
//! calling contract's storage context.

use crate::ast::find_nodes_by_type_filtered;
use crate::pipeline::rule::{
    create_finding, Finding, Precision, Rule, RuleContext, RuleResult, Severity,
};
use serde_json::json;

/// Rule flagging `delegatecall` usage.
#[derive(Debug, Default)]
pub struct DelegatecallRule;

impl DelegatecallRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DelegatecallRule {
    fn id(&self) -> &'static str {
        "delegatecall"
    }

    fn name(&self) -> &'static str {
        "Delegatecall to external contract"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn precision(&self) -> Precision {
        Precision::Medium
    }

    fn description(&self) -> &'static str {
        "delegatecall runs the callee's code with the caller's storage, \
         balance, and msg context. If the callee address is attacker \
         influenced, the attacker fully controls the calling contract's \
         state."
    }

    fn action_items(&self) -> Vec<&'static str> {
        vec![
            "Only delegatecall into trusted, immutable implementations.",
            "Validate the callee address against an allowlist.",
        ]
    }

    fn references(&self) -> Vec<&'static str> {
        vec!["https://swcregistry.io/docs/SWC-112"]
    }

    fn reports(&self) -> Vec<&'static str> {
        vec!["https://blog.openzeppelin.com/on-the-parity-wallet-multisig-hack-405a8c12e8f7"]
    }

    fn evaluate(&self, ctx: &RuleContext) -> RuleResult<Vec<Finding>> {
        let calls = find_nodes_by_type_filtered(
            &ctx.tree,
            &["MemberAccess"],
            "memberName",
            &json!("delegatecall"),
        );
        Ok(calls
            .into_iter()
            .map(|node| {
                create_finding(
                    ctx,
                    node,
                    "delegatecall executes untrusted code in this contract's storage context.",
                )
            })
            .collect())
    }
}
