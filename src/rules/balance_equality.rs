//! Balance Equality Rule
//!
//! Detects strict equality comparisons against an address balance. A
//! contract's balance can be forcibly changed (selfdestruct, coinbase
//! rewards), so `==`/`!=` checks on it are fragile guards.

use crate::ast::find_nodes_by_type_filtered;
use crate::pipeline::rule::{
    create_finding, Finding, Precision, Rule, RuleContext, RuleResult, Severity,
};
use serde_json::{json, Value};

/// Rule flagging strict balance comparisons.
#[derive(Debug, Default)]
pub struct BalanceEqualityRule;

impl BalanceEqualityRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for BalanceEqualityRule {
    fn id(&self) -> &'static str {
        "balance-equality"
    }

    fn name(&self) -> &'static str {
        "Strict balance equality"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn precision(&self) -> Precision {
        Precision::High
    }

    fn description(&self) -> &'static str {
        "Ether can be forced into any contract via selfdestruct, so exact \
         balance comparisons can be made to fail (or pass) by an attacker."
    }

    fn action_items(&self) -> Vec<&'static str> {
        vec!["Use >= / <= bounds instead of strict equality on balances."]
    }

    fn references(&self) -> Vec<&'static str> {
        vec!["https://swcregistry.io/docs/SWC-132"]
    }

    fn evaluate(&self, ctx: &RuleContext) -> RuleResult<Vec<Finding>> {
        let mut findings = Vec::new();

        for operator in ["==", "!="] {
            let comparisons = find_nodes_by_type_filtered(
                &ctx.tree,
                &["BinaryOperation"],
                "operator",
                &json!(operator),
            );
            for node in comparisons {
                if compares_balance(node) {
                    findings.push(create_finding(
                        ctx,
                        node,
                        &format!(
                            "Strict '{}' comparison against an address balance.",
                            operator
                        ),
                    ));
                }
            }
        }

        Ok(findings)
    }
}

/// Either operand is a `.balance` member access.
fn compares_balance(node: &Value) -> bool {
    ["leftExpression", "rightExpression"].iter().any(|side| {
        node.get(*side)
            .map(|operand| {
                !find_nodes_by_type_filtered(
                    operand,
                    &["MemberAccess"],
                    "memberName",
                    &json!("balance"),
                )
                .is_empty()
            })
            .unwrap_or(false)
    })
}
