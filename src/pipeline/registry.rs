//! Rule registry.
//!
//! Holds the set of rule units known to the engine and resolves lookups by
//! id or name for the CLI surfaces.

use crate::pipeline::rule::Rule;
use std::sync::Arc;

/// Registry of rule units.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule. A duplicate id replaces the earlier registration.
    pub fn register<R: Rule + 'static>(&mut self, rule: R) {
        self.register_arc(Arc::new(rule));
    }

    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) {
        self.rules.retain(|existing| existing.id() != rule.id());
        self.rules.push(rule);
    }

    /// Iterate over all registered rules in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    /// Look a rule up by id or name.
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Rule>> {
        self.rules
            .iter()
            .find(|rule| rule.id() == key || rule.name() == key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Register every built-in rule.
pub fn register_all_rules(registry: &mut RuleRegistry) {
    use crate::rules::*;

    registry.register(TxOriginRule::new());
    registry.register(DelegatecallRule::new());
    registry.register(LowLevelCallRule::new());
    registry.register(TimestampDependenceRule::new());
    registry.register(DeprecatedConstructsRule::new());
    registry.register(BalanceEqualityRule::new());
    registry.register(ReentrancyRule::new());
}
