//! Pipeline Engine
//!
//! Fans rule units out over a worker pool and aggregates their findings.
//! Each rule runs isolated: an `Err`, a panic, or a hang is recorded against
//! that rule alone and never aborts its siblings. Results are collected in
//! completion order, which is nondeterministic run-to-run; consumers that
//! need a stable order must sort by rule id themselves.

use crate::pipeline::registry::{register_all_rules, RuleRegistry};
use crate::pipeline::rule::{Finding, Precision, Rule, RuleContext, RuleError, RuleResult, Severity};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default wall-clock budget for a single rule.
pub const DEFAULT_RULE_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Enable parallel execution.
    pub parallel: bool,

    /// Number of worker threads (0 = available hardware concurrency).
    pub num_threads: usize,

    /// List of rule IDs to enable (empty = all).
    pub enabled: Vec<String>,

    /// List of rule IDs to disable.
    pub disabled: Vec<String>,

    /// Wall-clock budget per rule; a rule exceeding it is abandoned.
    pub rule_timeout: Duration,

    /// Severities suppressed from the aggregate, matched case-insensitively.
    pub severity_exclusions: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            num_threads: 0,
            enabled: vec![],
            disabled: vec![],
            rule_timeout: DEFAULT_RULE_TIMEOUT,
            severity_exclusions: vec![],
        }
    }
}

/// Statistics for a single rule execution, failures included.
#[derive(Debug, Clone, Default)]
pub struct RuleStats {
    /// Rule id.
    pub id: String,
    /// Execution time (capped at the timeout for abandoned rules).
    pub duration: Duration,
    /// Number of findings produced.
    pub finding_count: usize,
    /// Whether evaluation returned normally.
    pub success: bool,
    /// Error message if evaluation failed, panicked, or timed out.
    pub error: Option<String>,
}

/// One rule's metadata together with its findings.
///
/// Only rules that produced at least one finding (and survived severity
/// filtering) appear in the aggregate.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RuleReport {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    pub precision: Precision,
    pub description: String,
    pub action_items: Vec<String>,
    pub references: Vec<String>,
    pub reports: Vec<String>,
    pub findings: Vec<Finding>,
}

impl RuleReport {
    fn new(rule: &dyn Rule, findings: Vec<Finding>) -> Self {
        Self {
            id: rule.id().to_string(),
            name: rule.name().to_string(),
            severity: rule.severity(),
            precision: rule.precision(),
            description: rule.description().to_string(),
            action_items: rule.action_items().iter().map(|s| s.to_string()).collect(),
            references: rule.references().iter().map(|s| s.to_string()).collect(),
            reports: rule.reports().iter().map(|s| s.to_string()).collect(),
            findings,
        }
    }
}

/// Result of running the full pipeline.
#[derive(Debug, Default)]
pub struct PipelineResult {
    /// Reports from rules with findings, in completion order.
    pub reports: Vec<RuleReport>,
    /// Per-rule statistics for every rule that ran.
    pub stats: Vec<RuleStats>,
    /// Total pipeline duration.
    pub total_duration: Duration,
}

impl PipelineResult {
    pub fn total_findings(&self) -> usize {
        self.reports.iter().map(|r| r.findings.len()).sum()
    }

    pub fn has_findings(&self) -> bool {
        !self.reports.is_empty()
    }
}

/// Outcome of one guarded rule execution.
struct RuleExecution {
    rule: Arc<dyn Rule>,
    outcome: RuleResult<Vec<Finding>>,
    duration: Duration,
}

/// The pipeline engine: schedules rules, enforces isolation and timeouts,
/// and aggregates findings.
pub struct PipelineEngine {
    registry: RuleRegistry,
    config: PipelineConfig,
}

impl PipelineEngine {
    /// Create an engine with all built-in rules registered.
    pub fn new(config: PipelineConfig) -> Self {
        let mut registry = RuleRegistry::new();
        register_all_rules(&mut registry);
        Self { registry, config }
    }

    /// Create an engine with a caller-supplied registry (for testing).
    pub fn with_registry(registry: RuleRegistry, config: PipelineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Run every enabled rule against the context and aggregate the results.
    pub fn run(&self, ctx: RuleContext) -> PipelineResult {
        let start = Instant::now();
        let rules = self.resolve_rules();
        log::info!("Running {} rules", rules.len());

        let ctx = Arc::new(ctx);
        let executions = if self.config.parallel && rules.len() > 1 {
            self.run_rules_parallel(&rules, &ctx)
        } else {
            self.run_rules_sequential(&rules, &ctx)
        };

        let (reports, stats) = self.aggregate(executions);
        PipelineResult { reports, stats, total_duration: start.elapsed() }
    }

    /// Resolve which rules should run based on the enable/disable lists.
    fn resolve_rules(&self) -> Vec<Arc<dyn Rule>> {
        self.registry
            .all()
            .filter(|r| self.is_rule_enabled(r.as_ref()))
            .cloned()
            .collect()
    }

    fn is_rule_enabled(&self, rule: &dyn Rule) -> bool {
        let id = rule.id();
        let name = rule.name();

        if self.config.disabled.iter().any(|d| d == id || d == name) {
            return false;
        }
        if !self.config.enabled.is_empty() {
            return self.config.enabled.iter().any(|e| e == id || e == name);
        }
        true
    }

    /// Run rules fully in parallel on a rayon pool, collecting results in
    /// completion order through a channel.
    fn run_rules_parallel(
        &self,
        rules: &[Arc<dyn Rule>],
        ctx: &Arc<RuleContext>,
    ) -> Vec<RuleExecution> {
        use rayon::prelude::*;

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .build()
        {
            Ok(pool) => pool,
            Err(err) => {
                log::error!("Failed to build worker pool, running sequentially: {}", err);
                return self.run_rules_sequential(rules, ctx);
            }
        };

        let timeout = self.config.rule_timeout;
        let (sender, receiver) = mpsc::channel();
        pool.install(|| {
            rules.par_iter().for_each_with(sender, |sender, rule| {
                let execution = run_rule_guarded(rule.clone(), ctx.clone(), timeout);
                // A send failure means the collector is gone; nothing to do.
                let _ = sender.send(execution);
            });
        });

        receiver.into_iter().collect()
    }

    fn run_rules_sequential(
        &self,
        rules: &[Arc<dyn Rule>],
        ctx: &Arc<RuleContext>,
    ) -> Vec<RuleExecution> {
        rules
            .iter()
            .map(|rule| run_rule_guarded(rule.clone(), ctx.clone(), self.config.rule_timeout))
            .collect()
    }

    /// Fold executions into reports and stats, applying the severity filter.
    fn aggregate(&self, executions: Vec<RuleExecution>) -> (Vec<RuleReport>, Vec<RuleStats>) {
        let mut reports = Vec::new();
        let mut stats = Vec::new();

        for execution in executions {
            let rule = execution.rule.as_ref();
            let mut stat = RuleStats {
                id: rule.id().to_string(),
                duration: execution.duration,
                ..RuleStats::default()
            };

            match execution.outcome {
                Ok(findings) => {
                    stat.success = true;
                    stat.finding_count = findings.len();
                    log::debug!(
                        "Rule '{}': {} findings in {:?}",
                        rule.name(),
                        findings.len(),
                        execution.duration
                    );
                    if findings.is_empty() {
                        // No findings, no report entry.
                    } else if self.is_severity_excluded(rule.severity()) {
                        log::debug!(
                            "Rule '{}' suppressed: severity {} is excluded",
                            rule.name(),
                            rule.severity()
                        );
                    } else {
                        reports.push(RuleReport::new(rule, findings));
                    }
                }
                Err(err) => {
                    log::error!("Rule '{}' failed: {}", rule.name(), err);
                    stat.error = Some(err.to_string());
                }
            }

            stats.push(stat);
        }

        (reports, stats)
    }

    fn is_severity_excluded(&self, severity: Severity) -> bool {
        self.config
            .severity_exclusions
            .iter()
            .any(|s| s.eq_ignore_ascii_case(severity.as_str()))
    }
}

/// Run one rule with panic isolation and a wall-clock timeout.
///
/// The body executes on a dedicated thread; the guard waits on a channel
/// with the timeout. A rule that exceeds its budget is abandoned, not
/// killed: the worker thread is detached and its eventual result is
/// discarded, while the pipeline records a timeout failure and moves on.
fn run_rule_guarded(
    rule: Arc<dyn Rule>,
    ctx: Arc<RuleContext>,
    timeout: Duration,
) -> RuleExecution {
    let start = Instant::now();
    let (sender, receiver) = mpsc::channel();

    let worker = {
        let rule = rule.clone();
        thread::Builder::new()
            .name(format!("rule-{}", rule.id()))
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(&ctx)));
                let _ = sender.send(outcome);
            })
    };

    let outcome = match worker {
        Ok(_) => match receiver.recv_timeout(timeout) {
            Ok(Ok(result)) => result,
            Ok(Err(payload)) => Err(RuleError::Panicked(panic_message(payload))),
            Err(RecvTimeoutError::Timeout) => Err(RuleError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(RuleError::Evaluation("worker exited without a result".to_string()))
            }
        },
        Err(err) => Err(RuleError::Evaluation(format!("failed to spawn worker: {}", err))),
    };

    RuleExecution { rule, outcome, duration: start.elapsed() }
}

/// Extract a printable message from a panic payload.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
