//! End-to-end pipeline tests.
//!
//! Drive the full path a CLI invocation takes: a raw compiler document is
//! reduced, rules run concurrently against the shared tree, and findings
//! resolve back to line/column coordinates in real files on disk.

use serde_json::{json, Value};
use solhound::{
    reduce, LocationResolver, PipelineConfig, PipelineEngine, PipelineResult, RuleContext,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const VAULT_SOURCE: &str = "\
// SPDX-License-Identifier: MIT
pragma solidity ^0.8.0;

contract Vault {
\tmapping(address => uint256) public balances;
\taddress payable public owner;

\tfunction withdraw(uint256 amount) public {
\t\tuint256 held = balances[msg.sender];
\t\tif (held >= amount) {
\t\t\t// pay out first, balance update follows
\t\t\towner.call{value: amount}(\"\");
\t\t\tbalances[msg.sender] = held - amount;
\t\t}
\t}

\tfunction deposit() public payable {
\t\tbalances[msg.sender] += msg.value;
\t}
}
";

const MATH_SOURCE: &str = "\
library Math {
\tfunction guard() internal view {
\t\trequire(tx.origin == address(0));
\t}
}
";

/// Write the fixture sources under a temporary project root.
fn project_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::create_dir_all(dir.path().join("contracts")).expect("create contracts dir");
    fs::create_dir_all(dir.path().join("node_modules/helpers")).expect("create helpers dir");
    fs::write(dir.path().join("contracts/Vault.sol"), VAULT_SOURCE).expect("write Vault.sol");
    fs::write(dir.path().join("node_modules/helpers/Math.sol"), MATH_SOURCE)
        .expect("write Math.sol");
    dir
}

/// Descriptor for the span of `pattern` within `content`, as file `index`.
fn src_of(content: &str, pattern: &str, index: usize) -> String {
    let start = content.find(pattern).expect("pattern present in fixture");
    format!("{}:{}:{}", start, pattern.len(), index)
}

/// A hand-built compiler document mirroring the fixture sources.
fn raw_document() -> Value {
    json!({
        "sources": {
            "contracts/Vault.sol": {
                "AST": {
                    "nodeType": "SourceUnit",
                    "id": 1,
                    "nodes": [{
                        "nodeType": "ContractDefinition",
                        "id": 2,
                        "name": "Vault",
                        "nodes": [
                            {
                                "nodeType": "FunctionDefinition",
                                "id": 3,
                                "name": "withdraw",
                                "modifiers": [],
                                "body": {
                                    "nodeType": "Block",
                                    "id": 4,
                                    "statements": [
                                        {
                                            "nodeType": "FunctionCall",
                                            "id": 5,
                                            "expression": {
                                                "nodeType": "MemberAccess",
                                                "id": 6,
                                                "memberName": "call",
                                                "src": src_of(
                                                    VAULT_SOURCE,
                                                    "owner.call{value: amount}(\"\")",
                                                    0
                                                ),
                                                "typeDescriptions": {
                                                    "typeString": "function (bytes memory) payable returns (bool,bytes memory)"
                                                },
                                                "expression": {
                                                    "nodeType": "Identifier",
                                                    "id": 7,
                                                    "name": "owner",
                                                    "typeDescriptions": {
                                                        "typeString": "address payable"
                                                    }
                                                }
                                            }
                                        },
                                        {
                                            "nodeType": "Assignment",
                                            "id": 8,
                                            "operator": "=",
                                            "src": src_of(
                                                VAULT_SOURCE,
                                                "balances[msg.sender] = held - amount",
                                                0
                                            )
                                        }
                                    ]
                                }
                            },
                            {
                                "nodeType": "FunctionDefinition",
                                "id": 9,
                                "name": "deposit",
                                "modifiers": [],
                                "body": {
                                    "nodeType": "Block",
                                    "id": 10,
                                    "statements": [{
                                        "nodeType": "Assignment",
                                        "id": 11,
                                        "operator": "+=",
                                        "src": src_of(
                                            VAULT_SOURCE,
                                            "balances[msg.sender] += msg.value",
                                            0
                                        )
                                    }]
                                }
                            }
                        ]
                    }]
                }
            },
            "node_modules/helpers/Math.sol": {
                "AST": {
                    "nodeType": "SourceUnit",
                    "id": 100,
                    "nodes": [{
                        "nodeType": "FunctionDefinition",
                        "id": 101,
                        "name": "guard",
                        "body": {
                            "nodeType": "MemberAccess",
                            "id": 102,
                            "memberName": "origin",
                            "src": src_of(MATH_SOURCE, "tx.origin", 1),
                            "expression": { "nodeType": "Identifier", "id": 103, "name": "tx" }
                        }
                    }]
                }
            }
        },
        "contracts": {
            "contracts/Vault.sol:Vault": {},
            "node_modules/helpers/Math.sol:Math": {}
        }
    })
}

fn run_pipeline(
    root: &TempDir,
    excluded_paths: &[String],
    config: PipelineConfig,
) -> PipelineResult {
    let (tree, source_files) = reduce(raw_document(), excluded_paths);
    let ctx = RuleContext::new(
        Arc::new(tree),
        Arc::new(source_files),
        LocationResolver::new(root.path(), false),
    );
    PipelineEngine::new(config).run(ctx)
}

#[test]
fn test_reentrancy_finding_resolves_to_exact_location() {
    let root = project_fixture();
    let result = run_pipeline(&root, &[], PipelineConfig::default());

    let reentrancy = result
        .reports
        .iter()
        .find(|r| r.id == "reentrancy")
        .expect("reentrancy rule reports the vulnerable withdraw");
    assert_eq!(reentrancy.findings.len(), 1);

    let finding = &reentrancy.findings[0];
    assert_eq!(finding.file, "contracts/Vault.sol");
    assert_eq!(finding.lines.as_deref(), Some("Line 12 Columns 4-33"));
    assert_eq!(finding.snippet.as_deref(), Some("owner.call{value: amount}(\"\")"));
    assert_eq!(finding.extra["function"], "withdraw");
}

#[test]
fn test_excluded_path_produces_no_findings() {
    let root = project_fixture();

    // Without exclusion the library's tx.origin is reported.
    let result = run_pipeline(&root, &[], PipelineConfig::default());
    let tx_origin = result
        .reports
        .iter()
        .find(|r| r.id == "tx-origin")
        .expect("tx-origin fires on the unexcluded library");
    assert_eq!(tx_origin.findings[0].file, "node_modules/helpers/Math.sol");

    // With the path excluded, the subtree is gone before rules run.
    let excluded = vec!["node_modules".to_string()];
    let result = run_pipeline(&root, &excluded, PipelineConfig::default());
    assert!(result.reports.iter().all(|r| r.id != "tx-origin"));

    // Exclusion must not renumber surviving descriptors: the Vault finding
    // still resolves to the same location through file index 0.
    let reentrancy = result.reports.iter().find(|r| r.id == "reentrancy").unwrap();
    assert_eq!(reentrancy.findings[0].lines.as_deref(), Some("Line 12 Columns 4-33"));
}

#[test]
fn test_severity_exclusion_filters_aggregate() {
    let root = project_fixture();
    let config = PipelineConfig {
        severity_exclusions: vec!["high".to_string()],
        ..PipelineConfig::default()
    };
    let result = run_pipeline(&root, &[], config);

    // Reentrancy and tx-origin are both High and suppressed; the Medium
    // low-level-call report survives.
    assert!(result.reports.iter().all(|r| r.id != "reentrancy"));
    assert!(result.reports.iter().all(|r| r.id != "tx-origin"));
    let survivor = result
        .reports
        .iter()
        .find(|r| r.id == "low-level-call")
        .expect("medium severity report survives the filter");
    assert_eq!(survivor.findings.len(), 1);
}

#[test]
fn test_sequential_and_parallel_agree() {
    let root = project_fixture();

    let parallel = run_pipeline(&root, &[], PipelineConfig::default());
    let sequential = run_pipeline(
        &root,
        &[],
        PipelineConfig { parallel: false, ..PipelineConfig::default() },
    );

    let mut parallel_ids: Vec<_> = parallel.reports.iter().map(|r| r.id.clone()).collect();
    let mut sequential_ids: Vec<_> = sequential.reports.iter().map(|r| r.id.clone()).collect();
    parallel_ids.sort();
    sequential_ids.sort();
    assert_eq!(parallel_ids, sequential_ids);
    assert_eq!(parallel.total_findings(), sequential.total_findings());
}

#[test]
fn test_disabled_rule_does_not_run() {
    let root = project_fixture();
    let config = PipelineConfig {
        disabled: vec!["reentrancy".to_string()],
        ..PipelineConfig::default()
    };
    let result = run_pipeline(&root, &[], config);
    assert!(result.reports.iter().all(|r| r.id != "reentrancy"));
    assert!(result.stats.iter().all(|s| s.id != "reentrancy"));
}
