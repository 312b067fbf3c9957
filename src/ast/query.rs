//! AST Query Engine
//!
//! Generic structural search over the solc JSON AST. The AST is kept in its
//! raw `serde_json::Value` form (objects, arrays, scalars nested arbitrarily);
//! queries walk it in depth-first pre-order, so parents are always reported
//! before their descendants. Rules rely on this ordering when they take the
//! first match.
//!
//! Every query is a fresh traversal; no node-id index is maintained.

use serde_json::{Map, Value};

/// Read the `nodeType` tag of a node, if it is an object carrying one.
pub fn node_type(node: &Value) -> Option<&str> {
    node.get("nodeType").and_then(Value::as_str)
}

/// Read the numeric `id` of a node.
pub fn node_id(node: &Value) -> Option<u64> {
    node.get("id").and_then(Value::as_u64)
}

/// Read the nested `typeDescriptions.typeString` attribute of a node.
/// Missing keys are treated as "no type", not as an error.
pub fn type_string(node: &Value) -> Option<&str> {
    node.get("typeDescriptions")
        .and_then(|t| t.get("typeString"))
        .and_then(Value::as_str)
}

/// Parse the start offset out of a node's `"start:length:fileIndex"`
/// source descriptor.
pub fn src_offset(node: &Value) -> Option<usize> {
    let src = node.get("src").and_then(Value::as_str)?;
    src.split(':').next()?.parse().ok()
}

/// Find all nodes whose `nodeType` is one of `types`.
///
/// Results are in pre-order: a matching parent appears before any matching
/// descendant. A root that is a scalar, or a tree with no matching node,
/// yields an empty list.
pub fn find_nodes_by_type<'a>(root: &'a Value, types: &[&str]) -> Vec<&'a Value> {
    let mut matches = Vec::new();
    collect(root, &mut matches, &|obj| is_one_of(obj, types));
    matches
}

/// Find all nodes whose `nodeType` is one of `types` and whose attribute
/// `key` equals `value`.
///
/// Type-matching nodes without the attribute (or with a different value)
/// are skipped, but their subtrees are still searched.
pub fn find_nodes_by_type_filtered<'a>(
    root: &'a Value,
    types: &[&str],
    key: &str,
    value: &Value,
) -> Vec<&'a Value> {
    let mut matches = Vec::new();
    collect(root, &mut matches, &|obj| {
        is_one_of(obj, types) && obj.get(key) == Some(value)
    });
    matches
}

/// Find all nodes whose `typeDescriptions.typeString` equals `signature`.
///
/// Same traversal and ordering contract as [`find_nodes_by_type`].
pub fn find_nodes_by_signature<'a>(root: &'a Value, signature: &str) -> Vec<&'a Value> {
    let mut matches = Vec::new();
    collect(root, &mut matches, &|obj| {
        obj.get("typeDescriptions")
            .and_then(|t| t.get("typeString"))
            .and_then(Value::as_str)
            == Some(signature)
    });
    matches
}

/// Find the nearest ancestor with `nodeType == parent_type` of the node
/// whose `id` equals `node_id`.
///
/// Returns `None` when the id never occurs, or when the target node has no
/// ancestor of the requested type. The caller must ensure id uniqueness;
/// solc guarantees it within one compilation unit's numbering space.
pub fn find_nearest_ancestor_of_type<'a>(
    root: &'a Value,
    node_id: u64,
    parent_type: &str,
) -> Option<&'a Value> {
    descend(root, node_id, parent_type, None).flatten()
}

/// Inner search for [`find_nearest_ancestor_of_type`]. The outer `Option`
/// distinguishes "target id found" (stop the search) from "keep looking".
fn descend<'a>(
    node: &'a Value,
    target_id: u64,
    parent_type: &str,
    tracked: Option<&'a Value>,
) -> Option<Option<&'a Value>> {
    match node {
        Value::Object(obj) => {
            if obj.get("id").and_then(Value::as_u64) == Some(target_id) {
                return Some(tracked);
            }
            let tracked = if obj.get("nodeType").and_then(Value::as_str) == Some(parent_type) {
                Some(node)
            } else {
                tracked
            };
            for child in obj.values() {
                if let Some(found) = descend(child, target_id, parent_type, tracked) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => {
            for child in items {
                if let Some(found) = descend(child, target_id, parent_type, tracked) {
                    return Some(found);
                }
            }
            None
        }
        _ => None,
    }
}

/// Pre-order walk collecting every object node satisfying `predicate`.
/// Scalars are never recursed into.
fn collect<'a>(
    node: &'a Value,
    matches: &mut Vec<&'a Value>,
    predicate: &dyn Fn(&Map<String, Value>) -> bool,
) {
    match node {
        Value::Object(obj) => {
            if predicate(obj) {
                matches.push(node);
            }
            for child in obj.values() {
                if child.is_object() || child.is_array() {
                    collect(child, matches, predicate);
                }
            }
        }
        Value::Array(items) => {
            for child in items {
                if child.is_object() || child.is_array() {
                    collect(child, matches, predicate);
                }
            }
        }
        _ => {}
    }
}

fn is_one_of(obj: &Map<String, Value>, types: &[&str]) -> bool {
    match obj.get("nodeType").and_then(Value::as_str) {
        Some(tag) => types.contains(&tag),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> Value {
        json!({
            "nodeType": "SourceUnit",
            "id": 1,
            "nodes": [
                {
                    "nodeType": "ContractDefinition",
                    "id": 2,
                    "name": "Wallet",
                    "nodes": [
                        {
                            "nodeType": "FunctionDefinition",
                            "id": 3,
                            "name": "withdraw",
                            "body": {
                                "nodeType": "Block",
                                "id": 4,
                                "statements": [
                                    {
                                        "nodeType": "MemberAccess",
                                        "id": 5,
                                        "memberName": "origin",
                                        "typeDescriptions": { "typeString": "address" }
                                    }
                                ]
                            }
                        },
                        {
                            "nodeType": "FunctionDefinition",
                            "id": 6,
                            "name": "deposit"
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_find_nodes_by_type_preorder() {
        let tree = sample_tree();
        let funcs = find_nodes_by_type(&tree, &["FunctionDefinition"]);
        assert_eq!(funcs.len(), 2);
        // Pre-order: withdraw is declared before deposit.
        assert_eq!(funcs[0]["name"], "withdraw");
        assert_eq!(funcs[1]["name"], "deposit");
    }

    #[test]
    fn test_find_nodes_by_type_multiple_types() {
        let tree = sample_tree();
        let nodes = find_nodes_by_type(&tree, &["ContractDefinition", "Block"]);
        assert_eq!(nodes.len(), 2);
        // Parent before descendant.
        assert_eq!(node_type(nodes[0]), Some("ContractDefinition"));
        assert_eq!(node_type(nodes[1]), Some("Block"));
    }

    #[test]
    fn test_find_nodes_by_type_filtered() {
        let tree = sample_tree();
        let matches = find_nodes_by_type_filtered(
            &tree,
            &["FunctionDefinition"],
            "name",
            &json!("deposit"),
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(node_id(matches[0]), Some(6));

        let none = find_nodes_by_type_filtered(
            &tree,
            &["FunctionDefinition"],
            "name",
            &json!("missing"),
        );
        assert!(none.is_empty());
    }

    #[test]
    fn test_find_nodes_by_signature() {
        let tree = sample_tree();
        let matches = find_nodes_by_signature(&tree, "address");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["memberName"], "origin");

        assert!(find_nodes_by_signature(&tree, "uint256").is_empty());
    }

    #[test]
    fn test_find_nearest_ancestor_of_type() {
        let tree = sample_tree();
        let func = find_nearest_ancestor_of_type(&tree, 5, "FunctionDefinition")
            .expect("member access has an enclosing function");
        assert_eq!(func["name"], "withdraw");

        let contract = find_nearest_ancestor_of_type(&tree, 5, "ContractDefinition")
            .expect("member access has an enclosing contract");
        assert_eq!(contract["name"], "Wallet");
    }

    #[test]
    fn test_find_nearest_ancestor_missing_id() {
        let tree = sample_tree();
        assert!(find_nearest_ancestor_of_type(&tree, 999, "ContractDefinition").is_none());
    }

    #[test]
    fn test_scalar_root_yields_nothing() {
        let scalar = json!(42);
        assert!(find_nodes_by_type(&scalar, &["SourceUnit"]).is_empty());
        assert!(find_nodes_by_signature(&scalar, "address").is_empty());
        assert!(find_nearest_ancestor_of_type(&scalar, 1, "SourceUnit").is_none());
    }

    #[test]
    fn test_null_fields_are_skipped() {
        let tree = json!({
            "nodeType": "SourceUnit",
            "nodes": [null, { "nodeType": "PragmaDirective" }]
        });
        let pragmas = find_nodes_by_type(&tree, &["PragmaDirective"]);
        assert_eq!(pragmas.len(), 1);
    }

    #[test]
    fn test_traversal_visits_every_node() {
        let tree = sample_tree();
        // Every object in the sample carries an id; matching all tags must
        // report each exactly once.
        let all = find_nodes_by_type(
            &tree,
            &[
                "SourceUnit",
                "ContractDefinition",
                "FunctionDefinition",
                "Block",
                "MemberAccess",
            ],
        );
        assert_eq!(all.len(), 6);
        let ids: Vec<_> = all.iter().filter_map(|n| node_id(n)).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_src_offset() {
        let node = json!({ "src": "120:29:0" });
        assert_eq!(src_offset(&node), Some(120));
        assert_eq!(src_offset(&json!({ "src": "bogus" })), None);
        assert_eq!(src_offset(&json!({})), None);
    }
}
