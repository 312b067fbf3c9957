//! Tree Reduction
//!
//! Normalizes a raw solc output document into the shape the query engine and
//! rules expect: captures the ordered source-file list and strips subtrees
//! belonging to excluded files from the `sources` and `contracts` sections.
//!
//! The file list defines the `fileIndex` space every source descriptor in the
//! document refers to, so it is extracted before any key is removed and is
//! never recomputed afterwards. Removing a file must not renumber the
//! indices that surviving descriptors rely on.

use serde_json::Value;

/// Reduce a raw compiler document, consuming and returning it.
///
/// Returns the reduced tree together with the ordered source-file list.
/// A document without a `sources` section yields an empty file list; rules
/// querying the resulting near-empty tree simply find nothing.
///
/// Reduction is idempotent: a second pass with the same exclusion list
/// removes nothing further.
pub fn reduce(mut tree: Value, excluded_paths: &[String]) -> (Value, Vec<String>) {
    let pre_exclusion_count = tree
        .get("sources")
        .and_then(Value::as_object)
        .map_or(0, |sources| sources.len());
    let source_files = source_file_list(&tree);
    assert_eq!(
        source_files.len(),
        pre_exclusion_count,
        "source file list must be captured before exclusion"
    );

    for section in ["sources", "contracts"] {
        if let Some(map) = tree.get_mut(section).and_then(Value::as_object_mut) {
            map.retain(|key, _| !is_excluded(key, excluded_paths));
        }
    }

    (tree, source_files)
}

/// The ordered source-file list: the keys of the `sources` section in
/// document order. Index stability across the whole run is an invariant the
/// location resolver relies on.
fn source_file_list(tree: &Value) -> Vec<String> {
    match tree.get("sources").and_then(Value::as_object) {
        Some(sources) => sources.keys().cloned().collect(),
        None => Vec::new(),
    }
}

/// A key is excluded when it contains any configured path substring.
/// `contracts` keys are `"path:ContractName"`, so substring matching covers
/// both sections.
fn is_excluded(key: &str, excluded_paths: &[String]) -> bool {
    excluded_paths.iter().any(|pattern| key.contains(pattern.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_document() -> Value {
        json!({
            "sources": {
                "contracts/Token.sol": { "AST": { "nodeType": "SourceUnit" } },
                "node_modules/lib/SafeMath.sol": { "AST": { "nodeType": "SourceUnit" } },
                "contracts/Wallet.sol": { "AST": { "nodeType": "SourceUnit" } }
            },
            "contracts": {
                "contracts/Token.sol:Token": {},
                "node_modules/lib/SafeMath.sol:SafeMath": {},
                "contracts/Wallet.sol:Wallet": {}
            }
        })
    }

    #[test]
    fn test_file_list_preserves_document_order() {
        let (_, files) = reduce(raw_document(), &[]);
        assert_eq!(
            files,
            vec![
                "contracts/Token.sol",
                "node_modules/lib/SafeMath.sol",
                "contracts/Wallet.sol",
            ]
        );
    }

    #[test]
    fn test_exclusion_removes_both_sections() {
        let excluded = vec!["node_modules".to_string()];
        let (tree, files) = reduce(raw_document(), &excluded);

        let sources = tree["sources"].as_object().unwrap();
        assert_eq!(sources.len(), 2);
        assert!(!sources.contains_key("node_modules/lib/SafeMath.sol"));

        let contracts = tree["contracts"].as_object().unwrap();
        assert_eq!(contracts.len(), 2);
        assert!(!contracts.contains_key("node_modules/lib/SafeMath.sol:SafeMath"));

        // The file list still covers the pre-exclusion index space.
        assert_eq!(files.len(), 3);
        assert_eq!(files[2], "contracts/Wallet.sol");
    }

    #[test]
    fn test_exclusion_is_idempotent() {
        let excluded = vec!["node_modules".to_string()];
        let (tree, _) = reduce(raw_document(), &excluded);
        let before = tree.clone();
        let (again, _) = reduce(tree, &excluded);
        assert_eq!(again, before);
    }

    #[test]
    fn test_missing_sources_section() {
        let (tree, files) = reduce(json!({ "contracts": {} }), &[]);
        assert!(files.is_empty());
        assert!(tree["contracts"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_non_object_document() {
        let (_, files) = reduce(json!(null), &[]);
        assert!(files.is_empty());
    }
}
