//! Response normalizer: untrusted external payload → well-formed [`ConceptTree`]
//!
//! Decode policy is liveness-over-correctness: every payload yields a
//! renderable tree. Recognized shapes are tried in order as typed decodes,
//! never walked as loose dynamic values:
//!
//! 1. central/branches: `{"central": "X", "branches": [{"name": "A", ...}]}`
//! 2. flat: `{"name": "X", "children": [...]}`
//! 3. anything else → the fixed diagnostic tree

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::fallback::diagnostic_tree;
use crate::domain::tree::{ConceptNode, ConceptTree, NodeId};
use crate::domain::DomainError;

/// Maximum accepted payload nesting. Deeper payloads are treated as
/// malformed rather than risking unbounded recursion on adversarial input.
pub const MAX_DEPTH: usize = 10;

/// Placeholder label for nodes whose name is missing or blank.
pub const UNNAMED: &str = "Unnamed";

/// The central/branches shape returned by some service versions.
#[derive(Debug, Deserialize)]
struct CentralPayload {
    central: String,
    #[serde(default)]
    branches: Vec<BranchPayload>,
}

/// The flat name/children shape (also what [`ConceptTree::to_value`] emits).
#[derive(Debug, Deserialize)]
struct FlatPayload {
    name: String,
    #[serde(default)]
    children: Vec<BranchPayload>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

/// Nested branch node, shared by both shapes. The root label must be
/// present, but nested nodes tolerate a missing name (placeholder applies).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BranchPayload {
    name: Option<String>,
    children: Vec<BranchPayload>,
    attributes: BTreeMap<String, String>,
}

/// Converts an arbitrary parsed JSON value into a concept tree.
///
/// Never fails and never yields a partial tree: unrecognized or too-deep
/// payloads are replaced wholesale by the diagnostic tree, with the reason
/// logged for diagnostics.
pub fn normalize(value: &Value) -> ConceptTree {
    match decode(value) {
        Ok(tree) => tree,
        Err(e) => {
            warn!("malformed mind map payload, substituting diagnostic tree: {e}");
            diagnostic_tree()
        }
    }
}

fn decode(value: &Value) -> Result<ConceptTree, DomainError> {
    if let Ok(payload) = serde_json::from_value::<CentralPayload>(value.clone()) {
        return build_tree(payload.central, BTreeMap::new(), payload.branches);
    }
    if let Ok(payload) = serde_json::from_value::<FlatPayload>(value.clone()) {
        return build_tree(payload.name, payload.attributes, payload.children);
    }
    Err(DomainError::UnrecognizedPayload)
}

fn build_tree(
    root_name: String,
    root_attributes: BTreeMap<String, String>,
    branches: Vec<BranchPayload>,
) -> Result<ConceptTree, DomainError> {
    let depth = 1 + branch_depth(&branches);
    if depth > MAX_DEPTH {
        return Err(DomainError::DepthExceeded { max: MAX_DEPTH });
    }

    let mut tree = ConceptTree::new();
    let root = tree.insert_node(
        ConceptNode {
            name: clean_label(Some(root_name)),
            attributes: root_attributes,
        },
        None,
    );
    for branch in branches {
        insert_branch(&mut tree, root, branch);
    }
    Ok(tree)
}

fn insert_branch(tree: &mut ConceptTree, parent: NodeId, branch: BranchPayload) {
    let idx = tree.insert_node(
        ConceptNode {
            name: clean_label(branch.name),
            attributes: branch.attributes,
        },
        Some(parent),
    );
    for child in branch.children {
        insert_branch(tree, idx, child);
    }
}

fn branch_depth(branches: &[BranchPayload]) -> usize {
    branches
        .iter()
        .map(|b| 1 + branch_depth(&b.children))
        .max()
        .unwrap_or(0)
}

fn clean_label(name: Option<String>) -> String {
    match name {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => UNNAMED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_central_branches_shape() {
        let payload = json!({"central": "X", "branches": [{"name": "A", "children": []}]});
        let tree = normalize(&payload);
        assert_eq!(tree.node_count(), 2);
        let root = tree.get_node(tree.root().unwrap()).unwrap();
        assert_eq!(root.data.name, "X");
        let child = tree.get_node(root.children[0]).unwrap();
        assert_eq!(child.data.name, "A");
        assert!(child.children.is_empty());
    }

    #[test]
    fn test_unrecognized_shape_yields_diagnostic_tree() {
        let payload = json!({"foo": "bad"});
        let tree = normalize(&payload);
        let names: Vec<_> = tree.iter().map(|(_, n)| n.data.name.clone()).collect();
        assert_eq!(names, vec!["Invalid Data Format", "Check Console"]);
    }

    #[test]
    fn test_blank_nested_name_gets_placeholder() {
        let payload = json!({"name": "root", "children": [{"name": "  "}, {}]});
        let tree = normalize(&payload);
        assert_eq!(tree.leaf_names(), vec![UNNAMED, UNNAMED]);
    }

    #[test]
    fn test_depth_exactly_at_limit_is_accepted() {
        let mut payload = json!({"name": "leaf"});
        for level in 1..MAX_DEPTH {
            payload = json!({"name": format!("level{level}"), "children": [payload]});
        }
        let tree = normalize(&payload);
        assert_eq!(tree.depth(), MAX_DEPTH);
        assert_eq!(tree.node_count(), MAX_DEPTH);
    }

    #[test]
    fn test_depth_above_limit_is_malformed() {
        let mut payload = json!({"name": "leaf"});
        for level in 1..=MAX_DEPTH {
            payload = json!({"name": format!("level{level}"), "children": [payload]});
        }
        let tree = normalize(&payload);
        assert_eq!(
            tree.get_node(tree.root().unwrap()).unwrap().data.name,
            "Invalid Data Format"
        );
    }
}
