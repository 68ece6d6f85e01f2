//! Locally generated substitute trees
//!
//! Two situations must still render something: the generation endpoint is
//! unreachable (placeholder tree seeded from the submitted concept), and the
//! endpoint answered with an unrecognizable payload (diagnostic tree).

use crate::domain::tree::{ConceptNode, ConceptTree};

/// Root label of the diagnostic tree for malformed payloads.
pub const DIAGNOSTIC_ROOT: &str = "Invalid Data Format";

/// Child label pointing the user at the log output.
pub const DIAGNOSTIC_HINT: &str = "Check Console";

/// Placeholder tree shown when the service cannot be reached: the submitted
/// concept as root with three generic sub-concepts (4 nodes total).
pub fn placeholder_tree(concept: &str) -> ConceptTree {
    let root_name = if concept.trim().is_empty() {
        "Core Concept"
    } else {
        concept.trim()
    };

    let mut tree = ConceptTree::new();
    let root = tree.insert_node(ConceptNode::new(root_name), None);
    for i in 1..=3 {
        tree.insert_node(ConceptNode::new(format!("Sub-Concept {i}")), Some(root));
    }
    tree
}

/// Fixed two-node tree substituted for malformed payloads.
pub fn diagnostic_tree() -> ConceptTree {
    let mut tree = ConceptTree::new();
    let root = tree.insert_node(ConceptNode::new(DIAGNOSTIC_ROOT), None);
    tree.insert_node(ConceptNode::new(DIAGNOSTIC_HINT), Some(root));
    tree
}
