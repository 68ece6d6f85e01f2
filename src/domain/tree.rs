use generational_arena::{Arena, Index};
use std::collections::BTreeMap;
use std::fmt;
use termtree::Tree;
use tracing::instrument;

/// Handle to a node inside a [`ConceptTree`].
pub type NodeId = Index;

/// Data payload for one labeled vertex in the concept hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptNode {
    /// Display label, non-empty after normalization
    pub name: String,
    /// Optional key/value annotations shown beside the node
    pub attributes: BTreeMap<String, String>,
}

impl ConceptNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }
}

impl fmt::Display for ConceptNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attributes.is_empty() {
            write!(f, "{}", self.name)
        } else {
            let attrs: Vec<String> = self
                .attributes
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "{} [{}]", self.name, attrs.join(", "))
        }
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Concept data for this node
    pub data: ConceptNode,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<NodeId>,
    /// Indices of child nodes, in payload order
    pub children: Vec<NodeId>,
}

/// Arena-based rooted concept tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// The tree is immutable after construction; view-only state (collapsed
/// nodes, pan, zoom) lives in [`crate::view::Viewer`], never here.
#[derive(Debug, Default)]
pub struct ConceptTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<NodeId>,
}

impl ConceptTree {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: ConceptNode, parent: Option<NodeId>) -> NodeId {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Pre-order iteration, children in payload order.
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects labels of all leaf nodes (nodes with no children).
    ///
    /// Empty trees return an empty vector.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_names(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.name.clone())
            .collect()
    }

    /// First node whose label matches `name` in pre-order, if any.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.data.name == name)
            .map(|(idx, _)| idx)
    }

    /// Serializes back to the flat `{name, children, attributes}` JSON shape.
    pub fn to_value(&self) -> serde_json::Value {
        match self.root {
            Some(root) => self.node_to_value(root),
            None => serde_json::Value::Null,
        }
    }

    fn node_to_value(&self, idx: NodeId) -> serde_json::Value {
        let Some(node) = self.get_node(idx) else {
            return serde_json::Value::Null;
        };
        let mut map = serde_json::Map::new();
        map.insert("name".into(), node.data.name.clone().into());
        if !node.data.attributes.is_empty() {
            map.insert(
                "attributes".into(),
                serde_json::to_value(&node.data.attributes).unwrap_or_default(),
            );
        }
        map.insert(
            "children".into(),
            node.children
                .iter()
                .map(|&child| self.node_to_value(child))
                .collect::<Vec<_>>()
                .into(),
        );
        serde_json::Value::Object(map)
    }

    /// Renders the hierarchy as a termtree for terminal display.
    pub fn to_tree_string(&self) -> Option<Tree<String>> {
        self.root.map(|root| self.node_to_tree_string(root))
    }

    fn node_to_tree_string(&self, idx: NodeId) -> Tree<String> {
        let label = self
            .get_node(idx)
            .map(|node| node.data.to_string())
            .unwrap_or_default();
        let leaves: Vec<_> = self
            .get_node(idx)
            .map(|node| {
                node.children
                    .iter()
                    .map(|&child| self.node_to_tree_string(child))
                    .collect()
            })
            .unwrap_or_default();
        Tree::new(label).with_leaves(leaves)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ConceptTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ConceptTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a ConceptTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ConceptTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
