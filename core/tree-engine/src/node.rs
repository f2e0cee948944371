//! FILENAME: core/tree-engine/src/node.rs
//! Tree Arena - nodes of one built tree, referenced by `NodeId`.
//!
//! Parents are pushed before their children in both build modes, so a reverse
//! walk over the arena always finishes a node's subtree before the node.

use std::cmp::Ordering;

use grid_model::{NodeId, Row};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Path-mode: segments joined by `/`. Children mode: the row key value.
    pub id: String,

    /// Source row, or a placeholder holding only the label field.
    pub data: Row,

    pub level: usize,

    /// Effective expansion, refreshed on every flatten.
    pub expanded: bool,

    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub has_children: bool,

    /// Leaves in the subtree; 0 for a leaf itself.
    pub leaf_count: usize,

    /// True for an intermediate path node no row sits at.
    pub synthetic: bool,

    /// Index of the source row among the top-level input rows (path mode) or
    /// among its siblings (children mode). `None` for synthetic nodes.
    pub row_index: Option<usize>,
}

impl TreeNode {
    pub fn new(id: String, data: Row, level: usize, parent: Option<NodeId>) -> Self {
        TreeNode {
            id,
            data,
            level,
            expanded: false,
            children: Vec::new(),
            parent,
            has_children: false,
            leaf_count: 0,
            synthetic: false,
            row_index: None,
        }
    }

    /// Intermediate path node exposing `segment` under `label_field`.
    pub fn placeholder(
        id: String,
        label_field: &str,
        segment: &str,
        level: usize,
        parent: Option<NodeId>,
    ) -> Self {
        let mut node = TreeNode::new(id, Row::new().with(label_field, segment), level, parent);
        node.synthetic = true;
        node
    }

    /// How this node counts toward its parent's `leaf_count`.
    fn leaf_weight(&self) -> usize {
        if self.has_children {
            self.leaf_count
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TreeArena {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
    by_id: FxHashMap<String, NodeId>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and links it under its parent (or as a root).
    pub fn push(&mut self, node: TreeNode) -> NodeId {
        let id = self.nodes.len();
        let parent = node.parent;
        self.by_id.insert(node.id.clone(), id);
        self.nodes.push(node);
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id)
    }

    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().enumerate()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TreeNode> {
        self.nodes.iter_mut()
    }

    /// Sets `has_children` and `leaf_count` on every node, bottom-up.
    pub(crate) fn compute_counts(&mut self) {
        for id in (0..self.nodes.len()).rev() {
            let count: usize = self.nodes[id]
                .children
                .iter()
                .map(|&child| self.nodes[child].leaf_weight())
                .sum();
            let node = &mut self.nodes[id];
            node.has_children = !node.children.is_empty();
            node.leaf_count = count;
        }
    }

    /// Sorts the roots and every child list with `cmp`.
    pub(crate) fn sort_children<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&TreeNode, &TreeNode) -> Ordering,
    {
        let nodes = &self.nodes;
        self.roots.sort_by(|&a, &b| cmp(&nodes[a], &nodes[b]));
        for id in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[id].children);
            children.sort_by(|&a, &b| cmp(&self.nodes[a], &self.nodes[b]));
            self.nodes[id].children = children;
        }
    }

    /// Keeps only the nodes in `keep`: every child list and the root list are
    /// narrowed, `has_children` follows the narrowed lists. Leaf counts keep
    /// describing the unfiltered subtree.
    pub(crate) fn retain(&mut self, keep: &[bool]) {
        let kept = |id: &NodeId| keep.get(*id).copied().unwrap_or(false);
        self.roots.retain(kept);
        for node in &mut self.nodes {
            node.children.retain(kept);
            node.has_children = !node.children.is_empty();
        }
    }
}
