//! FILENAME: core/grouping-engine/src/node.rs
//! Group Tree - arena of group and leaf nodes built by one `group()` call.
//!
//! Nodes are stored in a flat `Vec` and reference each other by `NodeId`.
//! Parents are always pushed before their children, so walking the arena in
//! reverse visits every child before its parent.

use grid_model::{NodeId, Row, Value};
use rustc_hash::FxHashMap;

/// Bucket key used for `null` / missing values.
pub const BLANK_KEY: &str = "(blank)";

/// A display node: either a synthetic group or a leaf wrapping one row.
#[derive(Debug, Clone)]
pub struct RowNode {
    /// Key path for groups (`dept=Eng|team=A`), `row-<index>` for leaves.
    pub id: String,

    /// The source row for leaves; for groups, a record holding the grouped
    /// field and its original value.
    pub data: Row,

    /// Index of the source row (leaves only).
    pub row_index: Option<usize>,

    /// Depth in the tree (0 = outermost group).
    pub level: usize,

    pub group: bool,

    /// Effective expansion, refreshed on every flatten. Always false for leaves.
    pub expanded: bool,

    pub children: Vec<NodeId>,

    /// Every leaf below this group, in source order. Empty for leaves.
    pub all_leaf_children: Vec<NodeId>,

    pub parent: Option<NodeId>,

    /// Bucket key of this group (`String(value)` or `(blank)`).
    pub key: Option<String>,

    /// Field this group buckets on.
    pub field: Option<String>,

    /// Aggregated values keyed by field.
    pub agg_data: FxHashMap<String, Value>,
}

impl RowNode {
    pub fn leaf(row_index: usize, data: Row, level: usize, parent: Option<NodeId>) -> Self {
        RowNode {
            id: format!("row-{}", row_index),
            data,
            row_index: Some(row_index),
            level,
            group: false,
            expanded: false,
            children: Vec::new(),
            all_leaf_children: Vec::new(),
            parent,
            key: None,
            field: None,
            agg_data: FxHashMap::default(),
        }
    }

    pub fn group(
        key_path: String,
        field: &str,
        key: String,
        value: Value,
        level: usize,
        parent: Option<NodeId>,
    ) -> Self {
        RowNode {
            id: key_path,
            data: Row::new().with(field, value),
            row_index: None,
            level,
            group: true,
            expanded: false,
            children: Vec::new(),
            all_leaf_children: Vec::new(),
            parent,
            key: Some(key),
            field: Some(field.to_string()),
            agg_data: FxHashMap::default(),
        }
    }

    /// Number of leaf rows this node stands for (1 for a leaf).
    pub fn leaf_count(&self) -> usize {
        if self.group {
            self.all_leaf_children.len()
        } else {
            1
        }
    }
}

/// Arena holding every node of the current grouping.
#[derive(Debug, Clone, Default)]
pub struct GroupTree {
    nodes: Vec<RowNode>,
    roots: Vec<NodeId>,
    by_id: FxHashMap<String, NodeId>,
}

impl GroupTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: RowNode) -> NodeId {
        let id = self.nodes.len();
        self.by_id.insert(node.id.clone(), id);
        self.nodes.push(node);
        id
    }

    pub fn set_roots(&mut self, roots: Vec<NodeId>) {
        self.roots = roots;
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&RowNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut RowNode> {
        self.nodes.get_mut(id)
    }

    /// Looks a node up by its string id (key path for groups).
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &RowNode)> {
        self.nodes.iter().enumerate()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut RowNode> {
        self.nodes.iter_mut()
    }

    pub fn group_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.group).count()
    }

    /// All group nodes strictly below `id`, depth-first.
    pub fn descendant_groups(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(id) {
            Some(node) => node.children.clone(),
            None => return out,
        };
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            if node.group {
                out.push(current);
                stack.extend(node.children.iter().copied());
            }
        }
        out
    }

    /// Source rows of every leaf under `id` (the leaf's own row for a leaf).
    pub fn leaf_rows(&self, id: NodeId) -> Vec<&Row> {
        match self.nodes.get(id) {
            Some(node) if node.group => node
                .all_leaf_children
                .iter()
                .map(|&leaf| &self.nodes[leaf].data)
                .collect(),
            Some(node) => vec![&node.data],
            None => Vec::new(),
        }
    }

    /// Fills `all_leaf_children` bottom-up. Children always have larger ids
    /// than their parent, so a reverse walk sees them first.
    pub(crate) fn collect_leaves(&mut self) {
        for id in (0..self.nodes.len()).rev() {
            if !self.nodes[id].group {
                continue;
            }
            let mut leaves = Vec::new();
            for &child in &self.nodes[id].children {
                let child_node = &self.nodes[child];
                if child_node.group {
                    leaves.extend_from_slice(&child_node.all_leaf_children);
                } else {
                    leaves.push(child);
                }
            }
            self.nodes[id].all_leaf_children = leaves;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> GroupTree {
        let mut tree = GroupTree::new();
        let g = tree.push(RowNode::group("k=a".into(), "k", "a".into(), Value::from("a"), 0, None));
        let l0 = tree.push(RowNode::leaf(0, Row::new().with("k", "a"), 1, Some(g)));
        let l1 = tree.push(RowNode::leaf(1, Row::new().with("k", "a"), 1, Some(g)));
        tree.node_mut(g).unwrap().children = vec![l0, l1];
        tree.set_roots(vec![g]);
        tree.collect_leaves();
        tree
    }

    #[test]
    fn test_collect_leaves() {
        let tree = small_tree();
        let group = tree.node(0).unwrap();
        assert_eq!(group.all_leaf_children, vec![1, 2]);
        assert_eq!(group.leaf_count(), 2);
        assert_eq!(tree.node(1).unwrap().leaf_count(), 1);
    }

    #[test]
    fn test_find_by_id() {
        let tree = small_tree();
        assert_eq!(tree.find("k=a"), Some(0));
        assert_eq!(tree.find("row-1"), Some(2));
        assert_eq!(tree.find("k=b"), None);
        assert_eq!(tree.leaf_rows(0).len(), 2);
    }
}
