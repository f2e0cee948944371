//! FILENAME: core/tree-engine/src/engine.rs
//! Tree Data Engine - builds, flattens, filters and sorts hierarchical rows.
//!
//! The stored arena is only replaced by `build_tree` and only reordered by
//! `sort_tree`. `filter_tree` works on a copy that feeds the display list
//! until the next build, sort or expansion change.

use std::cmp::Ordering;
use std::sync::Arc;

use grid_model::{
    log_debug, log_enter, log_exit, log_warn, DefaultExpansion, ExpansionStore, NodeId, Row,
};
use smallvec::SmallVec;

use crate::definition::{
    DataPathFn, TreeDataOptions, TreeSource, DEFAULT_LABEL_FIELD, DEFAULT_ROW_KEY,
};
use crate::node::{TreeArena, TreeNode};

const LOG_CAT: &str = "TREE";

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug)]
pub struct TreeDataEngine {
    /// Where the hierarchy is read from. `None` lays every row out flat.
    source: Option<TreeSource>,

    row_key: String,
    label_field: String,

    /// Tri-state expand/collapse overrides keyed by node id.
    expansion: ExpansionStore,

    /// Tree from the last `build_tree` call.
    arena: TreeArena,

    /// Filtered copy of `arena` while a filter is showing.
    filtered: Option<TreeArena>,

    /// Flattened node order over the filtered copy when present, else `arena`.
    display: Vec<NodeId>,
}

impl Default for TreeDataEngine {
    fn default() -> Self {
        TreeDataEngine {
            source: None,
            row_key: DEFAULT_ROW_KEY.to_string(),
            label_field: DEFAULT_LABEL_FIELD.to_string(),
            expansion: ExpansionStore::default(),
            arena: TreeArena::new(),
            filtered: None,
            display: Vec::new(),
        }
    }
}

impl TreeDataEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeDataOptions) -> Self {
        let mut engine = Self::new();
        engine.apply_options(options);
        engine
    }

    /// Applies bulk options. A `child_field` switches to children mode; without
    /// one the current source (e.g. a data path function) is kept.
    pub fn apply_options(&mut self, options: TreeDataOptions) {
        if let Some(field) = options.child_field {
            self.source = Some(TreeSource::Children(field));
        }
        self.row_key = options.row_key;
        self.label_field = options.label_field;
        self.expansion.set_default(options.default_expanded);
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Switches to path mode.
    pub fn set_data_path<F>(&mut self, data_path: F)
    where
        F: Fn(&Row) -> Vec<String> + Send + Sync + 'static,
    {
        self.source = Some(TreeSource::Path(Arc::new(data_path)));
    }

    /// Switches to children mode.
    pub fn set_child_field(&mut self, field: impl Into<String>) {
        self.source = Some(TreeSource::Children(field.into()));
    }

    pub fn source(&self) -> Option<&TreeSource> {
        self.source.as_ref()
    }

    pub fn set_row_key(&mut self, field: impl Into<String>) {
        self.row_key = field.into();
    }

    pub fn set_label_field(&mut self, field: impl Into<String>) {
        self.label_field = field.into();
    }

    /// `-1` expands all levels, `0` collapses all, `N` expands levels `< N`.
    pub fn set_default_expanded(&mut self, level: i32) {
        self.expansion.set_default(DefaultExpansion::from_level(level));
        self.flatten();
    }

    pub fn default_expanded(&self) -> DefaultExpansion {
        self.expansion.default_expansion()
    }

    // ------------------------------------------------------------------------
    // Build
    // ------------------------------------------------------------------------

    /// Rebuilds the tree from `rows` and returns the new display list.
    pub fn build_tree(&mut self, rows: &[Row]) -> Vec<&TreeNode> {
        log_enter!(LOG_CAT, "build_tree", "rows={} source={:?}", rows.len(), self.source);

        let mut arena = TreeArena::new();
        match &self.source {
            Some(TreeSource::Path(data_path)) => {
                build_from_paths(&mut arena, rows, data_path, &self.label_field)
            }
            Some(TreeSource::Children(field)) => {
                let top: Vec<&Row> = rows.iter().collect();
                build_from_children(&mut arena, &top, Some(field.as_str()), &self.row_key, 0, None, "");
            }
            None => {
                let top: Vec<&Row> = rows.iter().collect();
                build_from_children(&mut arena, &top, None, &self.row_key, 0, None, "");
            }
        }
        arena.compute_counts();
        self.arena = arena;
        self.flatten();

        log_exit!(
            LOG_CAT,
            "build_tree",
            "nodes={} display={}",
            self.arena.len(),
            self.display.len()
        );
        self.display_list()
    }

    /// Drops any filter, refreshes `expanded` flags and the display order.
    fn flatten(&mut self) {
        if self.filtered.take().is_some() {
            log_debug!(LOG_CAT, "filter dropped");
        }
        for node in self.arena.iter_mut() {
            node.expanded = node.has_children && self.expansion.is_expanded(&node.id, node.level);
        }
        self.display = flatten_arena(&self.arena);
    }

    // ------------------------------------------------------------------------
    // Filter / sort
    // ------------------------------------------------------------------------

    /// Shows only nodes that match `predicate` or have a matching descendant.
    /// Ancestors kept for a descendant match are shown expanded. The stored
    /// tree is left as built.
    pub fn filter_tree<P>(&mut self, predicate: P) -> Vec<&TreeNode>
    where
        P: Fn(&TreeNode) -> bool,
    {
        let len = self.arena.len();
        let mut keep = vec![false; len];
        let mut via_descendant = vec![false; len];
        for id in (0..len).rev() {
            let Some(node) = self.arena.node(id) else {
                continue;
            };
            let descendant_match = node.children.iter().any(|&child| keep[child]);
            via_descendant[id] = descendant_match;
            keep[id] = descendant_match || predicate(node);
        }

        let mut filtered = self.arena.clone();
        filtered.retain(&keep);
        for (id, node) in filtered.iter_mut().enumerate() {
            node.expanded = via_descendant[id]
                || (node.has_children && self.expansion.is_expanded(&node.id, node.level));
        }
        self.display = flatten_arena(&filtered);
        self.filtered = Some(filtered);

        log_debug!(
            LOG_CAT,
            "filter kept={} display={}",
            keep.iter().filter(|k| **k).count(),
            self.display.len()
        );
        self.display_list()
    }

    /// Restores the unfiltered display list.
    pub fn clear_filter(&mut self) {
        self.flatten();
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered.is_some()
    }

    /// Sorts every sibling list of the stored tree with `cmp` and rebuilds
    /// the display list.
    pub fn sort_tree<F>(&mut self, cmp: F) -> Vec<&TreeNode>
    where
        F: FnMut(&TreeNode, &TreeNode) -> Ordering,
    {
        self.arena.sort_children(cmp);
        self.flatten();
        self.display_list()
    }

    // ------------------------------------------------------------------------
    // Expand / collapse
    // ------------------------------------------------------------------------

    pub fn is_expanded(&self, id: &str) -> bool {
        let level = self
            .arena
            .find(id)
            .and_then(|n| self.arena.node(n))
            .map(|node| node.level)
            .unwrap_or(0);
        self.expansion.is_expanded(id, level)
    }

    pub fn expand_node(&mut self, id: &str) {
        self.expansion.expand(id);
        self.flatten();
    }

    /// Hides the node's descendants. Their own expansion state is kept.
    pub fn collapse_node(&mut self, id: &str) {
        self.expansion.collapse(id);
        self.flatten();
    }

    /// Flips the effective expansion of a node. Returns the new state.
    pub fn toggle_node(&mut self, id: &str) -> bool {
        if self.is_expanded(id) {
            self.collapse_node(id);
            false
        } else {
            self.expand_node(id);
            true
        }
    }

    /// Expands every parent above `depth` (every parent when `None`) and
    /// collapses the rest.
    pub fn expand_all(&mut self, depth: Option<usize>) {
        self.expansion.clear();
        for (_, node) in self.arena.iter().filter(|(_, n)| n.has_children) {
            if depth.map_or(true, |d| node.level < d) {
                self.expansion.expand(node.id.clone());
            } else {
                self.expansion.collapse(node.id.clone());
            }
        }
        self.flatten();
    }

    pub fn collapse_all(&mut self) {
        self.expansion.clear();
        for (_, node) in self.arena.iter().filter(|(_, n)| n.has_children) {
            self.expansion.collapse(node.id.clone());
        }
        self.flatten();
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    fn active(&self) -> &TreeArena {
        self.filtered.as_ref().unwrap_or(&self.arena)
    }

    pub fn display_list(&self) -> Vec<&TreeNode> {
        let arena = self.active();
        self.display.iter().filter_map(|&id| arena.node(id)).collect()
    }

    pub fn display_len(&self) -> usize {
        self.display.len()
    }

    /// Top-level nodes of the stored tree.
    pub fn root_nodes(&self) -> Vec<&TreeNode> {
        self.arena
            .roots()
            .iter()
            .filter_map(|&id| self.arena.node(id))
            .collect()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.node(id)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&TreeNode> {
        self.arena.find(id).and_then(|n| self.arena.node(n))
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    /// Drops the tree, any filter, the display list and expansion overrides.
    pub fn clear(&mut self) {
        self.arena = TreeArena::new();
        self.filtered = None;
        self.display.clear();
        self.expansion.clear();
    }
}

// ============================================================================
// TREE BUILDING
// ============================================================================

/// One node per unique path prefix. The row lands on the node at its full
/// path; a prefix no row sits at keeps a placeholder with its segment.
fn build_from_paths(arena: &mut TreeArena, rows: &[Row], data_path: &DataPathFn, label_field: &str) {
    for (i, row) in rows.iter().enumerate() {
        let path = data_path(row);
        if path.is_empty() {
            log_debug!(LOG_CAT, "row {} has an empty path, skipped", i);
            continue;
        }

        let mut parent: Option<NodeId> = None;
        let mut prefix = String::new();
        for (depth, segment) in path.iter().enumerate() {
            if depth > 0 {
                prefix.push('/');
            }
            prefix.push_str(segment);
            let id = match arena.find(&prefix) {
                Some(id) => id,
                None => arena.push(TreeNode::placeholder(
                    prefix.clone(),
                    label_field,
                    segment,
                    depth,
                    parent,
                )),
            };
            parent = Some(id);
        }

        if let Some(node) = parent.and_then(|id| arena.node_mut(id)) {
            if !node.synthetic {
                log_warn!(LOG_CAT, "duplicate path {}, row {} replaces the earlier row", node.id, i);
            }
            node.data = row.clone();
            node.synthetic = false;
            node.row_index = Some(i);
        }
    }
}

/// Walks nested child arrays depth-first. Rows without a key get a
/// positional id (`node-0-2` is the third child of the first root).
fn build_from_children(
    arena: &mut TreeArena,
    rows: &[&Row],
    child_field: Option<&str>,
    row_key: &str,
    level: usize,
    parent: Option<NodeId>,
    parent_fallback: &str,
) {
    for (i, row) in rows.iter().enumerate() {
        let fallback = if parent_fallback.is_empty() {
            format!("node-{}", i)
        } else {
            format!("{}-{}", parent_fallback, i)
        };
        let key = row.get(row_key);
        let id = if key.is_null() {
            fallback.clone()
        } else {
            key.to_key_string()
        };
        if arena.find(&id).is_some() {
            log_warn!(LOG_CAT, "duplicate node id {}", id);
        }

        // Child arrays live in the arena, not in each node's data
        let data: Row = row
            .iter()
            .filter(|(field, _)| Some(*field) != child_field)
            .map(|(field, value)| (field, value.clone()))
            .collect();
        let mut node = TreeNode::new(id, data, level, parent);
        node.row_index = Some(i);
        let node_id = arena.push(node);

        let children: Vec<&Row> = child_field
            .and_then(|field| row.get(field).as_list())
            .map(|items| items.iter().filter_map(|item| item.as_record()).collect())
            .unwrap_or_default();
        if !children.is_empty() {
            build_from_children(
                arena,
                &children,
                child_field,
                row_key,
                level + 1,
                Some(node_id),
                &fallback,
            );
        }
    }
}

/// Depth-first order, descending only into nodes flagged `expanded`.
fn flatten_arena(arena: &TreeArena) -> Vec<NodeId> {
    let mut display = Vec::with_capacity(arena.len());
    let mut stack: SmallVec<[NodeId; 16]> = arena.roots().iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        display.push(id);
        if let Some(node) = arena.node(id) {
            if node.expanded {
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }
    display
}
