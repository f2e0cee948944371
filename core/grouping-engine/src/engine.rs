//! FILENAME: core/grouping-engine/src/engine.rs
//! Row Grouping Engine - turns flat rows into a grouped, expand-aware display list.
//!
//! Algorithm:
//! 1. Bucket rows by the first group field (first-appearance order), recurse
//!    into each bucket with the remaining fields, wrap the deepest rows as leaves
//! 2. Collect every group's leaves bottom-up
//! 3. Aggregate each group from its raw leaf rows
//! 4. Flatten depth-first, descending only into expanded groups
//!
//! Expansion is never stored in the tree itself; it is looked up from the
//! tri-state store on every flatten, so rebuilding from new data keeps the
//! user's expand/collapse choices.

use grid_model::{
    log_debug, log_enter, log_exit, log_warn, ColumnDef, DefaultExpansion, ExpansionStore,
    NodeId, Row, Value,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::aggregation::AggregationRegistry;
use crate::definition::{AggColumn, CustomAggFn, GroupingOptions};
use crate::node::{GroupTree, RowNode, BLANK_KEY};

const LOG_CAT: &str = "GROUP";

// ============================================================================
// ENGINE
// ============================================================================

/// Groups rows by one or more fields and keeps the resulting display list.
#[derive(Debug, Default)]
pub struct RowGroupingEngine {
    /// Fields to group by, outermost first.
    group_columns: Vec<String>,

    /// Tri-state expand/collapse overrides keyed by group key path.
    expansion: ExpansionStore,

    /// Named custom aggregations.
    registry: AggregationRegistry,

    /// Fields rolled up on each group.
    agg_columns: Vec<AggColumn>,

    /// Tree from the last `group()` call.
    tree: GroupTree,

    /// Flattened, expansion-aware node order.
    display: Vec<NodeId>,
}

impl RowGroupingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: GroupingOptions) -> Self {
        let mut engine = Self::new();
        engine.apply_options(options);
        engine
    }

    /// Replaces group columns, default expansion and aggregation columns.
    /// Takes effect on the next `group()` call.
    pub fn apply_options(&mut self, options: GroupingOptions) {
        self.group_columns = options.group_columns;
        self.expansion.set_default(options.group_default_expanded);
        self.agg_columns = options.agg_columns;
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    pub fn set_group_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_columns = columns.into_iter().map(Into::into).collect();
    }

    pub fn group_columns(&self) -> &[String] {
        &self.group_columns
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_columns.is_empty()
    }

    /// `-1` expands all levels, `0` collapses all, `N` expands levels `< N`.
    pub fn set_group_default_expanded(&mut self, level: i32) {
        self.expansion.set_default(DefaultExpansion::from_level(level));
        self.flatten();
    }

    pub fn group_default_expanded(&self) -> DefaultExpansion {
        self.expansion.default_expansion()
    }

    /// Replaces every named custom aggregation.
    pub fn set_agg_funcs<I>(&mut self, funcs: I)
    where
        I: IntoIterator<Item = (String, CustomAggFn)>,
    {
        self.registry.set_all(funcs);
    }

    pub fn register_agg_func(&mut self, name: impl Into<String>, func: CustomAggFn) {
        self.registry.register(name, func);
    }

    pub fn registry(&self) -> &AggregationRegistry {
        &self.registry
    }

    pub fn set_agg_columns(&mut self, columns: Vec<AggColumn>) {
        self.agg_columns = columns;
    }

    pub fn agg_columns(&self) -> &[AggColumn] {
        &self.agg_columns
    }

    /// Derives aggregation columns from every column definition that names an
    /// `aggFunc`.
    pub fn build_agg_columns_from_defs(defs: &[ColumnDef]) -> Vec<AggColumn> {
        defs.iter()
            .filter_map(|def| {
                def.agg_func
                    .as_ref()
                    .map(|func| AggColumn::new(def.field.clone(), func.clone()))
            })
            .collect()
    }

    pub fn set_agg_columns_from_defs(&mut self, defs: &[ColumnDef]) {
        self.agg_columns = Self::build_agg_columns_from_defs(defs);
    }

    // ------------------------------------------------------------------------
    // Build
    // ------------------------------------------------------------------------

    /// Rebuilds the tree from `rows` and returns the new display list.
    /// Without group columns every row becomes a top-level leaf.
    pub fn group(&mut self, rows: &[Row]) -> Vec<&RowNode> {
        log_enter!(LOG_CAT, "group", "rows={} fields={:?}", rows.len(), self.group_columns);

        let mut tree = GroupTree::new();
        if self.group_columns.is_empty() {
            let roots = rows
                .iter()
                .enumerate()
                .map(|(i, row)| tree.push(RowNode::leaf(i, row.clone(), 0, None)))
                .collect();
            tree.set_roots(roots);
        } else {
            let indices: Vec<usize> = (0..rows.len()).collect();
            let roots = build_level(&mut tree, &self.group_columns, rows, &indices, 0, None, "");
            tree.set_roots(roots);
            tree.collect_leaves();
        }
        self.tree = tree;
        self.compute_aggregates();
        self.flatten();

        log_exit!(
            LOG_CAT,
            "group",
            "groups={} display={}",
            self.tree.group_count(),
            self.display.len()
        );
        self.display_list()
    }

    /// Aggregates every group from its raw leaf rows. Walks the arena
    /// bottom-up so children are finished first, but never reads their results.
    fn compute_aggregates(&mut self) {
        if self.agg_columns.is_empty() {
            return;
        }
        for id in (0..self.tree.len()).rev() {
            let agg_data = {
                let node = match self.tree.node(id) {
                    Some(node) if node.group => node,
                    _ => continue,
                };
                let leaf_rows = self.tree.leaf_rows(id);
                let mut agg_data = FxHashMap::default();
                for column in &self.agg_columns {
                    let values: Vec<Value> =
                        leaf_rows.iter().map(|row| row.get(&column.field).clone()).collect();
                    let result = match self.registry.aggregate(&column.agg_func, &values, &leaf_rows) {
                        Ok(value) => value,
                        Err(e) => {
                            log_warn!(LOG_CAT, "group={} field={}: {}", node.id, column.field, e);
                            Value::Null
                        }
                    };
                    agg_data.insert(column.field.clone(), result);
                }
                agg_data
            };
            if let Some(node) = self.tree.node_mut(id) {
                node.agg_data = agg_data;
            }
        }
    }

    /// Recomputes every group's `expanded` flag and the display order.
    fn flatten(&mut self) {
        for node in self.tree.iter_mut() {
            node.expanded = node.group && self.expansion.is_expanded(&node.id, node.level);
        }

        let mut display = Vec::with_capacity(self.tree.len());
        let mut stack: SmallVec<[NodeId; 16]> = self.tree.roots().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            display.push(id);
            if let Some(node) = self.tree.node(id) {
                if node.expanded {
                    stack.extend(node.children.iter().rev().copied());
                }
            }
        }
        self.display = display;
    }

    // ------------------------------------------------------------------------
    // Expand / collapse
    // ------------------------------------------------------------------------

    /// Effective expansion of a group: explicit collapse, then explicit
    /// expand, then the default depth.
    pub fn is_expanded(&self, key_path: &str) -> bool {
        let level = self
            .tree
            .find(key_path)
            .and_then(|id| self.tree.node(id))
            .map(|node| node.level)
            .unwrap_or_else(|| key_path.matches('|').count());
        self.expansion.is_expanded(key_path, level)
    }

    pub fn expand_group(&mut self, key_path: &str) {
        self.expansion.expand(key_path);
        self.flatten();
    }

    /// Collapses `key_path` and force-collapses every group below it, dropping
    /// any explicit expansion recorded under that prefix.
    pub fn collapse_group(&mut self, key_path: &str) {
        let purged = self
            .expansion
            .purge_expanded_with_prefix(&format!("{}|", key_path));
        self.expansion.collapse(key_path);

        if let Some(id) = self.tree.find(key_path) {
            for descendant in self.tree.descendant_groups(id) {
                if let Some(node) = self.tree.node(descendant) {
                    self.expansion.collapse(node.id.clone());
                }
            }
        }
        log_debug!(LOG_CAT, "collapse {} purged={}", key_path, purged);
        self.flatten();
    }

    /// Flips the effective expansion of a group. Returns the new state.
    pub fn toggle_group(&mut self, key_path: &str) -> bool {
        if self.is_expanded(key_path) {
            self.collapse_group(key_path);
            false
        } else {
            self.expand_group(key_path);
            true
        }
    }

    /// Expands every group above `depth` (every group when `None`) and
    /// collapses the rest.
    pub fn expand_all(&mut self, depth: Option<usize>) {
        self.expansion.clear();
        for (_, node) in self.tree.iter().filter(|(_, n)| n.group) {
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
        for (_, node) in self.tree.iter().filter(|(_, n)| n.group) {
            self.expansion.collapse(node.id.clone());
        }
        self.flatten();
    }

    /// Explicitly expanded key paths, sorted.
    pub fn expanded_paths(&self) -> Vec<&str> {
        self.expansion.expanded_ids()
    }

    /// Explicitly collapsed key paths, sorted.
    pub fn collapsed_paths(&self) -> Vec<&str> {
        self.expansion.collapsed_ids()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn display_list(&self) -> Vec<&RowNode> {
        self.display
            .iter()
            .filter_map(|&id| self.tree.node(id))
            .collect()
    }

    pub fn display_ids(&self) -> &[NodeId] {
        &self.display
    }

    pub fn display_len(&self) -> usize {
        self.display.len()
    }

    pub fn tree(&self) -> &GroupTree {
        &self.tree
    }

    pub fn root_nodes(&self) -> Vec<&RowNode> {
        self.tree
            .roots()
            .iter()
            .filter_map(|&id| self.tree.node(id))
            .collect()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&RowNode> {
        self.tree.node(id)
    }

    pub fn node_by_path(&self, key_path: &str) -> Option<&RowNode> {
        self.tree.find(key_path).and_then(|id| self.tree.node(id))
    }

    /// Raw rows under a group; empty when the path is unknown.
    pub fn leaf_rows(&self, key_path: &str) -> Vec<&Row> {
        self.tree
            .find(key_path)
            .map(|id| self.tree.leaf_rows(id))
            .unwrap_or_default()
    }

    /// Drops the tree, the display list and all expansion overrides.
    pub fn clear(&mut self) {
        self.tree = GroupTree::new();
        self.display.clear();
        self.expansion.clear();
    }
}

// ============================================================================
// TREE BUILDING
// ============================================================================

/// Buckets `indices` by `fields[level]` and recurses. Returns the ids of the
/// nodes created at this level, in first-appearance order.
fn build_level(
    tree: &mut GroupTree,
    fields: &[String],
    rows: &[Row],
    indices: &[usize],
    level: usize,
    parent: Option<NodeId>,
    parent_path: &str,
) -> Vec<NodeId> {
    let field = &fields[level];

    let mut order: Vec<String> = Vec::new();
    let mut buckets: FxHashMap<String, (Value, Vec<usize>)> = FxHashMap::default();
    for &i in indices {
        let value = rows[i].get(field);
        let key = if value.is_null() {
            BLANK_KEY.to_string()
        } else {
            value.to_key_string()
        };
        buckets
            .entry(key)
            .or_insert_with_key(|k| {
                order.push(k.clone());
                (value.clone(), Vec::new())
            })
            .1
            .push(i);
    }

    let mut level_nodes = Vec::with_capacity(order.len());
    for key in order {
        let Some((value, members)) = buckets.remove(&key) else {
            continue;
        };
        // Values are not escaped, so a `|` or `=` inside a value can collide
        let key_path = if parent_path.is_empty() {
            format!("{}={}", field, key)
        } else {
            format!("{}|{}={}", parent_path, field, key)
        };

        let id = tree.push(RowNode::group(key_path.clone(), field, key, value, level, parent));
        let children = if level + 1 < fields.len() {
            build_level(tree, fields, rows, &members, level + 1, Some(id), &key_path)
        } else {
            members
                .iter()
                .map(|&i| tree.push(RowNode::leaf(i, rows[i].clone(), level + 1, Some(id))))
                .collect()
        };
        if let Some(node) = tree.node_mut(id) {
            node.children = children;
        }
        level_nodes.push(id);
    }
    level_nodes
}
