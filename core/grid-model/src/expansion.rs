//! FILENAME: core/grid-model/src/expansion.rs
//! PURPOSE: Tri-state expand/collapse bookkeeping shared by grouping and tree data.
//! CONTEXT: Trees are rebuilt from scratch on every data change, so the
//! expanded flag is never stored on a node. Instead each node id maps to an
//! explicit override, and everything else inherits from a default depth.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Explicit per-node override. A node with no entry is `Inherited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpansionState {
    ExplicitExpanded,
    ExplicitCollapsed,
    Inherited,
}

/// Default expansion rule for nodes without an explicit override.
///
/// Built from the integer convention `-1` = expand everything, `0` = all
/// collapsed, `N` = expand levels `< N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum DefaultExpansion {
    All,
    Depth(usize),
}

impl DefaultExpansion {
    pub fn from_level(level: i32) -> Self {
        if level < 0 {
            DefaultExpansion::All
        } else {
            DefaultExpansion::Depth(level as usize)
        }
    }

    pub fn expands(&self, level: usize) -> bool {
        match self {
            DefaultExpansion::All => true,
            DefaultExpansion::Depth(depth) => level < *depth,
        }
    }
}

impl Default for DefaultExpansion {
    fn default() -> Self {
        DefaultExpansion::Depth(0)
    }
}

impl From<i32> for DefaultExpansion {
    fn from(level: i32) -> Self {
        DefaultExpansion::from_level(level)
    }
}

impl From<DefaultExpansion> for i32 {
    fn from(value: DefaultExpansion) -> Self {
        match value {
            DefaultExpansion::All => -1,
            DefaultExpansion::Depth(depth) => depth as i32,
        }
    }
}

/// Explicit overrides keyed by node id, plus the default rule.
#[derive(Debug, Clone, Default)]
pub struct ExpansionStore {
    overrides: FxHashMap<String, ExpansionState>,
    default: DefaultExpansion,
}

impl ExpansionStore {
    pub fn new(default: DefaultExpansion) -> Self {
        ExpansionStore {
            overrides: FxHashMap::default(),
            default,
        }
    }

    pub fn default_expansion(&self) -> DefaultExpansion {
        self.default
    }

    pub fn set_default(&mut self, default: DefaultExpansion) {
        self.default = default;
    }

    pub fn state(&self, id: &str) -> ExpansionState {
        self.overrides
            .get(id)
            .copied()
            .unwrap_or(ExpansionState::Inherited)
    }

    /// Effective expansion: explicit collapse, then explicit expand, then the
    /// default depth rule.
    pub fn is_expanded(&self, id: &str, level: usize) -> bool {
        match self.state(id) {
            ExpansionState::ExplicitCollapsed => false,
            ExpansionState::ExplicitExpanded => true,
            ExpansionState::Inherited => self.default.expands(level),
        }
    }

    pub fn expand(&mut self, id: impl Into<String>) {
        self.overrides.insert(id.into(), ExpansionState::ExplicitExpanded);
    }

    pub fn collapse(&mut self, id: impl Into<String>) {
        self.overrides.insert(id.into(), ExpansionState::ExplicitCollapsed);
    }

    /// Drops any override so the node inherits the default again.
    pub fn reset(&mut self, id: &str) {
        self.overrides.remove(id);
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    /// Removes explicit-expanded entries whose id starts with `prefix`.
    /// Returns how many were removed.
    pub fn purge_expanded_with_prefix(&mut self, prefix: &str) -> usize {
        let before = self.overrides.len();
        self.overrides.retain(|id, state| {
            !(*state == ExpansionState::ExplicitExpanded && id.starts_with(prefix))
        });
        before - self.overrides.len()
    }

    /// Ids explicitly expanded, sorted.
    pub fn expanded_ids(&self) -> Vec<&str> {
        self.ids_in(ExpansionState::ExplicitExpanded)
    }

    /// Ids explicitly collapsed, sorted.
    pub fn collapsed_ids(&self) -> Vec<&str> {
        self.ids_in(ExpansionState::ExplicitCollapsed)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    fn ids_in(&self, wanted: ExpansionState) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .overrides
            .iter()
            .filter(|(_, state)| **state == wanted)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}
