//! Read-only access to a hierarchy.
//!
//! The roll-up engine only needs lineages, levels, sort indexes and node
//! attributes. [`HierarchyView`] captures exactly that, so the engine can run
//! over [`Hierarchy`] snapshots or over any other store that can answer these
//! questions (a cached or remote tree, a test double).

use hierarchy_tree::{Hierarchy, HierarchyConfig, Level, NodeKey, Table, Value};

/// Trait for hierarchies that facts can be rolled up along.
///
/// # Required Methods
///
/// - [`config`](Self::config) - Column naming of the hierarchy
/// - [`lineage`](Self::lineage) - Path without the root, top-down
/// - [`level`](Self::level) - Level of a node
/// - [`node_ix`](Self::node_ix) - Sort index of a node
/// - [`attribute_columns`](Self::attribute_columns) - Attribute names
/// - [`attributes`](Self::attributes) - Attribute values, aligned with the names
/// - [`definition_table`](Self::definition_table) - Rendered node table
pub trait HierarchyView: Send + Sync {
    /// Column naming of the hierarchy.
    fn config(&self) -> &HierarchyConfig;

    /// Nodes from level 1 down to `key` inclusive.
    ///
    /// Returns `None` for unknown and unreachable nodes.
    fn lineage(&self, key: &NodeKey) -> Option<&[NodeKey]>;

    /// Level of a node, `None` if unknown.
    fn level(&self, key: &NodeKey) -> Option<Level>;

    /// Sort index of a node, `None` if unknown.
    fn node_ix(&self, key: &NodeKey) -> Option<i64>;

    /// Names of the node attribute columns.
    fn attribute_columns(&self) -> &[String];

    /// Attribute values of a node, aligned with
    /// [`attribute_columns`](Self::attribute_columns).
    fn attributes(&self, key: &NodeKey) -> Option<&[Value]>;

    /// The node table: key, parent, attributes, `h_ix`, `h_level`.
    fn definition_table(&self) -> Table;

    /// Name of the hierarchy and of the fact column referencing it.
    fn name(&self) -> &str {
        &self.config().name
    }
}

impl HierarchyView for Hierarchy {
    fn config(&self) -> &HierarchyConfig {
        Hierarchy::config(self)
    }

    fn lineage(&self, key: &NodeKey) -> Option<&[NodeKey]> {
        Hierarchy::lineage(self, key)
    }

    fn level(&self, key: &NodeKey) -> Option<Level> {
        Hierarchy::level(self, key)
    }

    fn node_ix(&self, key: &NodeKey) -> Option<i64> {
        self.node(key).map(|n| n.ix())
    }

    fn attribute_columns(&self) -> &[String] {
        Hierarchy::attribute_columns(self)
    }

    fn attributes(&self, key: &NodeKey) -> Option<&[Value]> {
        self.node(key).map(|n| n.attributes())
    }

    fn definition_table(&self) -> Table {
        Hierarchy::definition_table(self)
    }
}
