//! The built hierarchy and its queries.

use std::collections::HashMap;
use std::sync::Arc;

use crate::aggregate::AggregateResult;
use crate::builder::TreeBuilder;
use crate::config::HierarchyConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{HierarchyError, HierarchyResult};
use crate::level::Level;
use crate::node::Node;
use crate::paths::{PathMap, PathResolver};
use crate::stats::HierarchyStats;
use crate::structure::{StructureParser, StructureSource};
use crate::table::Table;
use crate::value::{NodeKey, Value};

/// An immutable rooted hierarchy with resolved paths and levels.
///
/// Node storage is shared between clones. The only mutation, merging an
/// aggregate column, copies the node storage first if another clone still
/// holds it, so snapshots handed to readers never change underneath them.
///
/// # Example
///
/// ```rust
/// use hierarchy_tree::{Hierarchy, HierarchyConfig, Level, NodeKey, Table, Value};
///
/// let org = Table::from_columns(vec![
///     ("oe", ["1", "12", "121", "2"].map(Value::from).to_vec()),
///     ("parent_oe", ["0", "1", "12", "0"].map(Value::from).to_vec()),
/// ])
/// .unwrap();
///
/// let h = Hierarchy::new(&org, HierarchyConfig::builder("oe").with_root("0").build()).unwrap();
///
/// let path: Vec<String> = h.path(&"121".into()).unwrap().iter().map(|k| k.to_string()).collect();
/// assert_eq!(path, ["0", "1", "12", "121"]);
/// assert_eq!(h.level(&"121".into()), Some(Level::Depth(3)));
/// ```
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub(crate) config: HierarchyConfig,
    pub(crate) root: NodeKey,
    pub(crate) nodes: Arc<Vec<Node>>,
    pub(crate) index: Arc<HashMap<NodeKey, usize>>,
    pub(crate) children: Arc<HashMap<NodeKey, Vec<NodeKey>>>,
    pub(crate) paths: Arc<PathMap>,
    pub(crate) attribute_columns: Arc<Vec<String>>,
    /// Attribute columns that came from the definition table; later ones
    /// were merged aggregates.
    pub(crate) base_attributes: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) stats: HierarchyStats,
}

impl Hierarchy {
    /// Builds a hierarchy from a node definition table.
    ///
    /// See [`TreeBuilder::build`] for the errors.
    pub fn new(table: &Table, config: HierarchyConfig) -> HierarchyResult<Self> {
        TreeBuilder::new(config).build(table)
    }

    /// Builds a hierarchy from structure strings instead of parent links,
    /// using the default delimiter (`|`) and root sentinel (`root`).
    ///
    /// See [`StructureParser`] for the parsing rules.
    pub fn from_structure(
        table: &Table,
        config: HierarchyConfig,
        source: &StructureSource,
    ) -> HierarchyResult<Self> {
        StructureParser::new().build(table, config, source)
    }

    /// Name of the hierarchy and of its key column.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The configuration the hierarchy was built with.
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// The root key.
    pub fn root(&self) -> &NodeKey {
        &self.root
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the hierarchy has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in definition order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Nodes that have a level, in definition order.
    pub fn reachable_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.level.is_assigned())
    }

    /// Looks up a node.
    pub fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.index.get(key).map(|&i| &self.nodes[i])
    }

    /// Returns true if the key is a node of this hierarchy.
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    /// Level of a node, `None` for unknown keys.
    pub fn level(&self, key: &NodeKey) -> Option<Level> {
        self.node(key).map(Node::level)
    }

    /// Full path `[root, .., key]`. `None` for the root, unknown keys and
    /// unreachable nodes.
    #[inline]
    pub fn path(&self, key: &NodeKey) -> Option<&[NodeKey]> {
        self.paths.get(key).map(Vec::as_slice)
    }

    /// Path without the root: one entry per level `1..=level`.
    #[inline]
    pub fn lineage(&self, key: &NodeKey) -> Option<&[NodeKey]> {
        self.path(key).map(|p| &p[1..])
    }

    /// Ancestors strictly between the root and the node, top-down.
    pub fn ancestors(&self, key: &NodeKey) -> Option<&[NodeKey]> {
        self.path(key).map(|p| &p[1..p.len() - 1])
    }

    /// Returns true if `ancestor` lies on the path of `descendant`
    /// (the root counts as every reachable node's ancestor).
    pub fn is_ancestor_of(&self, ancestor: &NodeKey, descendant: &NodeKey) -> bool {
        self.path(descendant)
            .is_some_and(|p| p[..p.len() - 1].contains(ancestor))
    }

    /// Direct children in definition order.
    #[inline]
    pub fn children(&self, key: &NodeKey) -> &[NodeKey] {
        self.children
            .get(key)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every node below `key`, breadth-first, excluding `key`.
    pub fn descendants(&self, key: &NodeKey) -> Vec<NodeKey> {
        PathResolver::new(&self.children).descendants(key)
    }

    /// Every node below `key`, preceded by `key` itself.
    pub fn descendants_or_self(&self, key: &NodeKey) -> Vec<NodeKey> {
        let mut result = vec![key.clone()];
        result.extend(self.descendants(key));
        result
    }

    /// Attribute column names, merged aggregates last.
    pub fn attribute_columns(&self) -> &[String] {
        &self.attribute_columns
    }

    /// One attribute of one node.
    pub fn attribute(&self, key: &NodeKey, column: &str) -> Option<&Value> {
        let col = self.attribute_columns.iter().position(|c| c == column)?;
        self.node(key).map(|n| &n.attributes[col])
    }

    /// Findings tolerated during construction.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Build statistics.
    pub fn stats(&self) -> &HierarchyStats {
        &self.stats
    }

    /// Merges an aggregate as a node column. Nodes without a value get
    /// [`Value::Empty`]. An existing column of the same name is replaced, so
    /// merging the same result twice leaves the table unchanged.
    ///
    /// # Errors
    ///
    /// [`HierarchyError::ReservedColumn`] if the column is one the node table
    /// renders itself: `<name>`, `parent_<name>`, `h_ix` or `h_level`.
    pub fn merge_aggregate(&mut self, result: &AggregateResult) -> HierarchyResult<()> {
        let column = result.column();
        if self.is_reserved_column(column) {
            return Err(HierarchyError::ReservedColumn {
                column: column.to_string(),
            });
        }

        let columns = Arc::make_mut(&mut self.attribute_columns);
        let nodes = Arc::make_mut(&mut self.nodes);

        match columns.iter().position(|c| c == column) {
            Some(col) => {
                for node in nodes.iter_mut() {
                    node.attributes[col] = result.value_or_empty(&node.key);
                }
            }
            None => {
                columns.push(column.to_string());
                for node in nodes.iter_mut() {
                    node.attributes.push(result.value_or_empty(&node.key));
                }
            }
        }
        Ok(())
    }

    /// Returns a new snapshot with the aggregate merged; `self` is untouched.
    ///
    /// Fails like [`merge_aggregate`](Self::merge_aggregate).
    pub fn with_aggregate(&self, result: &AggregateResult) -> HierarchyResult<Self> {
        let mut next = self.clone();
        next.merge_aggregate(result)?;
        Ok(next)
    }

    fn is_reserved_column(&self, column: &str) -> bool {
        column == self.config.name
            || column == self.config.parent_column()
            || column == self.config.ix_column
            || column == self.config.level_column
    }

    /// Renders the node table.
    ///
    /// Columns: `<name>`, `parent_<name>`, definition attributes, `h_ix`,
    /// `h_level`, merged aggregates. Rows follow definition order.
    pub fn definition_table(&self) -> Table {
        let (base, merged) = self.attribute_columns.split_at(self.base_attributes);
        let mut columns = Vec::with_capacity(self.attribute_columns.len() + 4);
        columns.push(self.config.name.clone());
        columns.push(self.config.parent_column());
        columns.extend(base.iter().cloned());
        columns.push(self.config.ix_column.clone());
        columns.push(self.config.level_column.clone());
        columns.extend(merged.iter().cloned());

        let mut table = Table::new(columns);
        for node in self.nodes.iter() {
            let (base, merged) = node.attributes.split_at(self.base_attributes);
            let mut row = Vec::with_capacity(table.width());
            row.push(Value::from(&node.key));
            row.push(Value::from(&node.parent));
            row.extend(base.iter().cloned());
            row.push(Value::Int(node.ix));
            row.push(node.level.to_value());
            row.extend(merged.iter().cloned());
            let pushed = table.push_row(row);
            debug_assert!(pushed.is_ok(), "node row width differs from the rendered columns");
        }
        table
    }
}
