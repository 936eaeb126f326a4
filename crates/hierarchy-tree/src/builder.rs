//! Hierarchy construction from a node definition table.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::HierarchyConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{HierarchyError, HierarchyResult};
use crate::hierarchy::Hierarchy;
use crate::level::Level;
use crate::node::Node;
use crate::paths::PathResolver;
use crate::stats::HierarchyStats;
use crate::table::Table;
use crate::value::{NodeKey, Value};

/// Validates a node definition table and builds a [`Hierarchy`].
///
/// The table needs a `<name>` key column and a `parent_<name>` column. An
/// integer `h_ix` column, when present, becomes the sort index; otherwise the
/// row position is used. Every other column (except a stale `h_level`) is
/// kept as a node attribute.
///
/// # Example
///
/// ```rust
/// use hierarchy_tree::{HierarchyConfig, Level, NodeKey, Table, TreeBuilder, Value};
///
/// let org = Table::from_columns(vec![
///     ("dept", vec![Value::from("1"), Value::from("12")]),
///     ("parent_dept", vec![Value::from("0"), Value::from("1")]),
/// ])
/// .unwrap();
///
/// let hierarchy = TreeBuilder::new(HierarchyConfig::new("dept")).build(&org).unwrap();
/// assert_eq!(hierarchy.root(), &NodeKey::from("0"));
/// assert_eq!(hierarchy.level(&"12".into()), Some(Level::Depth(2)));
/// ```
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    config: HierarchyConfig,
}

impl TreeBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(config: HierarchyConfig) -> Self {
        Self { config }
    }

    /// Builds the hierarchy.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::MissingColumn`] if the key or parent column is absent
    /// - [`HierarchyError::DuplicateKey`] if a key repeats
    /// - [`HierarchyError::InvalidKey`] for empty or float keys
    /// - [`HierarchyError::InvalidIndex`] for a non-integer sort index
    /// - [`HierarchyError::EmptyDefinition`] for an empty table without a root
    pub fn build(&self, table: &Table) -> HierarchyResult<Hierarchy> {
        let start = Instant::now();
        let name = self.config.name.as_str();
        let parent_column = self.config.parent_column();

        let key_idx = table.require_column(name)?;
        let parent_idx = table.require_column(&parent_column)?;
        let ix_idx = table.column_index(&self.config.ix_column);
        let level_idx = table.column_index(&self.config.level_column);

        let reserved = [Some(key_idx), Some(parent_idx), ix_idx, level_idx];
        let attribute_idx: Vec<usize> = (0..table.width())
            .filter(|i| !reserved.contains(&Some(*i)))
            .collect();
        let attribute_columns: Vec<String> = attribute_idx
            .iter()
            .map(|&i| table.columns()[i].clone())
            .collect();

        let root = match &self.config.root {
            Some(root) => root.clone(),
            None => {
                let first = table.row(0).ok_or(HierarchyError::EmptyDefinition)?;
                key_cell(&first.values()[parent_idx], 0, &parent_column)?
            }
        };

        let mut nodes = Vec::with_capacity(table.len());
        let mut index: HashMap<NodeKey, usize> = HashMap::with_capacity(table.len());
        let mut children: HashMap<NodeKey, Vec<NodeKey>> = HashMap::new();

        for (row, record) in table.rows().enumerate() {
            let values = record.values();
            let key = key_cell(&values[key_idx], row, name)?;
            let parent = key_cell(&values[parent_idx], row, &parent_column)?;

            if let Some(&first_row) = index.get(&key) {
                return Err(HierarchyError::DuplicateKey {
                    key,
                    first_row,
                    row,
                });
            }

            let ix = match ix_idx {
                Some(i) => values[i].as_i64().ok_or_else(|| HierarchyError::InvalidIndex {
                    row,
                    value: values[i].clone(),
                })?,
                None => row as i64,
            };

            index.insert(key.clone(), nodes.len());
            children.entry(parent.clone()).or_default().push(key.clone());
            nodes.push(Node {
                key,
                parent,
                ix,
                level: Level::Unassigned,
                attributes: attribute_idx.iter().map(|&i| values[i].clone()).collect(),
            });
        }

        let paths = PathResolver::new(&children).resolve(&root);

        let mut diagnostics = Vec::new();
        let mut max_depth = 0;
        for node in &mut nodes {
            node.level = if node.key == root {
                Level::ROOT
            } else {
                paths
                    .get(&node.key)
                    .map_or(Level::Unassigned, |path| Level::from_path_len(path.len()))
            };

            match node.level.depth() {
                Some(depth) => max_depth = max_depth.max(depth),
                None => {
                    log::warn!(
                        "node {} of hierarchy '{}' is not reachable from root {}",
                        node.key,
                        name,
                        root
                    );
                    diagnostics.push(Diagnostic::UnreachableNode {
                        key: node.key.clone(),
                    });
                }
            }
        }

        let stats = HierarchyStats {
            node_count: nodes.len(),
            reachable_count: nodes.len() - diagnostics.len(),
            unreachable_count: diagnostics.len(),
            max_depth,
            skipped_rows: 0,
            build_time_ms: start.elapsed().as_millis() as u64,
        };

        log::debug!(
            "built hierarchy '{}' with {} nodes under root {} (max depth {})",
            name,
            stats.node_count,
            root,
            stats.max_depth
        );

        Ok(Hierarchy {
            base_attributes: attribute_columns.len(),
            config: self.config.clone(),
            root,
            nodes: Arc::new(nodes),
            index: Arc::new(index),
            children: Arc::new(children),
            paths: Arc::new(paths),
            attribute_columns: Arc::new(attribute_columns),
            diagnostics,
            stats,
        })
    }
}

fn key_cell(value: &Value, row: usize, column: &str) -> HierarchyResult<NodeKey> {
    NodeKey::from_value(value).ok_or_else(|| HierarchyError::InvalidKey {
        row,
        column: column.to_string(),
        value: value.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    fn org() -> Table {
        Table::from_columns(vec![
            ("dept", text(&["1", "12", "121", "2"])),
            ("parent_dept", text(&["0", "1", "12", "0"])),
            ("manager", text(&["Mgr_1", "Mgr_12", "Mgr_121", "Mgr_2"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_assigns_levels() {
        let hierarchy = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&org())
            .unwrap();

        assert_eq!(hierarchy.len(), 4);
        assert_eq!(hierarchy.level(&"1".into()), Some(Level::Depth(1)));
        assert_eq!(hierarchy.level(&"121".into()), Some(Level::Depth(3)));
        assert_eq!(hierarchy.stats().max_depth, 3);
        assert!(hierarchy.diagnostics().is_empty());
    }

    #[test]
    fn test_root_defaults_to_first_parent() {
        let hierarchy = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&org())
            .unwrap();
        assert_eq!(hierarchy.root(), &NodeKey::from("0"));
    }

    #[test]
    fn test_ix_defaults_to_row_position() {
        let hierarchy = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&org())
            .unwrap();
        let ixs: Vec<i64> = hierarchy.nodes().iter().map(Node::ix).collect();
        assert_eq!(ixs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_existing_ix_column_is_used() {
        let mut table = Table::new(["dept", "parent_dept", "h_ix"]);
        table
            .push_row(vec![Value::from("1"), Value::from("0"), Value::Int(20)])
            .unwrap();
        table
            .push_row(vec![Value::from("2"), Value::from("0"), Value::Int(10)])
            .unwrap();

        let hierarchy = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&table)
            .unwrap();
        assert_eq!(hierarchy.node(&"1".into()).unwrap().ix(), 20);
        assert_eq!(hierarchy.node(&"2".into()).unwrap().ix(), 10);
        assert!(hierarchy.attribute_columns().is_empty());
    }

    #[test]
    fn test_non_integer_ix_is_rejected() {
        let table = Table::from_rows(
            ["dept", "parent_dept", "h_ix"],
            vec![vec![Value::from("1"), Value::from("0"), Value::from("first")]],
        )
        .unwrap();

        let err = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&table)
            .unwrap_err();
        assert!(matches!(err, HierarchyError::InvalidIndex { row: 0, .. }));
    }

    #[test]
    fn test_missing_parent_column() {
        let table = Table::from_columns(vec![("dept", text(&["1"]))]).unwrap();
        let err = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&table)
            .unwrap_err();
        assert_eq!(err, HierarchyError::missing_column("parent_dept"));
    }

    #[test]
    fn test_missing_key_column() {
        let table = Table::from_columns(vec![("parent_dept", text(&["0"]))]).unwrap();
        let err = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&table)
            .unwrap_err();
        assert_eq!(err, HierarchyError::missing_column("dept"));
    }

    #[test]
    fn test_duplicate_key_is_fatal() {
        let table = Table::from_columns(vec![
            ("dept", text(&["1", "12", "1"])),
            ("parent_dept", text(&["0", "1", "0"])),
        ])
        .unwrap();

        let err = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&table)
            .unwrap_err();
        assert_eq!(
            err,
            HierarchyError::DuplicateKey {
                key: NodeKey::from("1"),
                first_row: 0,
                row: 2,
            }
        );
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let table = Table::from_rows(
            ["dept", "parent_dept"],
            vec![vec![Value::Empty, Value::from("0")]],
        )
        .unwrap();

        let err = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&table)
            .unwrap_err();
        assert!(matches!(err, HierarchyError::InvalidKey { row: 0, .. }));
    }

    #[test]
    fn test_empty_table_without_root() {
        let table = Table::new(["dept", "parent_dept"]);
        let err = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&table)
            .unwrap_err();
        assert_eq!(err, HierarchyError::EmptyDefinition);
    }

    #[test]
    fn test_empty_table_with_root() {
        let table = Table::new(["dept", "parent_dept"]);
        let config = HierarchyConfig::builder("dept").with_root("0").build();
        let hierarchy = TreeBuilder::new(config).build(&table).unwrap();
        assert!(hierarchy.is_empty());
    }

    #[test]
    fn test_unreachable_nodes_get_sentinel_level() {
        let table = Table::from_columns(vec![
            ("dept", text(&["1", "8", "9"])),
            ("parent_dept", text(&["0", "7", "8"])),
        ])
        .unwrap();

        let hierarchy = TreeBuilder::new(HierarchyConfig::new("dept"))
            .build(&table)
            .unwrap();

        assert_eq!(hierarchy.level(&"8".into()), Some(Level::Unassigned));
        assert_eq!(hierarchy.level(&"9".into()), Some(Level::Unassigned));
        assert_eq!(hierarchy.stats().unreachable_count, 2);
        assert_eq!(
            hierarchy.diagnostics(),
            &[
                Diagnostic::UnreachableNode { key: "8".into() },
                Diagnostic::UnreachableNode { key: "9".into() },
            ]
        );
    }

    #[test]
    fn test_root_row_is_level_zero() {
        let table = Table::from_columns(vec![
            ("dept", text(&["0", "1"])),
            ("parent_dept", text(&["top", "0"])),
        ])
        .unwrap();
        let config = HierarchyConfig::builder("dept").with_root("0").build();
        let hierarchy = TreeBuilder::new(config).build(&table).unwrap();

        assert_eq!(hierarchy.level(&"0".into()), Some(Level::ROOT));
        assert_eq!(hierarchy.level(&"1".into()), Some(Level::Depth(1)));
        assert!(hierarchy.path(&"0".into()).is_none());
    }
}
