//! The roll-up engine: expand, aggregate and wrap.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use hierarchy_tree::{AggregateResult, Hierarchy, Level, NodeKey, Table, Value};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::RollupConfig;
use crate::error::{RollupError, RollupResult};
use crate::reducer::Reducer;
use crate::result::{ExpandedRecord, Expansion, ExpansionStats};
use crate::traits::HierarchyView;

/// A fact row scheduled for expansion.
struct PlannedFact<'f, 'h> {
    row: usize,
    ix: i64,
    values: &'f [Value],
    lineage: &'h [NodeKey],
}

/// Rolls fact tables up along a hierarchy.
///
/// The engine borrows any [`HierarchyView`] read-only, so one hierarchy
/// snapshot can serve many roll-ups at once.
///
/// # Example
///
/// ```rust
/// use hierarchy_rollup::{Reducer, Rollup};
/// use hierarchy_tree::{Hierarchy, HierarchyConfig, Table, Value};
///
/// let org = Table::from_columns(vec![
///     ("dept", ["1", "12", "121", "2"].map(Value::from).to_vec()),
///     ("parent_dept", ["0", "1", "12", "0"].map(Value::from).to_vec()),
/// ])
/// .unwrap();
/// let h = Hierarchy::new(&org, HierarchyConfig::builder("dept").with_root("0").build()).unwrap();
///
/// let people = Table::from_columns(vec![
///     ("pnr", vec![Value::Int(7), Value::Int(8)]),
///     ("dept", vec![Value::from("121"), Value::from("2")]),
/// ])
/// .unwrap();
///
/// let rollup = Rollup::new(&h);
/// assert_eq!(rollup.expand(&people).unwrap().len(), 4);
///
/// let counts = rollup.aggregate(&people, "pnr", "p_count", &Reducer::Count).unwrap();
/// assert_eq!(counts.get(&"1".into()), Some(&Value::Int(1)));
/// assert_eq!(counts.get(&"12".into()), Some(&Value::Int(1)));
/// ```
pub struct Rollup<'a> {
    /// The hierarchy facts are rolled up along.
    view: &'a dyn HierarchyView,
    /// Engine configuration.
    config: RollupConfig,
}

impl<'a> Rollup<'a> {
    /// Creates an engine with default configuration.
    pub fn new(view: &'a dyn HierarchyView) -> Self {
        Self {
            view,
            config: RollupConfig::default(),
        }
    }

    /// Creates an engine with custom configuration.
    pub fn with_config(view: &'a dyn HierarchyView, config: RollupConfig) -> Self {
        Self { view, config }
    }

    /// Returns a reference to the engine configuration.
    pub fn config(&self) -> &RollupConfig {
        &self.config
    }

    /// Returns the hierarchy the engine reads from.
    pub fn view(&self) -> &'a dyn HierarchyView {
        self.view
    }

    /// Duplicates every fact row once per level of its node's lineage.
    ///
    /// Each copy has the node column rewritten to the ancestor and is widened
    /// with the ancestor's attributes (names the fact table already has are
    /// left alone). Facts referencing an unknown or unreachable node are
    /// dropped and only counted in [`ExpansionStats::facts_dropped`].
    ///
    /// The fact's sort index is its own `h_ix` cell when that is an integer,
    /// its row position otherwise. Output is ordered by that index, then top
    /// level first.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::MissingColumn`](hierarchy_tree::HierarchyError::MissingColumn)
    ///   if the facts have no node column
    /// - [`RollupError::ExpansionTooLarge`] past `max_expanded_rows`
    pub fn expand(&self, facts: &Table) -> RollupResult<Expansion> {
        let start = Instant::now();
        let hconfig = self.view.config();
        let key_idx = facts.require_column(self.view.name())?;
        let ix_idx = facts.column_index(&hconfig.ix_column);

        let attribute_columns = self.view.attribute_columns();
        let appended: Vec<usize> = (0..attribute_columns.len())
            .filter(|&i| !facts.has_column(&attribute_columns[i]))
            .collect();
        let mut columns = facts.columns().to_vec();
        columns.extend(appended.iter().map(|&i| attribute_columns[i].clone()));

        let mut plan = Vec::with_capacity(facts.len());
        for (row, record) in facts.rows().enumerate() {
            let values = record.values();
            let lineage = NodeKey::from_value(&values[key_idx])
                .and_then(|key| self.view.lineage(&key));
            let Some(lineage) = lineage else {
                continue;
            };
            let ix = ix_idx
                .and_then(|i| values[i].as_i64())
                .unwrap_or(row as i64);
            plan.push(PlannedFact {
                row,
                ix,
                values,
                lineage,
            });
        }
        plan.sort_by_key(|fact| fact.ix);

        let count: usize = plan.iter().map(|fact| fact.lineage.len()).sum();
        if let Some(limit) = self.config.max_expanded_rows {
            if count > limit {
                return Err(RollupError::ExpansionTooLarge { count, limit });
            }
        }

        #[cfg(feature = "parallel")]
        let nested: Vec<Vec<ExpandedRecord>> = if self.config.parallel {
            plan.par_iter()
                .map(|fact| self.expand_fact(fact, key_idx, &appended))
                .collect()
        } else {
            plan.iter()
                .map(|fact| self.expand_fact(fact, key_idx, &appended))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let nested: Vec<Vec<ExpandedRecord>> = plan
            .iter()
            .map(|fact| self.expand_fact(fact, key_idx, &appended))
            .collect();
        let records: Vec<ExpandedRecord> = nested.into_iter().flatten().collect();

        let stats = ExpansionStats {
            duration: start.elapsed(),
            facts_in: facts.len(),
            facts_dropped: facts.len() - plan.len(),
            rows_out: records.len(),
        };
        log::debug!(
            "expanded {} facts into {} rows along '{}' ({} dropped)",
            stats.facts_in,
            stats.rows_out,
            self.view.name(),
            stats.facts_dropped
        );

        Ok(Expansion {
            columns,
            fact_width: facts.width(),
            ix_column: hconfig.ix_column.clone(),
            level_column: hconfig.level_column.clone(),
            records,
            stats,
        })
    }

    /// One record per lineage entry, top level first.
    fn expand_fact(
        &self,
        fact: &PlannedFact<'_, '_>,
        key_idx: usize,
        appended: &[usize],
    ) -> Vec<ExpandedRecord> {
        let width = fact.values.len() + appended.len();
        fact.lineage
            .iter()
            .enumerate()
            .map(|(depth, node)| {
                let mut values = Vec::with_capacity(width);
                values.extend_from_slice(fact.values);
                values[key_idx] = Value::from(node);
                match self.view.attributes(node) {
                    Some(attrs) => values.extend(appended.iter().map(|&i| attrs[i].clone())),
                    None => values.resize(width, Value::Empty),
                }
                ExpandedRecord {
                    fact_row: fact.row,
                    ix: fact.ix,
                    node: node.clone(),
                    level: Level::Depth(depth as u32 + 1),
                    values,
                }
            })
            .collect()
    }

    /// Reduces `measure` per node over the expanded facts.
    ///
    /// Because every fact is attributed to each of its ancestors, one
    /// group-by yields the subtree roll-up of every node at once. Nodes that
    /// receive no fact have no entry; merged onto a hierarchy they read as
    /// [`Value::Empty`].
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::MissingColumn`](hierarchy_tree::HierarchyError::MissingColumn)
    ///   if the node or measure column is absent
    /// - [`RollupError::InvalidMeasure`] if the reducer rejects the values
    /// - any error of [`expand`](Self::expand)
    pub fn aggregate(
        &self,
        facts: &Table,
        measure: &str,
        output: &str,
        reducer: &Reducer,
    ) -> RollupResult<AggregateResult> {
        let measure_idx = facts.require_column(measure)?;
        let expansion = self.expand(facts)?;

        let mut groups: BTreeMap<NodeKey, Vec<Value>> = BTreeMap::new();
        for mut record in expansion.into_records() {
            let value = std::mem::take(&mut record.values[measure_idx]);
            groups.entry(record.node).or_default().push(value);
        }

        let mut result = AggregateResult::new(output);
        for (node, values) in groups {
            let value = reducer.reduce(measure, &values)?;
            result.insert(node, value);
        }

        log::debug!(
            "aggregated '{}' with {} into '{}' for {} nodes",
            measure,
            reducer,
            output,
            result.len()
        );
        Ok(result)
    }

    /// Aggregates and merges the result onto `hierarchy` as column `output`.
    ///
    /// Running it again with the same output column replaces the column.
    pub fn add_aggregate(
        hierarchy: &mut Hierarchy,
        facts: &Table,
        measure: &str,
        output: &str,
        reducer: &Reducer,
    ) -> RollupResult<()> {
        let result = Rollup::new(&*hierarchy).aggregate(facts, measure, output, reducer)?;
        hierarchy.merge_aggregate(&result)?;
        Ok(())
    }

    /// Interleaves the node table with fact rows for reporting.
    ///
    /// Node rows come first within their `h_ix` group, followed by the facts
    /// of that node. Fact rows are widened with their node's columns (a
    /// fact's own value wins on a name clash), take the node's `h_ix` and
    /// get the unassigned level. Facts with an unknown node get an empty
    /// `h_ix` and sort after every node group.
    ///
    /// Sort indexes and levels are read from the view, not from the rendered
    /// table, so renaming `h_ix` or `h_level` does not affect ordering.
    ///
    /// `renames` maps node table column names to the names the fact table
    /// uses; it is applied before the tables are aligned.
    ///
    /// # Errors
    ///
    /// [`HierarchyError::MissingColumn`](hierarchy_tree::HierarchyError::MissingColumn)
    /// if the facts have no node column.
    pub fn wrap(&self, facts: &Table, renames: &[(&str, &str)]) -> RollupResult<Table> {
        let hconfig = self.view.config();
        let name = self.view.name();
        let fact_key_idx = facts.require_column(name)?;

        let renamed = |column: &str| -> String {
            renames
                .iter()
                .find(|(from, _)| *from == column)
                .map_or(column, |(_, to)| *to)
                .to_string()
        };
        let nodes = self.view.definition_table().renamed(renames);
        let node_key_idx = nodes.require_column(&renamed(name))?;
        let ix_idx = nodes.require_column(&renamed(&hconfig.ix_column))?;
        let level_idx = nodes.require_column(&renamed(&hconfig.level_column))?;

        let mut columns = nodes.columns().to_vec();
        let fact_only: Vec<usize> = (0..facts.width())
            .filter(|&i| !nodes.has_column(&facts.columns()[i]))
            .collect();
        columns.extend(fact_only.iter().map(|&i| facts.columns()[i].clone()));
        let width = columns.len();

        // Output position of every fact column
        let fact_targets: Vec<usize> = facts
            .columns()
            .iter()
            .map(|c| columns.iter().position(|o| o == c).unwrap_or(width))
            .collect();

        let mut by_key: HashMap<NodeKey, usize> = HashMap::with_capacity(nodes.len());
        let mut rows: Vec<(Option<i64>, i64, Vec<Value>)> =
            Vec::with_capacity(nodes.len() + facts.len());

        for (i, record) in nodes.rows().enumerate() {
            let values = record.values();
            let (ix, level) = match NodeKey::from_value(&values[node_key_idx]) {
                Some(key) => {
                    let ix = self.view.node_ix(&key);
                    let level = self.view.level(&key).unwrap_or(Level::Unassigned);
                    by_key.entry(key).or_insert(i);
                    (ix, level)
                }
                None => (None, Level::Unassigned),
            };
            let mut row = values.to_vec();
            row.resize(width, Value::Empty);
            rows.push((ix, level.as_i64(), row));
        }

        let mut unmatched = 0usize;
        for record in facts.rows() {
            let values = record.values();
            let key = NodeKey::from_value(&values[fact_key_idx]);
            let node_row = key
                .as_ref()
                .and_then(|key| by_key.get(key))
                .and_then(|&i| nodes.row(i));

            let mut row = match node_row {
                Some(node) => {
                    let mut row = node.values().to_vec();
                    row.resize(width, Value::Empty);
                    row
                }
                None => {
                    unmatched += 1;
                    vec![Value::Empty; width]
                }
            };
            for (value, &target) in values.iter().zip(&fact_targets) {
                if target < width {
                    row[target] = value.clone();
                }
            }

            let ix = node_row
                .and(key.as_ref())
                .and_then(|key| self.view.node_ix(key));
            row[ix_idx] = ix.map_or(Value::Empty, Value::Int);
            row[level_idx] = Level::Unassigned.to_value();
            rows.push((ix, Level::Unassigned.as_i64(), row));
        }

        if unmatched > 0 {
            log::warn!(
                "{} fact rows reference no node of '{}', sorting them last",
                unmatched,
                name
            );
        }

        rows.sort_by_key(|(ix, level, _)| (ix.is_none(), *ix, *level));

        let mut table = Table::new(columns);
        for (_, _, row) in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hierarchy_tree::{HierarchyConfig, HierarchyError};

    fn text(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    /// ```text
    /// 0 (root)
    ///  |-- 1
    ///  |    |-- 12
    ///  |         |-- 121
    ///  |-- 2
    /// ```
    fn small_org() -> Hierarchy {
        let table = Table::from_columns(vec![
            ("dept", text(&["1", "12", "121", "2"])),
            ("parent_dept", text(&["0", "1", "12", "0"])),
            ("manager", text(&["Ann", "Bob", "Cy", "Di"])),
        ])
        .unwrap();
        Hierarchy::new(&table, HierarchyConfig::builder("dept").with_root("0").build()).unwrap()
    }

    fn people() -> Table {
        Table::from_columns(vec![
            ("pnr", [100, 101, 102].map(Value::Int).to_vec()),
            ("dept", text(&["121", "2", "999"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_expand_rewrites_node_column() {
        let h = small_org();
        let expansion = Rollup::new(&h).expand(&people()).unwrap();

        assert_eq!(expansion.len(), 4);
        let nodes: Vec<&NodeKey> = expansion.records().iter().map(|r| &r.node).collect();
        assert_eq!(
            nodes,
            vec![
                &NodeKey::from("1"),
                &NodeKey::from("12"),
                &NodeKey::from("121"),
                &NodeKey::from("2"),
            ]
        );
        let levels: Vec<Level> = expansion.records().iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            vec![Level::Depth(1), Level::Depth(2), Level::Depth(3), Level::Depth(1)]
        );

        let first = &expansion.records()[0];
        assert_eq!(expansion.value(first, "dept"), Some(&Value::from("1")));
        assert_eq!(expansion.value(first, "pnr"), Some(&Value::Int(100)));
        assert_eq!(expansion.value(first, "manager"), Some(&Value::from("Ann")));
    }

    #[test]
    fn test_expand_drops_unknown_nodes() {
        let h = small_org();
        let expansion = Rollup::new(&h).expand(&people()).unwrap();

        assert!(expansion.records().iter().all(|r| r.fact_row != 2));
        assert_eq!(expansion.stats().facts_in, 3);
        assert_eq!(expansion.stats().facts_dropped, 1);
        assert_eq!(expansion.stats().rows_out, 4);
    }

    #[test]
    fn test_expand_keeps_fact_columns_on_collision() {
        let h = small_org();
        let facts = Table::from_columns(vec![
            ("dept", text(&["12"])),
            ("manager", text(&["Self"])),
        ])
        .unwrap();

        let expansion = Rollup::new(&h).expand(&facts).unwrap();
        assert_eq!(expansion.columns(), &["dept", "manager"].map(String::from));
        for record in expansion.records() {
            assert_eq!(expansion.value(record, "manager"), Some(&Value::from("Self")));
        }
    }

    #[test]
    fn test_expand_orders_by_fact_ix() {
        let h = small_org();
        let facts = Table::from_columns(vec![
            ("dept", text(&["12", "2"])),
            ("h_ix", vec![Value::Int(5), Value::Int(1)]),
        ])
        .unwrap();

        let expansion = Rollup::new(&h).expand(&facts).unwrap();
        let ixs: Vec<i64> = expansion.records().iter().map(|r| r.ix).collect();
        assert_eq!(ixs, vec![1, 5, 5]);
        assert_eq!(expansion.records()[0].fact_row, 1);
    }

    #[test]
    fn test_expand_missing_node_column() {
        let h = small_org();
        let facts = Table::from_columns(vec![("pnr", vec![Value::Int(1)])]).unwrap();
        let err = Rollup::new(&h).expand(&facts).unwrap_err();
        assert_eq!(err, RollupError::from(HierarchyError::missing_column("dept")));
    }

    #[test]
    fn test_expand_limit() {
        let h = small_org();
        let config = RollupConfig::builder().with_max_expanded_rows(3).build();
        let err = Rollup::with_config(&h, config)
            .expand(&people())
            .unwrap_err();
        assert_eq!(err, RollupError::ExpansionTooLarge { count: 4, limit: 3 });
    }

    #[test]
    fn test_parallel_flag_keeps_order() {
        let h = small_org();
        let sequential = Rollup::new(&h).expand(&people()).unwrap();
        let config = RollupConfig::builder().with_parallel(true).build();
        let parallel = Rollup::with_config(&h, config).expand(&people()).unwrap();
        assert_eq!(sequential.records(), parallel.records());
    }

    #[test]
    fn test_aggregate_count() {
        let h = small_org();
        let counts = Rollup::new(&h)
            .aggregate(&people(), "pnr", "p_count", &Reducer::Count)
            .unwrap();

        assert_eq!(counts.column(), "p_count");
        assert_eq!(counts.get(&"1".into()), Some(&Value::Int(1)));
        assert_eq!(counts.get(&"121".into()), Some(&Value::Int(1)));
        assert_eq!(counts.get(&"2".into()), Some(&Value::Int(1)));
        assert_eq!(counts.get(&"999".into()), None);
    }

    #[test]
    fn test_aggregate_missing_measure() {
        let h = small_org();
        let err = Rollup::new(&h)
            .aggregate(&people(), "salary", "total", &Reducer::Sum)
            .unwrap_err();
        assert_eq!(err, RollupError::from(HierarchyError::missing_column("salary")));
    }

    #[test]
    fn test_add_aggregate_merges_column() {
        let mut h = small_org();
        Rollup::add_aggregate(&mut h, &people(), "pnr", "p_sum", &Reducer::Sum).unwrap();

        assert_eq!(h.attribute(&"1".into(), "p_sum"), Some(&Value::Int(100)));
        assert_eq!(h.attribute(&"2".into(), "p_sum"), Some(&Value::Int(101)));
        let table = h.definition_table();
        assert_eq!(table.columns().last().map(String::as_str), Some("p_sum"));
    }

    #[test]
    fn test_wrap_interleaves_facts() {
        let h = small_org();
        let table = Rollup::new(&h).wrap(&people(), &[]).unwrap();

        assert_eq!(
            table.columns(),
            &["dept", "parent_dept", "manager", "h_ix", "h_level", "pnr"].map(String::from)
        );
        let order: Vec<String> = table
            .rows()
            .map(|r| format!("{}/{}", r.get("dept").unwrap(), r.get("h_level").unwrap()))
            .collect();
        assert_eq!(
            order,
            vec!["1/1", "12/2", "121/3", "121/999", "2/1", "2/999", "999/999"]
        );

        // Fact row widened with its node's columns
        assert_eq!(table.get(3, "manager"), Some(&Value::from("Cy")));
        assert_eq!(table.get(3, "pnr"), Some(&Value::Int(100)));
        assert_eq!(table.get(3, "h_ix"), Some(&Value::Int(2)));
        // Node rows have no fact values
        assert_eq!(table.get(0, "pnr"), Some(&Value::Empty));
        // Unknown node: empty ix and node columns
        assert_eq!(table.get(6, "h_ix"), Some(&Value::Empty));
        assert_eq!(table.get(6, "manager"), Some(&Value::Empty));
    }

    #[test]
    fn test_wrap_renames_node_columns() {
        let h = small_org();
        let facts = Table::from_columns(vec![
            ("dept", text(&["12"])),
            ("name", text(&["Eve"])),
        ])
        .unwrap();

        let table = Rollup::new(&h).wrap(&facts, &[("manager", "name")]).unwrap();
        assert_eq!(
            table.columns(),
            &["dept", "parent_dept", "name", "h_ix", "h_level"].map(String::from)
        );
        // Node rows show the manager, the fact row shows its own name
        assert_eq!(table.get(1, "name"), Some(&Value::from("Bob")));
        assert_eq!(table.get(2, "name"), Some(&Value::from("Eve")));
        assert_eq!(table.get(2, "h_level"), Some(&Value::Int(999)));
    }

    #[test]
    fn test_wrap_orders_by_view_after_renaming_ix_and_level() {
        let h = small_org();
        let table = Rollup::new(&h)
            .wrap(&people(), &[("h_ix", "ix"), ("h_level", "lvl")])
            .unwrap();

        assert_eq!(
            table.columns(),
            &["dept", "parent_dept", "manager", "ix", "lvl", "pnr"].map(String::from)
        );
        let order: Vec<String> = table
            .rows()
            .map(|r| format!("{}/{}", r.get("dept").unwrap(), r.get("ix").unwrap()))
            .collect();
        assert_eq!(order, vec!["1/0", "12/1", "121/2", "121/2", "2/3", "2/3", "999/"]);
    }

    #[test]
    fn test_add_aggregate_rejects_reserved_output() {
        let mut h = small_org();
        let err = Rollup::add_aggregate(&mut h, &people(), "pnr", "h_level", &Reducer::Count)
            .unwrap_err();
        assert_eq!(
            err,
            RollupError::from(HierarchyError::ReservedColumn {
                column: "h_level".to_string()
            })
        );
        assert_eq!(h.attribute_columns(), &["manager".to_string()]);
    }
}
