//! Expansion output types.

use std::fmt;
use std::time::Duration;

use hierarchy_tree::{HierarchyError, Level, NodeKey, Table, Value};

use crate::error::RollupResult;

/// One fact row attributed to one of its node's ancestors.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedRecord {
    /// Row of the fact in the input table.
    pub fact_row: usize,
    /// Sort index of the fact.
    pub ix: i64,
    /// The ancestor this copy is attributed to.
    pub node: NodeKey,
    /// Level of that ancestor.
    pub level: Level,
    /// Fact values (node reference rewritten to `node`) followed by the
    /// ancestor's attributes, aligned with [`Expansion::columns`].
    pub values: Vec<Value>,
}

/// Result of expanding a fact table along the hierarchy.
///
/// Records are ordered by fact `ix`, then by level from the top down.
///
/// # Example
///
/// ```ignore
/// let expansion = rollup.expand(&facts)?;
///
/// println!("{} facts became {} rows", expansion.stats().facts_in, expansion.len());
///
/// let table = expansion.to_table(&["manager", "h_level"])?;
/// ```
#[derive(Debug, Clone)]
pub struct Expansion {
    pub(crate) columns: Vec<String>,
    pub(crate) fact_width: usize,
    pub(crate) ix_column: String,
    pub(crate) level_column: String,
    pub(crate) records: Vec<ExpandedRecord>,
    pub(crate) stats: ExpansionStats,
}

impl Expansion {
    /// Fact columns followed by the ancestor attribute columns the fact
    /// table did not already have.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The fact table's own columns.
    pub fn fact_columns(&self) -> &[String] {
        &self.columns[..self.fact_width]
    }

    /// Expanded records in output order.
    pub fn records(&self) -> &[ExpandedRecord] {
        &self.records
    }

    /// Consumes the expansion, returning the records.
    pub fn into_records(self) -> Vec<ExpandedRecord> {
        self.records
    }

    /// Expansion statistics.
    pub fn stats(&self) -> &ExpansionStats {
        &self.stats
    }

    /// Number of expanded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no fact reached any node.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Value of `column` in one record.
    pub fn value<'r>(&self, record: &'r ExpandedRecord, column: &str) -> Option<&'r Value> {
        let i = self.columns.iter().position(|c| c == column)?;
        record.values.get(i)
    }

    /// Renders the fact columns plus the requested extra columns.
    ///
    /// Extras may name ancestor attributes, the index column (`h_ix`) or the
    /// level column (`h_level`). Extras that are already fact columns are
    /// not repeated, except that a requested index or level column always
    /// holds the fact index and the ancestor level: a fact column of that
    /// name is overwritten in place.
    ///
    /// # Errors
    ///
    /// [`HierarchyError::MissingColumn`] for an extra that is none of the
    /// above.
    pub fn to_table(&self, extra: &[&str]) -> RollupResult<Table> {
        enum Source {
            Column(usize),
            Ix,
            Level,
        }

        let mut columns: Vec<String> = self.fact_columns().to_vec();
        let mut sources: Vec<Source> = (0..self.fact_width).map(Source::Column).collect();

        for &name in extra {
            let source = if name == self.ix_column {
                Source::Ix
            } else if name == self.level_column {
                Source::Level
            } else if let Some(i) = self.columns.iter().position(|c| c == name) {
                Source::Column(i)
            } else {
                return Err(HierarchyError::missing_column(name).into());
            };
            match columns.iter().position(|c| c == name) {
                Some(pos) => sources[pos] = source,
                None => {
                    columns.push(name.to_string());
                    sources.push(source);
                }
            }
        }

        let mut table = Table::new(columns);
        for record in &self.records {
            let row = sources
                .iter()
                .map(|source| match source {
                    Source::Column(i) => record.values[*i].clone(),
                    Source::Ix => Value::Int(record.ix),
                    Source::Level => record.level.to_value(),
                })
                .collect();
            table.push_row(row)?;
        }
        Ok(table)
    }
}

/// Statistics from one expansion.
#[derive(Debug, Clone, Default)]
pub struct ExpansionStats {
    /// Total expansion duration.
    pub duration: Duration,
    /// Fact rows read.
    pub facts_in: usize,
    /// Fact rows whose node is unknown or unreachable.
    pub facts_dropped: usize,
    /// Expanded records produced.
    pub rows_out: usize,
}

impl ExpansionStats {
    /// Average number of records per kept fact.
    pub fn fan_out(&self) -> f64 {
        let kept = self.facts_in - self.facts_dropped;
        if kept == 0 {
            0.0
        } else {
            self.rows_out as f64 / kept as f64
        }
    }
}

impl fmt::Display for ExpansionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Expansion Statistics:")?;
        writeln!(f, "  Facts in:      {}", self.facts_in)?;
        writeln!(f, "  Facts dropped: {}", self.facts_dropped)?;
        writeln!(f, "  Rows out:      {} ({:.2} per fact)", self.rows_out, self.fan_out())?;
        writeln!(f, "  Duration:      {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollupError;

    fn sample() -> Expansion {
        let record = |fact_row: usize, node: &str, level: u32| ExpandedRecord {
            fact_row,
            ix: fact_row as i64,
            node: NodeKey::from(node),
            level: Level::Depth(level),
            values: vec![Value::from(node), Value::Int(1), Value::from(format!("Mgr_{node}"))],
        };
        Expansion {
            columns: ["dept", "amount", "manager"].map(String::from).to_vec(),
            fact_width: 2,
            ix_column: "h_ix".to_string(),
            level_column: "h_level".to_string(),
            records: vec![record(0, "1", 1), record(0, "12", 2)],
            stats: ExpansionStats::default(),
        }
    }

    #[test]
    fn test_to_table_fact_columns_only() {
        let table = sample().to_table(&[]).unwrap();
        assert_eq!(table.columns(), &["dept", "amount"].map(String::from));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_to_table_with_extras() {
        let table = sample()
            .to_table(&["manager", "h_ix", "h_level", "amount"])
            .unwrap();
        assert_eq!(
            table.columns(),
            &["dept", "amount", "manager", "h_ix", "h_level"].map(String::from)
        );
        assert_eq!(table.get(1, "manager"), Some(&Value::from("Mgr_12")));
        assert_eq!(table.get(1, "h_level"), Some(&Value::Int(2)));
        assert_eq!(table.get(1, "h_ix"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_to_table_level_extra_overrides_fact_column() {
        let mut expansion = sample();
        expansion.columns[1] = "h_level".to_string();

        let table = expansion.to_table(&["h_level"]).unwrap();
        assert_eq!(table.columns(), &["dept", "h_level"].map(String::from));
        assert_eq!(table.get(0, "h_level"), Some(&Value::Int(1)));
        assert_eq!(table.get(1, "h_level"), Some(&Value::Int(2)));

        // Without the extra the fact's own cell is kept
        let table = expansion.to_table(&[]).unwrap();
        assert_eq!(table.get(1, "h_level"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_to_table_unknown_extra() {
        let err = sample().to_table(&["budget"]).unwrap_err();
        assert_eq!(err, RollupError::from(HierarchyError::missing_column("budget")));
    }

    #[test]
    fn test_value_lookup() {
        let expansion = sample();
        let record = &expansion.records()[1];
        assert_eq!(expansion.value(record, "dept"), Some(&Value::from("12")));
        assert_eq!(expansion.value(record, "missing"), None);
    }

    #[test]
    fn test_stats_fan_out() {
        let stats = ExpansionStats {
            facts_in: 4,
            facts_dropped: 1,
            rows_out: 9,
            ..Default::default()
        };
        assert!((stats.fan_out() - 3.0).abs() < f64::EPSILON);
        assert!(stats.to_string().contains("Facts dropped: 1"));
    }
}
