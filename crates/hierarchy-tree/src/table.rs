//! In-memory tables used at every boundary.

use crate::error::{HierarchyError, HierarchyResult};
use crate::value::Value;

/// Rectangular table of named columns.
///
/// # Example
///
/// ```rust
/// use hierarchy_tree::{Table, Value};
///
/// let org = Table::from_columns(vec![
///     ("dept", vec![Value::from("1"), Value::from("12")]),
///     ("parent_dept", vec![Value::from("0"), Value::from("1")]),
/// ])
/// .unwrap();
///
/// assert_eq!(org.len(), 2);
/// assert_eq!(org.get(1, "parent_dept"), Some(&Value::from("1")));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a table from column names and rows.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> HierarchyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Creates a table from named columns of equal length.
    pub fn from_columns<S>(columns: Vec<(S, Vec<Value>)>) -> HierarchyResult<Self>
    where
        S: Into<String>,
    {
        let height = columns.first().map_or(0, |(_, values)| values.len());
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if values.len() != height {
                return Err(HierarchyError::RaggedRow {
                    row: height.min(values.len()),
                    expected: height,
                    found: values.len(),
                });
            }
            names.push(name.into());
            data.push(values.into_iter());
        }

        let rows = (0..height)
            .map(|_| data.iter_mut().filter_map(|values| values.next()).collect())
            .collect();
        Ok(Self {
            columns: names,
            rows,
        })
    }

    /// Appends a row. The row must have one value per column.
    pub fn push_row(&mut self, row: Vec<Value>) -> HierarchyResult<()> {
        if row.len() != self.columns.len() {
            return Err(HierarchyError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns true if the column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column that must be present.
    pub fn require_column(&self, name: &str) -> HierarchyResult<usize> {
        self.column_index(name)
            .ok_or_else(|| HierarchyError::missing_column(name))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Borrows a row.
    pub fn row(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|values| Record {
            columns: &self.columns,
            values,
        })
    }

    /// Iterates over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().map(|values| Record {
            columns: &self.columns,
            values,
        })
    }

    /// Returns a single cell.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|values| &values[col])
    }

    /// Iterates over one column's values.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |values| &values[col]))
    }

    /// Returns a copy with columns renamed. Unmapped columns keep their name.
    pub fn renamed(&self, renames: &[(&str, &str)]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                renames
                    .iter()
                    .find(|(from, _)| from == c)
                    .map_or_else(|| c.clone(), |(_, to)| (*to).to_string())
            })
            .collect();
        Table {
            columns,
            rows: self.rows.clone(),
        }
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    /// Value of a named column.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// Value at a column position.
    pub fn at(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }

    /// All values in column order.
    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// Iterates over `(column, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}
