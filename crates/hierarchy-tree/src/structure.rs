//! Parent derivation from structure strings.
//!
//! Some sources carry no parent column, only the position of each node
//! spelled out as a path of labels (`"RvB|Sales & Marketing|Marketing"`),
//! either in one column or spread over several label columns. The parent of
//! a node is the row whose structure string equals the node's structure
//! string cut at its last delimiter.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::builder::TreeBuilder;
use crate::config::HierarchyConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{HierarchyError, HierarchyResult};
use crate::hierarchy::Hierarchy;
use crate::table::Table;
use crate::value::{NodeKey, Value};

/// Default label delimiter.
pub const DEFAULT_DELIMITER: &str = "|";

/// Default structure string standing for the root.
pub const DEFAULT_ROOT_SENTINEL: &str = "root";

/// Where the structure string of a row comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructureSource {
    /// One column holding delimiter-joined structure strings.
    Path(String),
    /// Ordered label columns, joined with the delimiter. Empty labels are
    /// skipped.
    Labels(Vec<String>),
}

impl StructureSource {
    /// Structure strings read from one column.
    pub fn path(column: impl Into<String>) -> Self {
        StructureSource::Path(column.into())
    }

    /// Structure strings assembled from label columns.
    pub fn labels<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StructureSource::Labels(columns.into_iter().map(Into::into).collect())
    }
}

/// Output of [`StructureParser::parse`].
#[derive(Debug, Clone)]
pub struct ParsedStructure {
    /// Input rows with a resolved `parent_<name>` column.
    pub table: Table,
    /// Key that top-level rows were parented to.
    pub root: NodeKey,
    /// Rows dropped or shadowed during parsing.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedStructure {
    /// Number of rows dropped for lack of a parent.
    pub fn skipped_rows(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnresolvedParent { .. }))
            .count()
    }
}

/// Derives parent keys from structure strings.
///
/// # Example
///
/// ```rust
/// use hierarchy_tree::{HierarchyConfig, Level, StructureParser, StructureSource, Table, Value};
///
/// let src = Table::from_columns(vec![
///     ("labels", ["RvB", "RvB/Sales", "RvB/Sales/Export"].map(Value::from).to_vec()),
///     ("dept", vec![Value::Int(10), Value::Int(100), Value::Int(110)]),
/// ])
/// .unwrap();
///
/// let h = StructureParser::new()
///     .with_delimiter("/")
///     .build(
///         &src,
///         HierarchyConfig::builder("dept").with_root("0").build(),
///         &StructureSource::path("labels"),
///     )
///     .unwrap();
///
/// assert_eq!(h.level(&110.into()), Some(Level::Depth(3)));
/// ```
#[derive(Debug, Clone)]
pub struct StructureParser {
    delimiter: String,
    root_sentinel: String,
}

impl Default for StructureParser {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            root_sentinel: DEFAULT_ROOT_SENTINEL.to_string(),
        }
    }
}

impl StructureParser {
    /// Creates a parser with the default delimiter and root sentinel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label delimiter.
    ///
    /// An empty delimiter is rejected by [`parse`](Self::parse) and
    /// [`structure_strings`](Self::structure_strings) with
    /// [`HierarchyError::EmptyDelimiter`].
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the structure string that stands for the root.
    pub fn with_root_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.root_sentinel = sentinel.into();
        self
    }

    /// The label delimiter.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The root sentinel.
    pub fn root_sentinel(&self) -> &str {
        &self.root_sentinel
    }

    /// Structure string of every row, in row order.
    pub fn structure_strings(
        &self,
        table: &Table,
        source: &StructureSource,
    ) -> HierarchyResult<Vec<String>> {
        if self.delimiter.is_empty() {
            return Err(HierarchyError::EmptyDelimiter);
        }
        match source {
            StructureSource::Path(column) => {
                let col = table.require_column(column)?;
                Ok(table.rows().map(|r| r.values()[col].to_label()).collect())
            }
            StructureSource::Labels(columns) => {
                let cols = columns
                    .iter()
                    .map(|c| table.require_column(c))
                    .collect::<HierarchyResult<Vec<_>>>()?;
                Ok(table
                    .rows()
                    .map(|r| {
                        cols.iter()
                            .map(|&c| r.values()[c].to_label())
                            .filter(|label| !label.is_empty())
                            .collect::<Vec<_>>()
                            .join(&self.delimiter)
                    })
                    .collect())
            }
        }
    }

    /// Structure string of the parent: everything before the last
    /// delimiter. `None` when there is no delimiter, i.e. the parent is the
    /// root.
    pub fn parent_structure<'p>(&self, structure: &'p str) -> Option<&'p str> {
        structure
            .rfind(self.delimiter.as_str())
            .map(|i| &structure[..i])
    }

    /// Resolves a `parent_<name>` column for every row.
    ///
    /// Rows whose parent structure matches no row are dropped and reported
    /// as [`Diagnostic::UnresolvedParent`]. Top-level rows are parented to
    /// `config.root`, or to the root sentinel when no root is configured.
    /// Node keys themselves are never rewritten.
    pub fn parse(
        &self,
        table: &Table,
        config: &HierarchyConfig,
        source: &StructureSource,
    ) -> HierarchyResult<ParsedStructure> {
        if self.delimiter.is_empty() {
            return Err(HierarchyError::EmptyDelimiter);
        }
        let key_idx = table.require_column(&config.name)?;
        let parent_column = config.parent_column();
        let structures = self.structure_strings(table, source)?;

        let root = config
            .root
            .clone()
            .unwrap_or_else(|| NodeKey::Text(self.root_sentinel.clone()));
        let root_value = Value::from(&root);

        let mut diagnostics = Vec::new();
        let mut lookup: HashMap<&str, &Value> = HashMap::with_capacity(table.len());
        for (structure, record) in structures.iter().zip(table.rows()) {
            let key = &record.values()[key_idx];
            match lookup.entry(structure.as_str()) {
                Entry::Occupied(kept) => diagnostics.push(Diagnostic::AmbiguousStructure {
                    path: structure.clone(),
                    kept: (*kept.get()).clone(),
                    ignored: key.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(key);
                }
            }
        }

        let parent_pos = table.column_index(&parent_column);
        let mut columns = table.columns().to_vec();
        if parent_pos.is_none() {
            columns.push(parent_column);
        }
        let mut parsed = Table::new(columns);

        for (row, (structure, record)) in structures.iter().zip(table.rows()).enumerate() {
            let parent = match self.parent_structure(structure) {
                None => Ok(root_value.clone()),
                Some(parent_path) => match lookup.get(parent_path) {
                    Some(&key) => Ok(key.clone()),
                    None if parent_path == self.root_sentinel => Ok(root_value.clone()),
                    None => Err(parent_path),
                },
            };

            match parent {
                Ok(parent) => {
                    let mut values = record.values().to_vec();
                    match parent_pos {
                        Some(pos) => values[pos] = parent,
                        None => values.push(parent),
                    }
                    parsed.push_row(values)?;
                }
                Err(parent_path) => {
                    let key = record.values()[key_idx].clone();
                    log::warn!(
                        "no parent found for row {} ({} = {}, parent structure '{}'), skipping",
                        row,
                        config.name,
                        key,
                        parent_path
                    );
                    diagnostics.push(Diagnostic::UnresolvedParent {
                        row,
                        key,
                        parent_path: parent_path.to_string(),
                    });
                }
            }
        }

        Ok(ParsedStructure {
            table: parsed,
            root,
            diagnostics,
        })
    }

    /// Parses the structure and builds the hierarchy from the result.
    ///
    /// Parser diagnostics come first in the hierarchy's diagnostics.
    pub fn build(
        &self,
        table: &Table,
        mut config: HierarchyConfig,
        source: &StructureSource,
    ) -> HierarchyResult<Hierarchy> {
        let parsed = self.parse(table, &config, source)?;
        let skipped = parsed.skipped_rows();
        config.root = Some(parsed.root);

        let mut hierarchy = TreeBuilder::new(config).build(&parsed.table)?;
        let mut diagnostics = parsed.diagnostics;
        diagnostics.append(&mut hierarchy.diagnostics);
        hierarchy.diagnostics = diagnostics;
        hierarchy.stats.skipped_rows = skipped;
        Ok(hierarchy)
    }
}
