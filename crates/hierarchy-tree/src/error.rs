//! Error types for hierarchy construction.

use thiserror::Error;

use crate::value::{NodeKey, Value};

/// Errors that make building a hierarchy impossible.
///
/// Lenient outcomes (unreachable nodes, rows skipped during structure
/// parsing) are not errors; they are reported as
/// [`Diagnostic`](crate::Diagnostic)s on the built hierarchy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HierarchyError {
    /// A required column is absent from the input table.
    #[error("missing required column '{column}'")]
    MissingColumn {
        /// Name of the absent column.
        column: String,
    },

    /// A node key occurs more than once in the definition table.
    #[error("duplicate node key {key} in rows {first_row} and {row}")]
    DuplicateKey {
        /// The repeated key.
        key: NodeKey,
        /// Row of the first occurrence.
        first_row: usize,
        /// Row of the repeated occurrence.
        row: usize,
    },

    /// A key or parent cell holds a value that cannot be a node key.
    #[error("invalid node key {value:?} in column '{column}' at row {row}")]
    InvalidKey {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        column: String,
        /// The rejected value.
        value: Value,
    },

    /// The sort index column holds a non-integer value.
    #[error("invalid sort index {value:?} at row {row}")]
    InvalidIndex {
        /// Row of the offending cell.
        row: usize,
        /// The rejected value.
        value: Value,
    },

    /// No root was given and there is no first row to take it from.
    #[error("definition table is empty and no root was given")]
    EmptyDefinition,

    /// The structure delimiter is empty, so no parent structure can be cut.
    #[error("structure delimiter must not be empty")]
    EmptyDelimiter,

    /// An aggregate column would shadow a column the node table derives
    /// itself.
    #[error("column '{column}' is reserved by the hierarchy")]
    ReservedColumn {
        /// The rejected column name.
        column: String,
    },

    /// A row does not have one value per column.
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        /// Index of the row.
        row: usize,
        /// Number of table columns.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },
}

impl HierarchyError {
    /// Creates a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = std::result::Result<T, HierarchyError>;
