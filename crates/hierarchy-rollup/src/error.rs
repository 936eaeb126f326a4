//! Error types for roll-up operations.

use hierarchy_tree::HierarchyError;
use thiserror::Error;

/// Errors that can occur while expanding, aggregating or wrapping facts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RollupError {
    /// Error from the hierarchy model (e.g. a missing column).
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    /// Reducer name is not one of `count`, `sum`, `mean`, `min`, `max`.
    #[error("Unknown reducer: {0}")]
    UnknownReducer(String),

    /// Measure values the reducer cannot combine.
    #[error("Cannot {reducer} column '{column}': {reason}")]
    InvalidMeasure {
        /// Reducer name.
        reducer: String,
        /// Measure column.
        column: String,
        /// What went wrong.
        reason: String,
    },

    /// Expansion exceeds the configured row limit.
    #[error("Expansion too large: {count} rows exceeds limit {limit}")]
    ExpansionTooLarge {
        /// Number of rows the expansion would produce.
        count: usize,
        /// Configured limit.
        limit: usize,
    },
}

impl RollupError {
    pub(crate) fn invalid_measure(
        reducer: &str,
        column: &str,
        reason: impl Into<String>,
    ) -> Self {
        RollupError::InvalidMeasure {
            reducer: reducer.to_string(),
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for roll-up operations.
pub type RollupResult<T> = std::result::Result<T, RollupError>;
