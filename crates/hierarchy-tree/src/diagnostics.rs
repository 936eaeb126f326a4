//! Non-fatal findings collected while building a hierarchy.

use std::fmt;

use crate::value::{NodeKey, Value};

/// Something that was tolerated rather than rejected during construction.
///
/// Diagnostics travel with the built [`Hierarchy`](crate::Hierarchy) so
/// callers can inspect skipped rows and unreachable nodes without parsing
/// logs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A node has no path from the root; it keeps the unassigned level.
    UnreachableNode {
        /// The unreachable node.
        key: NodeKey,
    },

    /// A row's parent structure matched no row; the row was dropped.
    UnresolvedParent {
        /// Row index in the structure table.
        row: usize,
        /// Key cell of the dropped row.
        key: Value,
        /// Parent structure string that found no match.
        parent_path: String,
    },

    /// Two rows share a structure string; the first one is used as parent.
    AmbiguousStructure {
        /// The shared structure string.
        path: String,
        /// Key that parents resolve to.
        kept: Value,
        /// Key that was ignored for parent resolution.
        ignored: Value,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnreachableNode { key } => {
                write!(f, "node {key} is not reachable from the root")
            }
            Diagnostic::UnresolvedParent {
                row,
                key,
                parent_path,
            } => write!(
                f,
                "no parent found for row {row} (key {key}, parent structure '{parent_path}')"
            ),
            Diagnostic::AmbiguousStructure {
                path,
                kept,
                ignored,
            } => write!(
                f,
                "structure '{path}' is shared by {kept} and {ignored}; using {kept}"
            ),
        }
    }
}
