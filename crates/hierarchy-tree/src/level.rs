//! Node depth.

use std::fmt;

use crate::value::Value;

/// Level written for nodes without a depth and for wrapped fact rows.
///
/// Large enough to sort after every real depth.
pub const UNASSIGNED_LEVEL: i64 = 999;

/// Depth of a node below the root.
///
/// The root is `Depth(0)`, its children `Depth(1)` and so on. `Unassigned`
/// marks nodes with no path from the root and orders after every depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    /// Distance from the root.
    Depth(u32),
    /// No depth: unreachable node or non-hierarchy row. Sorts last.
    Unassigned,
}

impl Level {
    /// Level of the root itself.
    pub const ROOT: Level = Level::Depth(0);

    /// Level of a node whose root-to-node path has `len` entries.
    pub fn from_path_len(len: usize) -> Self {
        match len.checked_sub(1).and_then(|d| u32::try_from(d).ok()) {
            Some(depth) => Level::Depth(depth),
            None => Level::Unassigned,
        }
    }

    /// Reads a level back from its table form.
    pub fn from_i64(value: i64) -> Self {
        match u32::try_from(value) {
            Ok(depth) if value != UNASSIGNED_LEVEL => Level::Depth(depth),
            _ => Level::Unassigned,
        }
    }

    /// Returns the depth, or `None` when unassigned.
    pub fn depth(self) -> Option<u32> {
        match self {
            Level::Depth(d) => Some(d),
            Level::Unassigned => None,
        }
    }

    /// Returns true when the level is a real depth.
    pub fn is_assigned(self) -> bool {
        matches!(self, Level::Depth(_))
    }

    /// Integer form used in tables.
    pub fn as_i64(self) -> i64 {
        match self {
            Level::Depth(d) => i64::from(d),
            Level::Unassigned => UNASSIGNED_LEVEL,
        }
    }

    /// Cell form used in tables.
    pub fn to_value(self) -> Value {
        Value::Int(self.as_i64())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}
