//! Hierarchy nodes.

use crate::level::Level;
use crate::value::{NodeKey, Value};

/// One row of the node table.
///
/// Attribute values are positional; their names live once on the owning
/// [`Hierarchy`](crate::Hierarchy) (see `attribute_columns`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub(crate) key: NodeKey,
    pub(crate) parent: NodeKey,
    pub(crate) ix: i64,
    pub(crate) level: Level,
    pub(crate) attributes: Vec<Value>,
}

impl Node {
    /// The node key.
    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    /// Key of the parent node.
    pub fn parent(&self) -> &NodeKey {
        &self.parent
    }

    /// Stable sort index.
    pub fn ix(&self) -> i64 {
        self.ix
    }

    /// Depth below the root.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Attribute values, aligned with the hierarchy's attribute columns.
    pub fn attributes(&self) -> &[Value] {
        &self.attributes
    }
}
