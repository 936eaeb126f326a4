//! Per-node aggregate values merged onto the node table.

use std::collections::HashMap;

use crate::value::{NodeKey, Value};

/// Reduced measure per node, ready to be merged as a node table column.
///
/// Nodes without an entry read as [`Value::Empty`] once merged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateResult {
    column: String,
    values: HashMap<NodeKey, Value>,
}

impl AggregateResult {
    /// Creates an empty result for the given output column.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            values: HashMap::new(),
        }
    }

    /// Sets the value of one node.
    pub fn insert(&mut self, key: NodeKey, value: Value) {
        self.values.insert(key, value);
    }

    /// Output column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Value of one node, if it received any facts.
    pub fn get(&self, key: &NodeKey) -> Option<&Value> {
        self.values.get(key)
    }

    /// Value of one node, `Empty` when it received no facts.
    pub fn value_or_empty(&self, key: &NodeKey) -> Value {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// Number of nodes with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no node has a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(key, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeKey, &Value)> {
        self.values.iter()
    }
}
