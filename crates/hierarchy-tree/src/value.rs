//! Cell values and node keys.

use std::fmt;

/// A single table cell.
///
/// `Empty` is the blank used wherever a value is missing: unmatched joins,
/// nodes without an aggregate, empty labels.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Missing or blank value.
    #[default]
    Empty,
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl Value {
    /// Returns true for [`Value::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Returns the integer payload, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a float when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value as a structure label. `Empty` becomes `""`.
    pub fn to_label(&self) -> String {
        match self {
            Value::Empty => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NodeKey> for Value {
    fn from(key: NodeKey) -> Self {
        match key {
            NodeKey::Int(v) => Value::Int(v),
            NodeKey::Text(s) => Value::Text(s),
        }
    }
}

impl From<&NodeKey> for Value {
    fn from(key: &NodeKey) -> Self {
        key.clone().into()
    }
}

/// Identifier of a hierarchy node (e.g. a department code).
///
/// Keys are hashable and totally ordered, so only integer and text cells
/// qualify.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKey {
    /// Integer key.
    Int(i64),
    /// Text key.
    Text(String),
}

impl NodeKey {
    /// Converts a cell into a key. Returns `None` for `Empty` and `Float`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(NodeKey::Int(*v)),
            Value::Text(s) => Some(NodeKey::Text(s.clone())),
            Value::Empty | Value::Float(_) => None,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Int(v) => write!(f, "{v}"),
            NodeKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeKey {
    fn from(v: i64) -> Self {
        NodeKey::Int(v)
    }
}

impl From<i32> for NodeKey {
    fn from(v: i32) -> Self {
        NodeKey::Int(i64::from(v))
    }
}

impl From<&str> for NodeKey {
    fn from(v: &str) -> Self {
        NodeKey::Text(v.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(v: String) -> Self {
        NodeKey::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_value() {
        assert_eq!(NodeKey::from_value(&Value::Int(12)), Some(NodeKey::Int(12)));
        assert_eq!(
            NodeKey::from_value(&Value::from("12")),
            Some(NodeKey::from("12"))
        );
        assert_eq!(NodeKey::from_value(&Value::Empty), None);
        assert_eq!(NodeKey::from_value(&Value::Float(1.5)), None);
    }

    #[test]
    fn test_key_round_trips_into_value() {
        let value: Value = NodeKey::from("Mgr_1").into();
        assert_eq!(value, Value::Text("Mgr_1".to_string()));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Value::Empty.to_label(), "");
        assert_eq!(Value::Int(10).to_label(), "10");
        assert_eq!(Value::from("Sales").to_label(), "Sales");
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(2.5).as_i64(), None);
        assert_eq!(Value::from("x").as_f64(), None);
    }
}
