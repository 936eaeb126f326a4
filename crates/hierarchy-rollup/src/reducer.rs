//! Reduction strategies for aggregating a measure per node.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use hierarchy_tree::Value;

use crate::error::{RollupError, RollupResult};

/// Signature of a caller-supplied reducer.
pub type ReduceFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// How the measure values of one node's subtree are combined.
///
/// Built-in reducers skip [`Value::Empty`]. A [`Reducer::Custom`] function
/// receives every value as-is.
///
/// # Example
///
/// ```rust
/// use hierarchy_rollup::Reducer;
/// use hierarchy_tree::Value;
///
/// let sum: Reducer = "sum".parse().unwrap();
/// let values = [Value::Int(2), Value::Empty, Value::Int(3)];
/// assert_eq!(sum.reduce("amount", &values).unwrap(), Value::Int(5));
///
/// let distinct = Reducer::custom(|values| Value::Int(values.len() as i64));
/// assert_eq!(distinct.reduce("amount", &values).unwrap(), Value::Int(3));
/// ```
#[derive(Clone)]
pub enum Reducer {
    /// Number of non-empty values.
    Count,
    /// Sum of numeric values; stays integer while every value is.
    Sum,
    /// Arithmetic mean of numeric values.
    Mean,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// Caller-supplied function.
    Custom(ReduceFn),
}

impl Reducer {
    /// Wraps a closure as a [`Reducer::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Reducer::Custom(Arc::new(f))
    }

    /// Symbolic name of the reducer.
    pub fn name(&self) -> &'static str {
        match self {
            Reducer::Count => "count",
            Reducer::Sum => "sum",
            Reducer::Mean => "mean",
            Reducer::Min => "min",
            Reducer::Max => "max",
            Reducer::Custom(_) => "custom",
        }
    }

    /// Reduces the values of `column` to a single value.
    ///
    /// Sum of no values is `0`; mean, min and max of no values are
    /// [`Value::Empty`].
    ///
    /// # Errors
    ///
    /// [`RollupError::InvalidMeasure`] for text in a sum or mean, for mixed
    /// text and numbers in min or max, and for integer overflow.
    pub fn reduce(&self, column: &str, values: &[Value]) -> RollupResult<Value> {
        let present = || values.iter().filter(|v| !v.is_empty());

        match self {
            Reducer::Count => Ok(Value::Int(present().count() as i64)),
            Reducer::Sum => self.sum(column, present()),
            Reducer::Mean => {
                let mut total = 0.0;
                let mut n = 0usize;
                for value in present() {
                    total += self.numeric(column, value)?;
                    n += 1;
                }
                Ok(if n == 0 {
                    Value::Empty
                } else {
                    Value::Float(total / n as f64)
                })
            }
            Reducer::Min => self.extreme(column, present(), Ordering::Less),
            Reducer::Max => self.extreme(column, present(), Ordering::Greater),
            Reducer::Custom(f) => Ok(f(values)),
        }
    }

    fn numeric(&self, column: &str, value: &Value) -> RollupResult<f64> {
        value.as_f64().ok_or_else(|| {
            RollupError::invalid_measure(self.name(), column, format!("non-numeric value '{value}'"))
        })
    }

    fn sum<'v>(
        &self,
        column: &str,
        values: impl Iterator<Item = &'v Value>,
    ) -> RollupResult<Value> {
        let mut int_total: i64 = 0;
        let mut float_total: Option<f64> = None;

        for value in values {
            if let (Value::Int(v), None) = (value, float_total) {
                int_total = int_total.checked_add(*v).ok_or_else(|| {
                    RollupError::invalid_measure(self.name(), column, "integer overflow")
                })?;
                continue;
            }
            let v = self.numeric(column, value)?;
            float_total = Some(float_total.unwrap_or(int_total as f64) + v);
        }

        Ok(match float_total {
            Some(total) => Value::Float(total),
            None => Value::Int(int_total),
        })
    }

    fn extreme<'v>(
        &self,
        column: &str,
        values: impl Iterator<Item = &'v Value>,
        keep: Ordering,
    ) -> RollupResult<Value> {
        let mut best: Option<&Value> = None;

        for value in values {
            let ordering = match best {
                None => keep,
                Some(current) => compare(value, current).ok_or_else(|| {
                    RollupError::invalid_measure(
                        self.name(),
                        column,
                        format!("cannot compare '{value}' with '{current}'"),
                    )
                })?,
            };
            if ordering == keep {
                best = Some(value);
            }
        }

        Ok(best.cloned().unwrap_or_default())
    }
}

/// Numbers compare numerically, text lexicographically. `None` when the
/// kinds differ.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        _ => Some(a.as_f64()?.total_cmp(&b.as_f64()?)),
    }
}

impl FromStr for Reducer {
    type Err = RollupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(Reducer::Count),
            "sum" => Ok(Reducer::Sum),
            "mean" | "avg" => Ok(Reducer::Mean),
            "min" => Ok(Reducer::Min),
            "max" => Ok(Reducer::Max),
            _ => Err(RollupError::UnknownReducer(s.to_string())),
        }
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reducer::Custom(_) => f.write_str("Custom(<fn>)"),
            other => f.write_str(other.name()),
        }
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
