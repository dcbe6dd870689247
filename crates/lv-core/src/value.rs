//! Typed cell values held by tuples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a column within one table.
///
/// Ids are assigned by the owning table and never reused, so maps keyed by
/// column id survive column reordering and enable/disable cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnId(pub u32);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// The kind of a column, and of the values it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Double,
    Categorical,
    Temporal,
    Bivariate,
    Image,
}

impl ValueKind {
    /// Whether values of this kind have a total order usable for ranges
    pub fn is_ordered(&self) -> bool {
        matches!(self, ValueKind::Double | ValueKind::Temporal)
    }
}

/// One element of a tuple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Numeric value; NaN marks a missing number
    Double(f64),
    /// Instant on the UTC timeline
    Temporal(DateTime<Utc>),
    /// Category label
    Categorical(String),
    /// The two source values of a bivariate column
    Pair(Box<(Value, Value)>),
    /// Opaque image reference (path or key)
    Image(String),
}

impl Value {
    /// Build the element stored by a bivariate column
    pub fn pair(first: Value, second: Value) -> Self {
        Value::Pair(Box::new((first, second)))
    }

    /// The column kind able to hold this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Double(_) => ValueKind::Double,
            Value::Temporal(_) => ValueKind::Temporal,
            Value::Categorical(_) => ValueKind::Categorical,
            Value::Pair(_) => ValueKind::Bivariate,
            Value::Image(_) => ValueKind::Image,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Temporal(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            Value::Categorical(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Pair(pair) => Some((&pair.0, &pair.1)),
            _ => None,
        }
    }

    /// Mutable access to a bivariate element's halves
    pub fn as_pair_mut(&mut self) -> Option<&mut (Value, Value)> {
        match self {
            Value::Pair(pair) => Some(pair.as_mut()),
            _ => None,
        }
    }

    /// True for a NaN or infinite double; every other value is present
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Double(v) if !v.is_finite())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Temporal(t)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Categorical(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Categorical(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Double(v) => write!(f, "{}", v),
            Value::Temporal(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Categorical(s) => write!(f, "{}", s),
            Value::Pair(pair) => write!(f, "[{}, {}]", pair.0, pair.1),
            Value::Image(key) => write!(f, "image:{}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_value_kinds() {
        assert_eq!(Value::from(1.5).kind(), ValueKind::Double);
        assert_eq!(Value::from("x").kind(), ValueKind::Categorical);
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(Value::from(t).kind(), ValueKind::Temporal);
        assert_eq!(Value::pair(1.0.into(), 2.0.into()).kind(), ValueKind::Bivariate);
    }

    #[test]
    fn test_missing_only_for_nan() {
        assert!(Value::Double(f64::NAN).is_missing());
        assert!(Value::Double(f64::NEG_INFINITY).is_missing());
        assert!(!Value::Double(0.0).is_missing());
        assert!(!Value::from("").is_missing());
    }

    #[test]
    fn test_pair_display() {
        let v = Value::pair(1.0.into(), "a".into());
        assert_eq!(v.to_string(), "[1, a]");
        assert_eq!(ColumnId(3).to_string(), "c3");
    }
}
