//! Selection predicates attached to single columns
//!
//! A query combines these as OR within one column and AND across columns;
//! the predicates themselves only know how to test one value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::value::{ColumnId, Value, ValueKind};

/// Identity of a selection registered with a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectionId(pub u64);

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Closed numeric interval `[min, max]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleColumnSelectionRange {
    column: ColumnId,
    min: f64,
    max: f64,
}

impl DoubleColumnSelectionRange {
    /// Rejects `min > max` and NaN bounds
    pub fn new(column: ColumnId, min: f64, max: f64) -> CoreResult<Self> {
        Self::check_bounds(min, max)?;
        Ok(Self { column, min, max })
    }

    fn check_bounds(min: f64, max: f64) -> CoreResult<()> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(CoreError::InvertedRange(format!("[{}, {}]", min, max)));
        }
        Ok(())
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn set_bounds(&mut self, min: f64, max: f64) -> CoreResult<()> {
        Self::check_bounds(min, max)?;
        self.min = min;
        self.max = max;
        Ok(())
    }

    /// Inclusive at both ends; NaN never matches
    /// Non-finite values are never inside
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Closed instant interval `[start, end]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalColumnSelectionRange {
    column: ColumnId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TemporalColumnSelectionRange {
    pub fn new(column: ColumnId, start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvertedRange(format!(
                "[{}, {}]",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { column, start, end })
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn set_bounds(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<()> {
        let checked = Self::new(self.column, start, end)?;
        *self = checked;
        Ok(())
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Set of allowed category labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumnSelection {
    column: ColumnId,
    categories: BTreeSet<String>,
}

impl CategoricalColumnSelection {
    pub fn new<I, S>(column: ColumnId, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn add_category(&mut self, category: impl Into<String>) -> bool {
        self.categories.insert(category.into())
    }

    pub fn remove_category(&mut self, category: &str) -> bool {
        self.categories.remove(category)
    }

    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

/// A predicate on one column's values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnSelection {
    Double(DoubleColumnSelectionRange),
    Temporal(TemporalColumnSelectionRange),
    Categorical(CategoricalColumnSelection),
}

impl ColumnSelection {
    pub fn column(&self) -> ColumnId {
        match self {
            ColumnSelection::Double(range) => range.column(),
            ColumnSelection::Temporal(range) => range.column(),
            ColumnSelection::Categorical(selection) => selection.column(),
        }
    }

    /// Kind of column this predicate can be attached to
    pub fn kind(&self) -> ValueKind {
        match self {
            ColumnSelection::Double(_) => ValueKind::Double,
            ColumnSelection::Temporal(_) => ValueKind::Temporal,
            ColumnSelection::Categorical(_) => ValueKind::Categorical,
        }
    }

    /// Test one value; a value of another kind never matches
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (ColumnSelection::Double(range), Value::Double(v)) => range.contains(*v),
            (ColumnSelection::Temporal(range), Value::Temporal(t)) => range.contains(*t),
            (ColumnSelection::Categorical(selection), Value::Categorical(s)) => selection.contains(s),
            _ => false,
        }
    }
}

impl From<DoubleColumnSelectionRange> for ColumnSelection {
    fn from(range: DoubleColumnSelectionRange) -> Self {
        ColumnSelection::Double(range)
    }
}

impl From<TemporalColumnSelectionRange> for ColumnSelection {
    fn from(range: TemporalColumnSelectionRange) -> Self {
        ColumnSelection::Temporal(range)
    }
}

impl From<CategoricalColumnSelection> for ColumnSelection {
    fn from(selection: CategoricalColumnSelection) -> Self {
        ColumnSelection::Categorical(selection)
    }
}

/// A selection as registered with a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSelectionRange {
    pub id: SelectionId,
    pub selection: ColumnSelection,
}

impl ColumnSelectionRange {
    pub fn column(&self) -> ColumnId {
        self.selection.column()
    }

    pub fn matches(&self, value: &Value) -> bool {
        self.selection.matches(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_double_range_inclusive() {
        let range = DoubleColumnSelectionRange::new(ColumnId(0), 0.0, 5.0).unwrap();
        assert!(range.contains(0.0));
        assert!(range.contains(5.0));
        assert!(!range.contains(5.000001));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        assert!(DoubleColumnSelectionRange::new(ColumnId(0), 2.0, 1.0).is_err());
        assert!(DoubleColumnSelectionRange::new(ColumnId(0), f64::NAN, 1.0).is_err());

        let a = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(TemporalColumnSelectionRange::new(ColumnId(1), a, b).is_err());

        let mut range = DoubleColumnSelectionRange::new(ColumnId(0), 1.0, 2.0).unwrap();
        assert!(range.set_bounds(3.0, 1.0).is_err());
        assert_eq!((range.min(), range.max()), (1.0, 2.0));
    }

    #[test]
    fn test_kind_mismatch_never_matches() {
        let selection: ColumnSelection =
            CategoricalColumnSelection::new(ColumnId(2), ["x"]).into();
        assert!(selection.matches(&Value::from("x")));
        assert!(!selection.matches(&Value::from("y")));
        assert!(!selection.matches(&Value::Double(1.0)));
    }

    #[test]
    fn test_temporal_range() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 12, 31, 0, 0, 0).unwrap();
        let selection: ColumnSelection =
            TemporalColumnSelectionRange::new(ColumnId(1), start, end).unwrap().into();
        assert!(selection.matches(&Value::Temporal(end)));
        assert!(!selection.matches(&Value::Temporal(end + chrono::Duration::seconds(1))));
    }
}
