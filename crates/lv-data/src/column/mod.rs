//! Column family
//!
//! A column does not own values: it is a typed view over one positional
//! slot of every tuple in its table. It owns its statistics and the
//! focus/context classification of rows used by zoom and brush rendering.

mod bivariate;
mod bounds;
mod categorical;
mod double;
mod temporal;

pub use bivariate::BivariateColumn;
pub use bounds::FocusClass;
pub use categorical::CategoricalColumn;
pub use double::DoubleColumn;
pub use temporal::TemporalColumn;

use std::collections::BTreeSet;

use lv_core::{ColumnHandle, ColumnId, Value, ValueKind};

use crate::stats::ColumnSummaryStats;

/// Variant-specific column state
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Double(DoubleColumn),
    Categorical(CategoricalColumn),
    Temporal(TemporalColumn),
    Bivariate(BivariateColumn),
    Image,
}

impl ColumnKind {
    pub fn value_kind(&self) -> ValueKind {
        match self {
            ColumnKind::Double(_) => ValueKind::Double,
            ColumnKind::Categorical(_) => ValueKind::Categorical,
            ColumnKind::Temporal(_) => ValueKind::Temporal,
            ColumnKind::Bivariate(_) => ValueKind::Bivariate,
            ColumnKind::Image => ValueKind::Image,
        }
    }
}

/// One table-wide attribute
#[derive(Debug, Clone)]
pub struct Column {
    id: ColumnId,
    name: String,
    enabled: bool,
    kind: ColumnKind,
    focus_tuples: BTreeSet<usize>,
    lower_context_tuples: BTreeSet<usize>,
    upper_context_tuples: BTreeSet<usize>,
    statistics: Option<ColumnSummaryStats>,
}

impl Column {
    fn with_kind(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            // Replaced when a table adopts the column
            id: ColumnId(0),
            name: name.into(),
            enabled: true,
            kind,
            focus_tuples: BTreeSet::new(),
            lower_context_tuples: BTreeSet::new(),
            upper_context_tuples: BTreeSet::new(),
            statistics: None,
        }
    }

    pub fn double(name: impl Into<String>) -> Self {
        Self::with_kind(name, ColumnKind::Double(DoubleColumn::default()))
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self::with_kind(name, ColumnKind::Categorical(CategoricalColumn::default()))
    }

    pub fn temporal(name: impl Into<String>) -> Self {
        Self::with_kind(name, ColumnKind::Temporal(TemporalColumn::default()))
    }

    pub fn image(name: impl Into<String>) -> Self {
        Self::with_kind(name, ColumnKind::Image)
    }

    pub(crate) fn bivariate(name: impl Into<String>, first: ColumnId, second: ColumnId) -> Self {
        Self::with_kind(name, ColumnKind::Bivariate(BivariateColumn::new(first, second)))
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: ColumnId) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn handle(&self) -> ColumnHandle {
        ColumnHandle::new(self.id, self.name.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flag only; moving values in and out of tuples is the table's job
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind.value_kind()
    }

    pub fn as_double(&self) -> Option<&DoubleColumn> {
        match &self.kind {
            ColumnKind::Double(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_double_mut(&mut self) -> Option<&mut DoubleColumn> {
        match &mut self.kind {
            ColumnKind::Double(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&TemporalColumn> {
        match &self.kind {
            ColumnKind::Temporal(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_temporal_mut(&mut self) -> Option<&mut TemporalColumn> {
        match &mut self.kind {
            ColumnKind::Temporal(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_categorical_mut(&mut self) -> Option<&mut CategoricalColumn> {
        match &mut self.kind {
            ColumnKind::Categorical(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_bivariate(&self) -> Option<&BivariateColumn> {
        match &self.kind {
            ColumnKind::Bivariate(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn as_bivariate_mut(&mut self) -> Option<&mut BivariateColumn> {
        match &mut self.kind {
            ColumnKind::Bivariate(c) => Some(c),
            _ => None,
        }
    }

    /// Rebuild whole-table statistics from this column's values and move the
    /// scale bounds to the new data extent
    pub fn calculate_statistics<'a, I>(&mut self, values: I, num_bins: usize)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut statistics =
            ColumnSummaryStats::new(self.id, &self.name, self.value_kind(), num_bins, None);
        if let Some(stats) = statistics.as_mut() {
            stats.set_values(values);
        }

        match (&mut self.kind, &statistics) {
            (ColumnKind::Double(column), Some(ColumnSummaryStats::Double(stats))) if stats.count() > 0 => {
                column.set_scale_bounds(stats.min(), stats.max());
            }
            (ColumnKind::Temporal(column), Some(ColumnSummaryStats::Temporal(stats))) => {
                if let (Some(start), Some(end)) = (stats.start(), stats.end()) {
                    column.set_scale_bounds(start, end);
                }
            }
            _ => {}
        }

        self.statistics = statistics;
    }

    /// Latest whole-table statistics, `None` until computed
    pub fn statistics(&self) -> Option<&ColumnSummaryStats> {
        self.statistics.as_ref()
    }

    pub(crate) fn set_num_histogram_bins(&mut self, num_bins: usize) {
        if let Some(stats) = self.statistics.as_mut() {
            stats.set_num_histogram_bins(num_bins);
        }
    }

    /// Classify row `row` holding `value` into exactly one of the focus,
    /// lower-context and upper-context sets; returns whether it is in focus
    pub fn set_focus_context(&mut self, row: usize, value: &Value) -> bool {
        let class = match (&self.kind, value) {
            (ColumnKind::Double(column), Value::Double(v)) => column.classify(*v),
            (ColumnKind::Temporal(column), Value::Temporal(t)) => column.classify(*t),
            (ColumnKind::Categorical(column), Value::Categorical(s)) => column.classify(s),
            _ => FocusClass::Focus,
        };

        self.focus_tuples.remove(&row);
        self.lower_context_tuples.remove(&row);
        self.upper_context_tuples.remove(&row);
        match class {
            FocusClass::Focus => self.focus_tuples.insert(row),
            FocusClass::LowerContext => self.lower_context_tuples.insert(row),
            FocusClass::UpperContext => self.upper_context_tuples.insert(row),
        };

        class == FocusClass::Focus
    }

    pub fn clear_focus_context(&mut self) {
        self.focus_tuples.clear();
        self.lower_context_tuples.clear();
        self.upper_context_tuples.clear();
    }

    pub fn focus_tuples(&self) -> &BTreeSet<usize> {
        &self.focus_tuples
    }

    pub fn lower_context_tuples(&self) -> &BTreeSet<usize> {
        &self.lower_context_tuples
    }

    pub fn upper_context_tuples(&self) -> &BTreeSet<usize> {
        &self.upper_context_tuples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubles(values: &[f64]) -> Vec<Value> {
        values.iter().map(|&v| Value::Double(v)).collect()
    }

    #[test]
    fn test_statistics_set_scale_bounds() {
        let mut column = Column::double("A");
        column.calculate_statistics(&doubles(&[3.0, 1.0, 9.0]), 3);
        let double = column.as_double().unwrap();
        assert_eq!(double.minimum_scale_value(), Some(1.0));
        assert_eq!(double.maximum_scale_value(), Some(9.0));
        assert_eq!(double.minimum_focus_value(), Some(1.0));
        assert_eq!(column.statistics().map(|s| s.count()), Some(3));
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let values = doubles(&[1.0, 2.0, 3.0]);
        let mut column = Column::double("A");
        column.calculate_statistics(&values, 2);
        let first = column.statistics().and_then(|s| s.as_double()).map(|s| (s.mean(), s.median()));
        column.calculate_statistics(&values, 2);
        let second = column.statistics().and_then(|s| s.as_double()).map(|s| (s.mean(), s.median()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_focus_context_sets_are_disjoint() {
        let values = doubles(&[0.0, 5.0, 10.0]);
        let mut column = Column::double("A");
        column.calculate_statistics(&values, 2);
        column.as_double_mut().unwrap().set_focus_bounds(2.0, 8.0);

        let in_focus: Vec<bool> = values
            .iter()
            .enumerate()
            .map(|(row, v)| column.set_focus_context(row, v))
            .collect();
        assert_eq!(in_focus, vec![false, true, false]);
        assert!(column.lower_context_tuples().contains(&0));
        assert!(column.focus_tuples().contains(&1));
        assert!(column.upper_context_tuples().contains(&2));

        // Reclassifying moves the row rather than duplicating it
        column.as_double_mut().unwrap().reset_focus();
        assert!(column.set_focus_context(0, &values[0]));
        assert!(!column.lower_context_tuples().contains(&0));
        assert_eq!(column.focus_tuples().len(), 2);
    }

    #[test]
    fn test_categorical_focus() {
        let mut column = Column::categorical("B");
        column.as_categorical_mut().unwrap().set_focus_categories(["x"]);
        assert!(column.set_focus_context(0, &Value::from("x")));
        assert!(!column.set_focus_context(1, &Value::from("y")));
        assert!(column.upper_context_tuples().is_empty());
    }
}
