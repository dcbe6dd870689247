//! Brushing query: selection ranges and the row partition they produce
//!
//! A row is queried when, for every column carrying at least one selection,
//! its value matches at least one of that column's selections. With no
//! selections at all nothing is queried.

use std::fmt;

use ahash::AHashMap;
use lv_core::{
    ColumnId, ColumnSelection, ColumnSelectionRange, CoreError, CoreResult, SelectionId,
    TableConfig,
};
use tracing::debug;

use crate::column::Column;
use crate::histogram::{calculate_column_2d_histograms, Histogram2DSet};
use crate::stats::ColumnSummaryStats;
use crate::tuple::Tuple;

/// Sequential query identity, displayed as `Q<n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryId(pub u64);

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// The active filter state of a table
#[derive(Debug, Clone)]
pub struct Query {
    id: QueryId,
    selections: Vec<ColumnSelectionRange>,
    next_selection_id: u64,
    queried_rows: Vec<usize>,
    non_queried_rows: Vec<usize>,
    queried_statistics: AHashMap<ColumnId, ColumnSummaryStats>,
    non_queried_statistics: AHashMap<ColumnId, ColumnSummaryStats>,
    histograms_2d: Histogram2DSet,
}

impl Query {
    pub fn new(id: QueryId) -> Self {
        Self {
            id,
            selections: Vec::new(),
            next_selection_id: 0,
            queried_rows: Vec::new(),
            non_queried_rows: Vec::new(),
            queried_statistics: AHashMap::new(),
            non_queried_statistics: AHashMap::new(),
            histograms_2d: Histogram2DSet::new(),
        }
    }

    pub fn id(&self) -> QueryId {
        self.id
    }

    /// Active selections in insertion order
    pub fn selections(&self) -> &[ColumnSelectionRange] {
        &self.selections
    }

    pub fn selection(&self, id: SelectionId) -> Option<&ColumnSelectionRange> {
        self.selections.iter().find(|range| range.id == id)
    }

    pub fn column_selections(&self, column: ColumnId) -> impl Iterator<Item = &ColumnSelectionRange> {
        self.selections.iter().filter(move |range| range.column() == column)
    }

    pub fn has_selections(&self) -> bool {
        !self.selections.is_empty()
    }

    pub fn has_column_selections(&self, column: ColumnId) -> bool {
        self.column_selections(column).next().is_some()
    }

    /// Register a selection and return it with its assigned id
    pub fn add_selection(&mut self, selection: ColumnSelection) -> ColumnSelectionRange {
        let range = ColumnSelectionRange {
            id: SelectionId(self.next_selection_id),
            selection,
        };
        self.next_selection_id += 1;
        self.selections.push(range.clone());
        range
    }

    pub fn remove_selection(&mut self, id: SelectionId) -> Option<ColumnSelectionRange> {
        let index = self.selections.iter().position(|range| range.id == id)?;
        Some(self.selections.remove(index))
    }

    /// Replace the predicate of an existing selection on the same column
    pub fn update_selection(
        &mut self,
        id: SelectionId,
        selection: ColumnSelection,
    ) -> CoreResult<ColumnSelectionRange> {
        let range = self
            .selections
            .iter_mut()
            .find(|range| range.id == id)
            .ok_or(CoreError::UnknownSelection(id))?;
        if range.column() != selection.column() {
            return Err(CoreError::NotSelectable {
                column: selection.column(),
                kind: selection.kind(),
            });
        }
        range.selection = selection;
        Ok(range.clone())
    }

    /// Drop every selection on `column`, returning them
    pub fn remove_column_selections(&mut self, column: ColumnId) -> Vec<ColumnSelectionRange> {
        let (removed, kept) = std::mem::take(&mut self.selections)
            .into_iter()
            .partition(|range| range.column() == column);
        self.selections = kept;
        removed
    }

    /// Wipe selections and cached statistics; the partition is kept until the
    /// next [`set_queried_tuples`](Self::set_queried_tuples)
    pub fn clear(&mut self) {
        self.selections.clear();
        self.queried_statistics.clear();
        self.non_queried_statistics.clear();
        self.histograms_2d.clear();
    }

    /// Repartition every row and update each tuple's query flag.
    ///
    /// `columns` are the enabled columns in tuple-slot order.
    pub fn set_queried_tuples(&mut self, tuples: &mut [Tuple], columns: &[Column]) {
        self.queried_rows.clear();
        self.non_queried_rows.clear();

        let selections = &self.selections;
        let constraints: Vec<(usize, Vec<&ColumnSelectionRange>)> = columns
            .iter()
            .enumerate()
            .filter_map(|(slot, column)| {
                let ranges: Vec<_> = selections
                    .iter()
                    .filter(|range| range.column() == column.id())
                    .collect();
                (!ranges.is_empty()).then_some((slot, ranges))
            })
            .collect();

        for (row, tuple) in tuples.iter_mut().enumerate() {
            let queried = !selections.is_empty()
                && constraints.iter().all(|(slot, ranges)| {
                    let value = tuple.element(*slot);
                    ranges.iter().any(|range| range.matches(value))
                });
            tuple.set_query_flag(queried);
            if queried {
                self.queried_rows.push(row);
            } else {
                self.non_queried_rows.push(row);
            }
        }

        debug!(
            "{}: {} selection(s), {} queried, {} non-queried",
            self.id,
            self.selections.len(),
            self.queried_rows.len(),
            self.non_queried_rows.len()
        );
    }

    /// Rebuild per-partition statistics and the queried 2D histograms
    pub fn calculate_statistics(
        &mut self,
        tuples: &[Tuple],
        columns: &[Column],
        num_bins: usize,
        config: &TableConfig,
    ) {
        self.queried_statistics =
            Self::partition_statistics(self.id, tuples, columns, &self.queried_rows, num_bins);
        self.non_queried_statistics = if config.calculate_non_query_statistics {
            Self::partition_statistics(self.id, tuples, columns, &self.non_queried_rows, num_bins)
        } else {
            AHashMap::new()
        };
        self.calculate_histograms_2d(tuples, columns, num_bins, config);
    }

    fn partition_statistics(
        id: QueryId,
        tuples: &[Tuple],
        columns: &[Column],
        rows: &[usize],
        num_bins: usize,
    ) -> AHashMap<ColumnId, ColumnSummaryStats> {
        columns
            .iter()
            .enumerate()
            .filter_map(|(slot, column)| {
                let mut stats = ColumnSummaryStats::new(
                    column.id(),
                    column.name(),
                    column.value_kind(),
                    num_bins,
                    Some(id),
                )?;
                stats.set_values(rows.iter().map(|&row| tuples[row].element(slot)));
                Some((column.id(), stats))
            })
            .collect()
    }

    fn calculate_histograms_2d(
        &mut self,
        tuples: &[Tuple],
        columns: &[Column],
        num_bins: usize,
        config: &TableConfig,
    ) {
        self.histograms_2d = if config.calculate_2d_histograms {
            calculate_column_2d_histograms(
                columns,
                tuples,
                Some(&self.queried_rows),
                num_bins,
                config.histogram_2d_epsilon,
            )
        } else {
            Histogram2DSet::new()
        };
    }

    /// Rebin every partition histogram and recompute the 2D histograms
    pub fn set_num_histogram_bins(
        &mut self,
        num_bins: usize,
        tuples: &[Tuple],
        columns: &[Column],
        config: &TableConfig,
    ) {
        for stats in self
            .queried_statistics
            .values_mut()
            .chain(self.non_queried_statistics.values_mut())
        {
            stats.set_num_histogram_bins(num_bins);
        }
        self.calculate_histograms_2d(tuples, columns, num_bins, config);
    }

    pub fn queried_rows(&self) -> &[usize] {
        &self.queried_rows
    }

    pub fn non_queried_rows(&self) -> &[usize] {
        &self.non_queried_rows
    }

    pub fn queried_count(&self) -> usize {
        self.queried_rows.len()
    }

    pub fn non_queried_count(&self) -> usize {
        self.non_queried_rows.len()
    }

    pub fn queried_statistics(&self, column: ColumnId) -> Option<&ColumnSummaryStats> {
        self.queried_statistics.get(&column)
    }

    pub fn non_queried_statistics(&self, column: ColumnId) -> Option<&ColumnSummaryStats> {
        self.non_queried_statistics.get(&column)
    }

    /// 2D histograms over the queried partition
    pub fn histograms_2d(&self) -> &Histogram2DSet {
        &self.histograms_2d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lv_core::{CategoricalColumnSelection, DoubleColumnSelectionRange, Value};

    fn fixture() -> (Vec<Column>, Vec<Tuple>) {
        let mut columns = vec![Column::double("A"), Column::categorical("B")];
        for (i, column) in columns.iter_mut().enumerate() {
            column.assign_id(ColumnId(i as u32));
        }
        let tuples = [(1.0, "x"), (2.0, "y"), (3.0, "x"), (10.0, "y")]
            .iter()
            .map(|&(a, b)| Tuple::from_elements(vec![Value::Double(a), Value::from(b)]))
            .collect();
        (columns, tuples)
    }

    fn range(column: u32, min: f64, max: f64) -> ColumnSelection {
        DoubleColumnSelectionRange::new(ColumnId(column), min, max)
            .unwrap()
            .into()
    }

    #[test]
    fn test_no_selections_selects_nothing() {
        let (columns, mut tuples) = fixture();
        let mut query = Query::new(QueryId(1));
        query.set_queried_tuples(&mut tuples, &columns);
        assert!(query.queried_rows().is_empty());
        assert_eq!(query.non_queried_rows(), &[0, 1, 2, 3]);
        assert!(tuples.iter().all(|t| !t.query_flag()));
    }

    #[test]
    fn test_or_within_column_and_across_columns() {
        let (columns, mut tuples) = fixture();
        let mut query = Query::new(QueryId(1));
        query.add_selection(range(0, 0.0, 1.5));
        query.add_selection(range(0, 9.0, 11.0));
        query.set_queried_tuples(&mut tuples, &columns);
        assert_eq!(query.queried_rows(), &[0, 3]);

        query.add_selection(CategoricalColumnSelection::new(ColumnId(1), ["y"]).into());
        query.set_queried_tuples(&mut tuples, &columns);
        assert_eq!(query.queried_rows(), &[3]);
        assert_eq!(query.non_queried_rows(), &[0, 1, 2]);
        assert!(tuples[3].query_flag());
    }

    #[test]
    fn test_repartition_is_idempotent() {
        let (columns, mut tuples) = fixture();
        let mut query = Query::new(QueryId(1));
        query.add_selection(range(0, 2.0, 3.0));
        query.set_queried_tuples(&mut tuples, &columns);
        let first = (query.queried_rows().to_vec(), query.non_queried_rows().to_vec());
        query.set_queried_tuples(&mut tuples, &columns);
        assert_eq!(first, (query.queried_rows().to_vec(), query.non_queried_rows().to_vec()));
    }

    #[test]
    fn test_update_and_remove_selection() {
        let (columns, mut tuples) = fixture();
        let mut query = Query::new(QueryId(1));
        let added = query.add_selection(range(0, 0.0, 1.0));
        let updated = query.update_selection(added.id, range(0, 0.0, 5.0)).unwrap();
        assert_eq!(updated.id, added.id);
        query.set_queried_tuples(&mut tuples, &columns);
        assert_eq!(query.queried_count(), 3);

        assert!(matches!(
            query.update_selection(added.id, range(1, 0.0, 1.0)),
            Err(CoreError::NotSelectable { .. })
        ));
        assert!(query.remove_selection(added.id).is_some());
        assert!(query.remove_selection(added.id).is_none());
        assert!(matches!(
            query.update_selection(added.id, range(0, 0.0, 1.0)),
            Err(CoreError::UnknownSelection(_))
        ));
    }

    #[test]
    fn test_statistics_per_partition() {
        let (mut columns, mut tuples) = fixture();
        for (slot, column) in columns.iter_mut().enumerate() {
            let values: Vec<&Value> = tuples.iter().map(|t| t.element(slot)).collect();
            column.calculate_statistics(values, 2);
        }
        let mut query = Query::new(QueryId(4));
        query.add_selection(range(0, 0.0, 5.0));
        query.set_queried_tuples(&mut tuples, &columns);
        query.calculate_statistics(&tuples, &columns, 2, &TableConfig::default());

        let queried = query.queried_statistics(ColumnId(0)).and_then(|s| s.as_double()).unwrap();
        assert_eq!(queried.max(), 3.0);
        assert_eq!(queried.query(), Some(QueryId(4)));
        let rest = query.non_queried_statistics(ColumnId(0)).and_then(|s| s.as_double()).unwrap();
        assert_eq!(rest.count(), 1);
        assert_eq!(rest.mean(), 10.0);

        let config = TableConfig {
            calculate_non_query_statistics: false,
            ..TableConfig::default()
        };
        query.calculate_statistics(&tuples, &columns, 2, &config);
        assert!(query.non_queried_statistics(ColumnId(0)).is_none());
    }

    #[test]
    fn test_clear_keeps_partition() {
        let (columns, mut tuples) = fixture();
        let mut query = Query::new(QueryId(1));
        query.add_selection(range(0, 0.0, 5.0));
        query.set_queried_tuples(&mut tuples, &columns);
        query.clear();
        assert!(!query.has_selections());
        assert_eq!(query.queried_count(), 3);
        query.set_queried_tuples(&mut tuples, &columns);
        assert_eq!(query.queried_count(), 0);
        assert_eq!(QueryId(7).to_string(), "Q7");
    }
}
