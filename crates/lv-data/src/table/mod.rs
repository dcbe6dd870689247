//! The data table: columns, tuples and the active query
//!
//! Every mutating operation validates its input first, applies the change,
//! and only then returns the [`TableEvent`]s describing it. Callers forward
//! those to listeners, typically through an
//! [`EventDispatcher`](lv_core::EventDispatcher).

mod columns;
mod selections;

use lv_core::{ColumnHandle, ColumnId, CoreError, CoreResult, TableConfig, TableEvent, Value};
use tracing::{debug, info};

use crate::column::Column;
use crate::histogram::{calculate_column_2d_histograms, Histogram2DSet};
use crate::query::{Query, QueryId};
use crate::stats::ColumnSummaryStats;
use crate::tuple::Tuple;

/// In-memory column store over row tuples
#[derive(Debug)]
pub struct DataTable {
    config: TableConfig,
    columns: Vec<Column>,
    disabled_columns: Vec<Column>,
    /// Every column id, enabled or not; the enabled columns appear in slot order
    column_order: Vec<ColumnId>,
    tuples: Vec<Tuple>,
    /// Parallel to `tuples`; slot `k` belongs to `disabled_columns[k]`
    disabled_column_tuples: Vec<Tuple>,
    active_query: Query,
    query_counter: u64,
    next_column_id: u32,
    num_histogram_bins: usize,
    highlighted_column: Option<ColumnId>,
    histograms_2d: Histogram2DSet,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTable {
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self {
            num_histogram_bins: config.default_bin_count(0),
            config,
            columns: Vec::new(),
            disabled_columns: Vec::new(),
            column_order: Vec::new(),
            tuples: Vec::new(),
            disabled_column_tuples: Vec::new(),
            active_query: Query::new(QueryId(1)),
            query_counter: 1,
            next_column_id: 0,
            highlighted_column: None,
            histograms_2d: Histogram2DSet::new(),
        }
    }

    /// Replace the whole table.
    ///
    /// Every tuple must carry one value per column, of the column's kind.
    /// Validation happens before anything changes, so a rejected call leaves
    /// the table untouched.
    pub fn set_data(&mut self, columns: Vec<Column>, tuples: Vec<Tuple>) -> CoreResult<Vec<TableEvent>> {
        for (row, tuple) in tuples.iter().enumerate() {
            validate_tuple(row, tuple, &columns)?;
        }

        self.columns = columns;
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.assign_id(ColumnId(index as u32));
            column.set_enabled(true);
            column.clear_focus_context();
        }
        self.next_column_id = self.columns.len() as u32;
        self.column_order = self.columns.iter().map(Column::id).collect();
        self.disabled_columns.clear();
        self.disabled_column_tuples = vec![Tuple::new(); tuples.len()];
        self.tuples = tuples;
        self.highlighted_column = None;
        self.num_histogram_bins = self.config.default_bin_count(self.tuples.len());
        self.reset_query();

        self.recalculate_statistics();
        self.refresh_query();

        info!(
            "Set data: {} tuples, {} columns, {} histogram bins",
            self.tuples.len(),
            self.columns.len(),
            self.num_histogram_bins
        );
        Ok(vec![TableEvent::Reset])
    }

    /// Drop all columns and tuples
    pub fn clear(&mut self) -> Vec<TableEvent> {
        self.columns.clear();
        self.disabled_columns.clear();
        self.column_order.clear();
        self.tuples.clear();
        self.disabled_column_tuples.clear();
        self.highlighted_column = None;
        self.histograms_2d.clear();
        self.num_histogram_bins = self.config.default_bin_count(0);
        self.reset_query();
        info!("Cleared data table");
        vec![TableEvent::Reset]
    }

    /// Append rows carrying one value per enabled column.
    ///
    /// Rejected while any column is disabled, since the new rows would have
    /// no values to restore on re-enable.
    pub fn add_tuples(&mut self, tuples: Vec<Tuple>) -> CoreResult<Vec<TableEvent>> {
        if !self.disabled_columns.is_empty() {
            return Err(CoreError::DisabledColumnsPresent(self.disabled_columns.len()));
        }
        let first_row = self.tuples.len();
        for (offset, tuple) in tuples.iter().enumerate() {
            validate_tuple(first_row + offset, tuple, &self.columns)?;
        }
        if tuples.is_empty() {
            return Ok(Vec::new());
        }

        let count = tuples.len();
        self.tuples.extend(tuples);
        self.disabled_column_tuples.resize(self.tuples.len(), Tuple::new());

        self.recalculate_statistics();
        self.refresh_query();

        info!("Added {} tuples ({} total)", count, self.tuples.len());
        Ok(vec![
            TableEvent::TuplesAdded { first_row, count },
            TableEvent::StatisticsChanged,
        ])
    }

    /// Recompute whole-table statistics, the query partition and its statistics
    pub fn calculate_statistics(&mut self) -> Vec<TableEvent> {
        self.recalculate_statistics();
        self.refresh_query();
        vec![TableEvent::StatisticsChanged]
    }

    /// Recompute the whole-table 2D histograms of every enabled ordered column pair
    pub fn calculate_column_2d_histograms(&mut self) -> Vec<TableEvent> {
        self.recalculate_histograms_2d();
        vec![TableEvent::StatisticsChanged]
    }

    /// Change the table-wide histogram bin count
    pub fn set_num_histogram_bins(&mut self, num_bins: usize) -> CoreResult<Vec<TableEvent>> {
        if num_bins == 0 {
            return Err(CoreError::InvalidBinCount);
        }
        if num_bins == self.num_histogram_bins {
            return Ok(Vec::new());
        }

        self.num_histogram_bins = num_bins;
        for column in &mut self.columns {
            column.set_num_histogram_bins(num_bins);
        }
        self.active_query
            .set_num_histogram_bins(num_bins, &self.tuples, &self.columns, &self.config);
        self.recalculate_histograms_2d();

        debug!("Histogram bins set to {}", num_bins);
        Ok(vec![TableEvent::NumHistogramBinsChanged(num_bins)])
    }

    /// Toggle statistics over the non-queried partition
    pub fn set_calculate_non_query_statistics(&mut self, enabled: bool) -> Vec<TableEvent> {
        if self.config.calculate_non_query_statistics == enabled {
            return Vec::new();
        }
        self.config.calculate_non_query_statistics = enabled;
        self.refresh_query_statistics();
        vec![TableEvent::StatisticsChanged]
    }

    /// Whole-table statistics of an enabled column rebinned to `num_bins`,
    /// leaving the table's own statistics alone
    pub fn column_histogram(&self, id: ColumnId, num_bins: usize) -> CoreResult<Option<ColumnSummaryStats>> {
        if num_bins == 0 {
            return Err(CoreError::InvalidBinCount);
        }
        let slot = self.enabled_index(id)?;
        let column = &self.columns[slot];
        let mut stats = ColumnSummaryStats::new(id, column.name(), column.value_kind(), num_bins, None);
        if let Some(stats) = stats.as_mut() {
            stats.set_values(self.tuples.iter().map(|tuple| tuple.element(slot)));
        }
        Ok(stats)
    }

    /// Highlight an enabled column, or clear the highlight with `None`
    pub fn set_highlighted_column(&mut self, id: Option<ColumnId>) -> CoreResult<Vec<TableEvent>> {
        if let Some(id) = id {
            self.enabled_index(id)?;
        }
        if id == self.highlighted_column {
            return Ok(Vec::new());
        }
        let old = self.highlighted_column.and_then(|old| self.handle(old));
        self.highlighted_column = id;
        let new = id.and_then(|new| self.handle(new));
        Ok(vec![TableEvent::HighlightedColumnChanged { old, new }])
    }

    /// Rename an enabled or disabled column
    pub fn set_column_name(&mut self, id: ColumnId, name: impl Into<String>) -> CoreResult<Vec<TableEvent>> {
        let name = name.into();
        let column = self.column_mut(id).ok_or(CoreError::UnknownColumn(id))?;
        if column.name() == name {
            return Ok(Vec::new());
        }
        column.set_name(name);
        let handle = column.handle();

        // Histograms carry the column name
        if let Ok(slot) = self.enabled_index(id) {
            let tuples = &self.tuples;
            self.columns[slot].calculate_statistics(
                tuples.iter().map(|tuple| tuple.element(slot)),
                self.num_histogram_bins,
            );
            self.refresh_query_statistics();
        }
        Ok(vec![TableEvent::ColumnNameChanged(handle)])
    }

    /// Reclassify every row of every enabled column into focus, lower
    /// context or upper context against the column's current focus bounds
    pub fn update_focus_context(&mut self) {
        let tuples = &self.tuples;
        for (slot, column) in self.columns.iter_mut().enumerate() {
            column.clear_focus_context();
            for (row, tuple) in tuples.iter().enumerate() {
                column.set_focus_context(row, tuple.element(slot));
            }
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Enabled columns in tuple-slot order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Disabled columns in the order they were disabled
    pub fn disabled_columns(&self) -> impl Iterator<Item = &Column> {
        self.disabled_columns.iter()
    }

    /// Enabled or disabled column by id
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns
            .iter()
            .chain(self.disabled_columns())
            .find(|column| column.id() == id)
    }

    /// Mutable access for focus and scale bound edits
    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .chain(self.disabled_columns.iter_mut())
            .find(|column| column.id() == id)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .chain(self.disabled_columns())
            .find(|column| column.name() == name)
    }

    /// Tuple slot of an enabled column
    pub fn column_index(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|column| column.id() == id)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    /// Panics when `row` is out of range
    pub fn tuple(&self, row: usize) -> &Tuple {
        &self.tuples[row]
    }

    pub fn tuple_count(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Value of `row` in any column, enabled or disabled
    pub fn value(&self, row: usize, id: ColumnId) -> Option<&Value> {
        if let Some(slot) = self.column_index(id) {
            return self.tuples.get(row).map(|tuple| tuple.element(slot));
        }
        let slot = self
            .disabled_columns
            .iter()
            .position(|column| column.id() == id)?;
        self.disabled_column_tuples.get(row).map(|tuple| tuple.element(slot))
    }

    pub fn active_query(&self) -> &Query {
        &self.active_query
    }

    pub fn num_histogram_bins(&self) -> usize {
        self.num_histogram_bins
    }

    pub fn highlighted_column(&self) -> Option<&Column> {
        self.highlighted_column.and_then(|id| self.column(id))
    }

    /// Whole-table 2D histograms
    pub fn histograms_2d(&self) -> &Histogram2DSet {
        &self.histograms_2d
    }

    /// Largest bin count over every whole-table 2D histogram
    pub fn max_histogram_2d_bin_count(&self) -> u64 {
        self.histograms_2d.max_bin_count()
    }

    fn handle(&self, id: ColumnId) -> Option<ColumnHandle> {
        self.column(id).map(Column::handle)
    }

    /// Tuple slot of `id`, or why there is none
    fn enabled_index(&self, id: ColumnId) -> CoreResult<usize> {
        if let Some(slot) = self.column_index(id) {
            return Ok(slot);
        }
        if self.disabled_columns.iter().any(|column| column.id() == id) {
            Err(CoreError::ColumnDisabled(id))
        } else {
            Err(CoreError::UnknownColumn(id))
        }
    }

    fn reset_query(&mut self) {
        self.query_counter += 1;
        self.active_query = Query::new(QueryId(self.query_counter));
        debug!("Started query {}", self.active_query.id());
    }

    fn recalculate_statistics(&mut self) {
        let tuples = &self.tuples;
        for (slot, column) in self.columns.iter_mut().enumerate() {
            column.calculate_statistics(
                tuples.iter().map(|tuple| tuple.element(slot)),
                self.num_histogram_bins,
            );
        }
        self.recalculate_histograms_2d();
    }

    fn recalculate_histograms_2d(&mut self) {
        self.histograms_2d = if self.config.calculate_2d_histograms {
            calculate_column_2d_histograms(
                &self.columns,
                &self.tuples,
                None,
                self.num_histogram_bins,
                self.config.histogram_2d_epsilon,
            )
        } else {
            Histogram2DSet::new()
        };
    }

    /// Repartition rows and rebuild the partition statistics
    fn refresh_query(&mut self) {
        self.active_query
            .set_queried_tuples(&mut self.tuples, &self.columns);
        self.refresh_query_statistics();
    }

    fn refresh_query_statistics(&mut self) {
        self.active_query.calculate_statistics(
            &self.tuples,
            &self.columns,
            self.num_histogram_bins,
            &self.config,
        );
    }
}

fn validate_tuple(row: usize, tuple: &Tuple, columns: &[Column]) -> CoreResult<()> {
    if tuple.element_count() != columns.len() {
        return Err(CoreError::ArityMismatch {
            row,
            expected: columns.len(),
            found: tuple.element_count(),
        });
    }
    for (value, column) in tuple.elements().iter().zip(columns) {
        if value.kind() != column.value_kind() {
            return Err(CoreError::TypeMismatch {
                row,
                column: column.name().to_string(),
                expected: column.value_kind(),
                found: value.kind(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// A(double: 1,2,3,10), B(categorical: x,y,x,y), C(double: 10,20,30,40)
    pub(crate) fn table() -> DataTable {
        let columns = vec![Column::double("A"), Column::categorical("B"), Column::double("C")];
        let tuples = [(1.0, "x", 10.0), (2.0, "y", 20.0), (3.0, "x", 30.0), (10.0, "y", 40.0)]
            .iter()
            .map(|&(a, b, c)| Tuple::from_elements(vec![a.into(), b.into(), c.into()]))
            .collect();
        let mut table = DataTable::new();
        table.set_data(columns, tuples).unwrap();
        table
    }

    #[test]
    fn test_set_data() {
        let table = table();
        assert_eq!(table.tuple_count(), 4);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.num_histogram_bins(), 2);
        assert_eq!(table.active_query().id(), QueryId(2));

        let a = table.columns()[0].statistics().and_then(|s| s.as_double()).unwrap();
        assert_abs_diff_eq!(a.mean(), 4.0);
        assert_eq!(a.max(), 10.0);

        // A x C both ways
        assert_eq!(table.histograms_2d().len(), 2);
        assert!(table.active_query().queried_rows().is_empty());
        assert_eq!(table.active_query().non_queried_count(), 4);
    }

    #[test]
    fn test_temporal_double_histograms_2d() {
        use chrono::{Duration, TimeZone, Utc};

        let origin = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let tuples = [(0, 1.0), (1, 1.0), (2, 1.0), (3, 5.0)]
            .iter()
            .map(|&(day, v)| Tuple::from_elements(vec![Value::Temporal(origin + Duration::days(day)), v.into()]))
            .collect();
        let mut table = DataTable::new();
        table
            .set_data(vec![Column::temporal("when"), Column::double("v")], tuples)
            .unwrap();

        let when_v = table.histograms_2d().get(ColumnId(0), ColumnId(1)).unwrap();
        assert_eq!(when_v.x_dimension().num_bins(), 2);
        assert_eq!(when_v.count(0, 0), 2);
        assert_eq!(when_v.count(1, 0), 1);
        assert_eq!(when_v.count(1, 1), 1);
        assert_eq!(when_v.total_count(), 4);

        let v_when = table.histograms_2d().get(ColumnId(1), ColumnId(0)).unwrap();
        assert_eq!(v_when.count(0, 1), 1);
        assert_eq!(table.max_histogram_2d_bin_count(), 2);

        table.set_num_histogram_bins(1).unwrap();
        assert_eq!(table.max_histogram_2d_bin_count(), 4);
    }

    #[test]
    fn test_set_data_rejects_bad_rows() {
        let mut table = DataTable::new();
        let err = table
            .set_data(
                vec![Column::double("A"), Column::categorical("B")],
                vec![Tuple::from_elements(vec![1.0.into()])],
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::ArityMismatch { row: 0, expected: 2, found: 1 }));

        let err = table
            .set_data(
                vec![Column::double("A")],
                vec![Tuple::from_elements(vec![1.0.into()]), Tuple::from_elements(vec!["x".into()])],
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch { row: 1, .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_clear_starts_new_query() {
        let mut table = table();
        let before = table.active_query().id();
        assert_eq!(table.clear(), vec![TableEvent::Reset]);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
        assert_ne!(table.active_query().id(), before);
    }

    #[test]
    fn test_add_tuples() {
        let mut table = table();
        let events = table
            .add_tuples(vec![Tuple::from_elements(vec![5.0.into(), "z".into(), 50.0.into()])])
            .unwrap();
        assert_eq!(events[0], TableEvent::TuplesAdded { first_row: 4, count: 1 });
        assert_eq!(table.tuple_count(), 5);
        let b = table.columns()[1].statistics().and_then(|s| s.as_categorical()).unwrap();
        assert_eq!(b.count_for("z"), 1);

        let err = table
            .add_tuples(vec![Tuple::from_elements(vec![5.0.into()])])
            .unwrap_err();
        assert!(matches!(err, CoreError::ArityMismatch { row: 5, .. }));

        table.disable_column(ColumnId(1)).unwrap();
        let err = table
            .add_tuples(vec![Tuple::from_elements(vec![5.0.into(), 50.0.into()])])
            .unwrap_err();
        assert_eq!(err, CoreError::DisabledColumnsPresent(1));
    }

    #[test]
    fn test_set_num_histogram_bins() {
        let mut table = table();
        assert_eq!(table.set_num_histogram_bins(0), Err(CoreError::InvalidBinCount));
        let events = table.set_num_histogram_bins(4).unwrap();
        assert_eq!(events, vec![TableEvent::NumHistogramBinsChanged(4)]);
        let stats = table.columns()[0].statistics().unwrap();
        assert_eq!(stats.num_histogram_bins(), 4);
        assert_eq!(stats.histogram().unwrap().num_bins(), 4);
        let histogram = table.histograms_2d().get(ColumnId(0), ColumnId(2)).unwrap();
        assert_eq!(histogram.x_dimension().num_bins(), 4);
        assert!(table.set_num_histogram_bins(4).unwrap().is_empty());
    }

    #[test]
    fn test_column_histogram_override() {
        let table = table();
        let stats = table.column_histogram(ColumnId(0), 9).unwrap().unwrap();
        assert_eq!(stats.histogram().unwrap().num_bins(), 9);
        assert_eq!(table.columns()[0].statistics().unwrap().num_histogram_bins(), 2);
        assert_eq!(table.column_histogram(ColumnId(7), 3).unwrap_err(), CoreError::UnknownColumn(ColumnId(7)));
    }

    #[test]
    fn test_highlight_and_rename() {
        let mut table = table();
        let events = table.set_highlighted_column(Some(ColumnId(1))).unwrap();
        assert_eq!(
            events,
            vec![TableEvent::HighlightedColumnChanged {
                old: None,
                new: Some(ColumnHandle::new(ColumnId(1), "B")),
            }]
        );
        assert!(table.set_highlighted_column(Some(ColumnId(1))).unwrap().is_empty());

        let events = table.set_column_name(ColumnId(1), "Group").unwrap();
        assert_eq!(events, vec![TableEvent::ColumnNameChanged(ColumnHandle::new(ColumnId(1), "Group"))]);
        assert_eq!(table.highlighted_column().unwrap().name(), "Group");
        assert_eq!(table.column_by_name("Group").unwrap().id(), ColumnId(1));
    }

    #[test]
    fn test_update_focus_context() {
        let mut table = table();
        table
            .column_mut(ColumnId(0))
            .and_then(Column::as_double_mut)
            .unwrap()
            .set_focus_bounds(2.0, 3.0);
        table.update_focus_context();
        let a = &table.columns()[0];
        assert_eq!(a.focus_tuples().iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(a.lower_context_tuples().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(a.upper_context_tuples().iter().copied().collect::<Vec<_>>(), vec![3]);
        assert_eq!(table.columns()[2].focus_tuples().len(), 4);
    }

    #[test]
    fn test_non_query_statistics_toggle() {
        let mut table = table();
        assert!(table.active_query().non_queried_statistics(ColumnId(0)).is_some());
        table.set_calculate_non_query_statistics(false);
        assert!(table.active_query().non_queried_statistics(ColumnId(0)).is_none());
        assert!(table.set_calculate_non_query_statistics(false).is_empty());
    }
}
