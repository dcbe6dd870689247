//! Change notifications emitted by a data table
//!
//! Mutating table operations return the events they produced once the table
//! is consistent again. Callers forward them to listeners, either directly
//! through [`TableEvent::dispatch_to`] or through an [`EventDispatcher`].

mod dispatcher;

pub use dispatcher::EventDispatcher;

use serde::{Deserialize, Serialize};

use crate::selection::ColumnSelectionRange;
use crate::value::ColumnId;

/// Identity and display name of a column at the time of an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnHandle {
    pub id: ColumnId,
    pub name: String,
}

impl ColumnHandle {
    pub fn new(id: ColumnId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// A state transition of a table or its active query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableEvent {
    /// All data replaced or cleared
    Reset,
    StatisticsChanged,
    NumHistogramBinsChanged(usize),
    AllSelectionsRemoved,
    SelectionsForColumnRemoved(ColumnHandle),
    SelectionAdded(ColumnSelectionRange),
    SelectionRemoved(ColumnSelectionRange),
    SelectionChanged(ColumnSelectionRange),
    HighlightedColumnChanged {
        old: Option<ColumnHandle>,
        new: Option<ColumnHandle>,
    },
    /// Rows `first_row..first_row + count` were appended
    TuplesAdded { first_row: usize, count: usize },
    TuplesRemoved(usize),
    ColumnDisabled(ColumnHandle),
    ColumnsDisabled(Vec<ColumnHandle>),
    ColumnEnabled(ColumnHandle),
    BivariateColumnAdded { column: ColumnHandle, index: usize },
    ColumnOrderChanged,
    ColumnNameChanged(ColumnHandle),
}

impl TableEvent {
    /// Invoke the listener callback matching this event
    pub fn dispatch_to(&self, listener: &dyn DataTableListener) {
        match self {
            TableEvent::Reset => listener.data_table_reset(),
            TableEvent::StatisticsChanged => listener.data_table_statistics_changed(),
            TableEvent::NumHistogramBinsChanged(bins) => listener.data_table_num_histogram_bins_changed(*bins),
            TableEvent::AllSelectionsRemoved => listener.data_table_all_selections_removed(),
            TableEvent::SelectionsForColumnRemoved(column) => {
                listener.data_table_selections_for_column_removed(column)
            }
            TableEvent::SelectionAdded(range) => listener.data_table_selection_added(range),
            TableEvent::SelectionRemoved(range) => listener.data_table_selection_removed(range),
            TableEvent::SelectionChanged(range) => listener.data_table_selection_changed(range),
            TableEvent::HighlightedColumnChanged { old, new } => {
                listener.data_table_highlighted_column_changed(old.as_ref(), new.as_ref())
            }
            TableEvent::TuplesAdded { first_row, count } => {
                listener.data_table_tuples_added(*first_row, *count)
            }
            TableEvent::TuplesRemoved(count) => listener.data_table_tuples_removed(*count),
            TableEvent::ColumnDisabled(column) => listener.data_table_column_disabled(column),
            TableEvent::ColumnsDisabled(columns) => listener.data_table_columns_disabled(columns),
            TableEvent::ColumnEnabled(column) => listener.data_table_column_enabled(column),
            TableEvent::BivariateColumnAdded { column, index } => {
                listener.data_table_bivariate_column_added(column, *index)
            }
            TableEvent::ColumnOrderChanged => listener.data_table_column_order_changed(),
            TableEvent::ColumnNameChanged(column) => listener.data_table_column_name_changed(column),
        }
    }
}

/// Observer of table state transitions.
///
/// Every method defaults to a no-op so renderers implement only what they
/// redraw on. Callbacks must not mutate the table that produced the event.
pub trait DataTableListener: Send + Sync {
    fn data_table_reset(&self) {}
    fn data_table_statistics_changed(&self) {}
    fn data_table_num_histogram_bins_changed(&self, _num_bins: usize) {}
    fn data_table_all_selections_removed(&self) {}
    fn data_table_selections_for_column_removed(&self, _column: &ColumnHandle) {}
    fn data_table_selection_added(&self, _range: &ColumnSelectionRange) {}
    fn data_table_selection_removed(&self, _range: &ColumnSelectionRange) {}
    fn data_table_selection_changed(&self, _range: &ColumnSelectionRange) {}
    fn data_table_highlighted_column_changed(
        &self,
        _old: Option<&ColumnHandle>,
        _new: Option<&ColumnHandle>,
    ) {
    }
    fn data_table_tuples_added(&self, _first_row: usize, _count: usize) {}
    fn data_table_tuples_removed(&self, _count: usize) {}
    fn data_table_column_disabled(&self, _column: &ColumnHandle) {}
    fn data_table_columns_disabled(&self, _columns: &[ColumnHandle]) {}
    fn data_table_column_enabled(&self, _column: &ColumnHandle) {}
    fn data_table_bivariate_column_added(&self, _column: &ColumnHandle, _index: usize) {}
    fn data_table_column_order_changed(&self) {}
    fn data_table_column_name_changed(&self, _column: &ColumnHandle) {}
}
