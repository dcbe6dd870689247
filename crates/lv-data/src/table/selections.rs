//! Selection editing and partition-based tuple removal

use lv_core::{ColumnId, ColumnSelection, CoreError, CoreResult, SelectionId, TableEvent};
use tracing::{info, warn};

use super::DataTable;
use crate::tuple::Tuple;

impl DataTable {
    /// Attach a selection to an enabled column and repartition
    pub fn add_selection(&mut self, selection: ColumnSelection) -> CoreResult<(SelectionId, Vec<TableEvent>)> {
        self.check_selectable(&selection)?;
        let range = self.active_query.add_selection(selection);
        self.refresh_query();
        Ok((range.id, vec![TableEvent::SelectionAdded(range)]))
    }

    pub fn remove_selection(&mut self, id: SelectionId) -> CoreResult<Vec<TableEvent>> {
        let range = self
            .active_query
            .remove_selection(id)
            .ok_or(CoreError::UnknownSelection(id))?;
        self.refresh_query();
        Ok(vec![TableEvent::SelectionRemoved(range)])
    }

    /// Replace the predicate of a selection; the column cannot change
    pub fn update_selection(&mut self, id: SelectionId, selection: ColumnSelection) -> CoreResult<Vec<TableEvent>> {
        self.check_selectable(&selection)?;
        let range = self.active_query.update_selection(id, selection)?;
        self.refresh_query();
        Ok(vec![TableEvent::SelectionChanged(range)])
    }

    /// Drop every selection on one column
    pub fn remove_column_selections(&mut self, column: ColumnId) -> CoreResult<Vec<TableEvent>> {
        let handle = self
            .column(column)
            .map(|c| c.handle())
            .ok_or(CoreError::UnknownColumn(column))?;
        if self.active_query.remove_column_selections(column).is_empty() {
            return Ok(Vec::new());
        }
        self.refresh_query();
        Ok(vec![TableEvent::SelectionsForColumnRemoved(handle)])
    }

    pub fn clear_selections(&mut self) -> Vec<TableEvent> {
        if !self.active_query.has_selections() {
            return Vec::new();
        }
        self.active_query.clear();
        self.refresh_query();
        vec![TableEvent::AllSelectionsRemoved]
    }

    /// Delete the queried rows, keeping the rest. Returns how many were
    /// removed; nothing happens while the query has no selections.
    pub fn remove_selected_tuples(&mut self) -> (usize, Vec<TableEvent>) {
        let keep = self.active_query.non_queried_rows().to_vec();
        self.retain_rows(keep)
    }

    /// Delete the non-queried rows, keeping the queried ones
    pub fn remove_unselected_tuples(&mut self) -> (usize, Vec<TableEvent>) {
        let keep = self.active_query.queried_rows().to_vec();
        self.retain_rows(keep)
    }

    fn retain_rows(&mut self, keep: Vec<usize>) -> (usize, Vec<TableEvent>) {
        if !self.active_query.has_selections() {
            warn!("No active selections, no tuples removed");
            return (0, Vec::new());
        }

        let removed = self.tuples.len() - keep.len();
        self.tuples = take_rows(&mut self.tuples, &keep);
        self.disabled_column_tuples = take_rows(&mut self.disabled_column_tuples, &keep);
        for column in &mut self.columns {
            column.clear_focus_context();
        }

        self.reset_query();
        self.recalculate_statistics();
        self.refresh_query();

        info!("Removed {} tuples, {} remain", removed, self.tuples.len());
        (
            removed,
            vec![
                TableEvent::AllSelectionsRemoved,
                TableEvent::TuplesRemoved(removed),
                TableEvent::StatisticsChanged,
            ],
        )
    }

    fn check_selectable(&self, selection: &ColumnSelection) -> CoreResult<()> {
        let id = selection.column();
        let slot = self.enabled_index(id)?;
        let kind = self.columns[slot].value_kind();
        if kind != selection.kind() {
            return Err(CoreError::NotSelectable { column: id, kind });
        }
        Ok(())
    }
}

/// Move the rows at `keep` (ascending) out of `rows`
fn take_rows(rows: &mut Vec<Tuple>, keep: &[usize]) -> Vec<Tuple> {
    let mut slots: Vec<Option<Tuple>> = std::mem::take(rows).into_iter().map(Some).collect();
    keep.iter().filter_map(|&row| slots[row].take()).collect()
}
