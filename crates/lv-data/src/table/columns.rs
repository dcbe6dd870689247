//! Column enable/disable, reordering and bivariate synthesis

use lv_core::{ColumnHandle, ColumnId, CoreError, CoreResult, TableEvent, Value, ValueKind};
use tracing::{debug, info, warn};

use super::DataTable;
use crate::column::Column;

impl DataTable {
    /// Disable an enabled column, moving its values to the side table.
    ///
    /// Selections on the column are dropped and a highlight on it is
    /// cleared. Disabling an already disabled column does nothing.
    pub fn disable_column(&mut self, id: ColumnId) -> CoreResult<Vec<TableEvent>> {
        let slot = match self.enabled_index(id) {
            Ok(slot) => slot,
            Err(CoreError::ColumnDisabled(_)) => {
                warn!("Column {} is already disabled", id);
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        let handle = self.detach_column(slot);
        let mut events = vec![TableEvent::ColumnDisabled(handle.clone())];
        events.extend(self.after_detach(&[handle]));
        Ok(events)
    }

    /// Disable several columns with a single notification.
    ///
    /// Every id must name a column of this table; already disabled ones are
    /// skipped.
    pub fn disable_columns(&mut self, ids: &[ColumnId]) -> CoreResult<Vec<TableEvent>> {
        for &id in ids {
            if self.column(id).is_none() {
                return Err(CoreError::UnknownColumn(id));
            }
        }

        let mut handles = Vec::new();
        for &id in ids {
            if let Some(slot) = self.column_index(id) {
                handles.push(self.detach_column(slot));
            }
        }
        if handles.is_empty() {
            return Ok(Vec::new());
        }

        let mut events = vec![TableEvent::ColumnsDisabled(handles.clone())];
        events.extend(self.after_detach(&handles));
        Ok(events)
    }

    /// Re-enable a disabled column.
    ///
    /// The column lands after every enabled column that preceded it in the
    /// table's column order, so columns disabled together come back in
    /// their original arrangement whatever order they are enabled in.
    ///
    /// Statistics are recomputed for every column, since the 2D histograms
    /// pair it with all others.
    pub fn enable_column(&mut self, id: ColumnId) -> CoreResult<Vec<TableEvent>> {
        let k = match self
            .disabled_columns
            .iter()
            .position(|column| column.id() == id)
        {
            Some(k) => k,
            None if self.column_index(id).is_some() => return Err(CoreError::ColumnAlreadyEnabled(id)),
            None => return Err(CoreError::UnknownColumn(id)),
        };

        let mut column = self.disabled_columns.remove(k);
        let slot = self.restore_slot(id);
        for (tuple, side) in self.tuples.iter_mut().zip(&mut self.disabled_column_tuples) {
            tuple.insert_element(slot, side.remove_element(k));
        }
        column.set_enabled(true);
        let handle = column.handle();
        self.columns.insert(slot, column);

        self.recalculate_statistics();
        self.refresh_query();

        info!("Enabled column '{}' at position {}", handle.name, slot);
        Ok(vec![TableEvent::ColumnEnabled(handle), TableEvent::StatisticsChanged])
    }

    /// Reorder the enabled columns.
    ///
    /// `new_order` must be a permutation of the enabled column ids. Every
    /// tuple is rebuilt by gathering its old slots in the new order.
    pub fn change_column_order(&mut self, new_order: &[ColumnId]) -> CoreResult<Vec<TableEvent>> {
        if new_order.len() != self.columns.len() {
            return Err(CoreError::InvalidColumnOrder(format!(
                "expected {} columns, got {}",
                self.columns.len(),
                new_order.len()
            )));
        }

        let mut old_indices = Vec::with_capacity(new_order.len());
        for &id in new_order {
            let old = self.enabled_index(id)?;
            if old_indices.contains(&old) {
                return Err(CoreError::InvalidColumnOrder(format!("column {} listed twice", id)));
            }
            old_indices.push(old);
        }

        for tuple in &mut self.tuples {
            tuple.reorder_elements(&old_indices);
        }
        // Disabled ids keep their positions; enabled ones take the new order
        let mut reordered = new_order.iter().copied();
        for id in &mut self.column_order {
            if self.columns.iter().any(|column| column.id() == *id) {
                if let Some(next) = reordered.next() {
                    *id = next;
                }
            }
        }
        let mut slots: Vec<Option<Column>> = std::mem::take(&mut self.columns)
            .into_iter()
            .map(Some)
            .collect();
        self.columns = old_indices
            .iter()
            .filter_map(|&old| slots[old].take())
            .collect();

        // Statistics and 2D histograms are keyed by column id and stay valid
        debug!("Reordered {} columns", self.columns.len());
        Ok(vec![TableEvent::ColumnOrderChanged])
    }

    /// Append a synthetic column pairing two enabled ordered columns.
    ///
    /// Every tuple gains a trailing pair element holding copies of its two
    /// source values. Returns the new column's id.
    pub fn add_bivariate_column(
        &mut self,
        first: ColumnId,
        second: ColumnId,
    ) -> CoreResult<(ColumnId, Vec<TableEvent>)> {
        let first_slot = self.bivariate_source(first)?;
        let second_slot = self.bivariate_source(second)?;

        let name = bivariate_name(self.columns[first_slot].name(), self.columns[second_slot].name());
        let id = ColumnId(self.next_column_id);
        self.next_column_id += 1;

        for tuple in &mut self.tuples {
            let pair = Value::pair(
                tuple.element(first_slot).clone(),
                tuple.element(second_slot).clone(),
            );
            tuple.add_element(pair);
        }

        let mut column = Column::bivariate(name, first, second);
        column.assign_id(id);
        let index = self.columns.len();
        let tuples = &self.tuples;
        column.calculate_statistics(
            tuples.iter().map(|tuple| tuple.element(index)),
            self.num_histogram_bins,
        );
        let handle = column.handle();
        self.columns.push(column);
        self.column_order.push(id);
        self.refresh_query_statistics();

        info!("Added bivariate column '{}'", handle.name);
        Ok((id, vec![TableEvent::BivariateColumnAdded { column: handle, index }]))
    }

    /// Swap the two sources of a bivariate column and the halves of every
    /// tuple's pair element
    pub fn swap_bivariate_columns(&mut self, id: ColumnId) -> CoreResult<Vec<TableEvent>> {
        let slot = self.enabled_index(id)?;
        let (first, second) = match self.columns[slot].as_bivariate() {
            Some(bivariate) => (bivariate.first(), bivariate.second()),
            None => return Err(CoreError::NotBivariate(id)),
        };

        for tuple in &mut self.tuples {
            if let Some(pair) = tuple.element_mut(slot).as_pair_mut() {
                std::mem::swap(&mut pair.0, &mut pair.1);
            }
        }

        let renamed = match (self.column(first), self.column(second)) {
            (Some(a), Some(b)) if self.columns[slot].name() == bivariate_name(a.name(), b.name()) => {
                Some(bivariate_name(b.name(), a.name()))
            }
            _ => None,
        };

        let column = &mut self.columns[slot];
        if let Some(bivariate) = column.as_bivariate_mut() {
            bivariate.swap();
        }
        match renamed {
            Some(name) => {
                column.set_name(name);
                Ok(vec![TableEvent::ColumnNameChanged(column.handle())])
            }
            None => Ok(Vec::new()),
        }
    }

    /// Move slot `slot` of every tuple into the side table and park the column
    fn detach_column(&mut self, slot: usize) -> ColumnHandle {
        for (tuple, side) in self.tuples.iter_mut().zip(&mut self.disabled_column_tuples) {
            side.add_element(tuple.remove_element(slot));
        }
        let mut column = self.columns.remove(slot);
        column.set_enabled(false);
        column.clear_focus_context();
        let handle = column.handle();
        self.disabled_columns.push(column);
        info!("Disabled column '{}'", handle.name);
        handle
    }

    /// Drop selections and highlight of detached columns, then repartition
    fn after_detach(&mut self, handles: &[ColumnHandle]) -> Vec<TableEvent> {
        let mut events = Vec::new();
        for handle in handles {
            if !self.active_query.remove_column_selections(handle.id).is_empty() {
                events.push(TableEvent::SelectionsForColumnRemoved(handle.clone()));
            }
            if self.highlighted_column == Some(handle.id) {
                self.highlighted_column = None;
                events.push(TableEvent::HighlightedColumnChanged {
                    old: Some(handle.clone()),
                    new: None,
                });
            }
        }

        self.recalculate_histograms_2d();
        self.refresh_query();
        events.push(TableEvent::StatisticsChanged);
        events
    }

    /// Number of enabled columns ahead of `id` in the column order
    fn restore_slot(&self, id: ColumnId) -> usize {
        self.column_order
            .iter()
            .take_while(|&&other| other != id)
            .filter(|&&other| self.column_index(other).is_some())
            .count()
    }

    fn bivariate_source(&self, id: ColumnId) -> CoreResult<usize> {
        let slot = self.enabled_index(id)?;
        let kind = self.columns[slot].value_kind();
        match kind {
            ValueKind::Double | ValueKind::Temporal => Ok(slot),
            _ => Err(CoreError::InvalidBivariateSource { column: id, kind }),
        }
    }
}

fn bivariate_name(first: &str, second: &str) -> String {
    format!("{} vs {}", first, second)
}
