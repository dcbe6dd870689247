use lv_core::ColumnId;

use crate::query::QueryId;

/// Placeholder statistics for a bivariate column.
///
/// Its distribution is described by the 2D histogram of its two source
/// columns, so nothing is computed here beyond the value count.
#[derive(Debug, Clone)]
pub struct BivariateColumnSummaryStats {
    column: ColumnId,
    num_bins: usize,
    query: Option<QueryId>,
    count: usize,
}

impl BivariateColumnSummaryStats {
    pub fn new(column: ColumnId, _name: &str, num_bins: usize, query: Option<QueryId>) -> Self {
        Self {
            column,
            num_bins,
            query,
            count: 0,
        }
    }

    pub fn set_values(&mut self, count: usize) {
        self.count = count;
    }

    pub fn set_num_histogram_bins(&mut self, num_bins: usize) {
        self.num_bins = num_bins;
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    pub fn query(&self) -> Option<QueryId> {
        self.query
    }

    pub fn num_histogram_bins(&self) -> usize {
        self.num_bins
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
