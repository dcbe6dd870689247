use indexmap::IndexMap;
use lv_core::ColumnId;

use crate::histogram::CategoricalHistogram;
use crate::query::QueryId;

/// Occurrence count per category label, rebuilt by a full pass on every
/// update
#[derive(Debug, Clone)]
pub struct CategoricalColumnSummaryStats {
    column: ColumnId,
    name: String,
    num_bins: usize,
    query: Option<QueryId>,
    category_counts: IndexMap<String, usize>,
    count: usize,
    histogram: Option<CategoricalHistogram>,
}

impl CategoricalColumnSummaryStats {
    pub fn new(column: ColumnId, name: &str, num_bins: usize, query: Option<QueryId>) -> Self {
        Self {
            column,
            name: name.to_string(),
            num_bins,
            query,
            category_counts: IndexMap::new(),
            count: 0,
            histogram: None,
        }
    }

    pub fn set_values(&mut self, values: Vec<String>) {
        self.count = values.len();
        self.category_counts.clear();
        for value in values {
            *self.category_counts.entry(value).or_insert(0) += 1;
        }
        self.calculate_histogram();
    }

    fn calculate_histogram(&mut self) {
        self.histogram = Some(CategoricalHistogram::from_counts(
            self.name.clone(),
            &self.category_counts,
        ));
    }

    /// Kept for uniformity; categorical histograms have one bin per label
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

    /// Counts in first-seen order
    pub fn category_counts(&self) -> &IndexMap<String, usize> {
        &self.category_counts
    }

    pub fn count_for(&self, category: &str) -> usize {
        self.category_counts.get(category).copied().unwrap_or(0)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category_counts.keys().map(String::as_str)
    }

    pub fn histogram(&self) -> Option<&CategoricalHistogram> {
        self.histogram.as_ref()
    }
}
