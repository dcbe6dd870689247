//! Per-column summary statistics
//!
//! A statistics object summarizes one column over either the whole table
//! (`query == None`) or one partition of a query. Setting values recomputes
//! the statistics and then the histogram.

mod bivariate;
mod categorical;
mod double;
mod temporal;

pub use bivariate::BivariateColumnSummaryStats;
pub use categorical::CategoricalColumnSummaryStats;
pub use double::DoubleColumnSummaryStats;
pub use temporal::TemporalColumnSummaryStats;

use lv_core::{ColumnId, Value, ValueKind};

use crate::histogram::{Histogram, Histogram2DDimension};
use crate::query::QueryId;

/// Statistics for one column, by column kind
#[derive(Debug, Clone)]
pub enum ColumnSummaryStats {
    Double(DoubleColumnSummaryStats),
    Categorical(CategoricalColumnSummaryStats),
    Temporal(TemporalColumnSummaryStats),
    Bivariate(BivariateColumnSummaryStats),
}

impl ColumnSummaryStats {
    /// Empty statistics for a column of `kind`; image columns have none
    pub fn new(
        column: ColumnId,
        name: &str,
        kind: ValueKind,
        num_bins: usize,
        query: Option<QueryId>,
    ) -> Option<Self> {
        let stats = match kind {
            ValueKind::Double => {
                ColumnSummaryStats::Double(DoubleColumnSummaryStats::new(column, name, num_bins, query))
            }
            ValueKind::Categorical => ColumnSummaryStats::Categorical(
                CategoricalColumnSummaryStats::new(column, name, num_bins, query),
            ),
            ValueKind::Temporal => ColumnSummaryStats::Temporal(TemporalColumnSummaryStats::new(
                column, name, num_bins, query,
            )),
            ValueKind::Bivariate => ColumnSummaryStats::Bivariate(
                BivariateColumnSummaryStats::new(column, name, num_bins, query),
            ),
            ValueKind::Image => return None,
        };
        Some(stats)
    }

    /// Replace the summarized values and recompute.
    ///
    /// Values of a different kind than the column are a loader bug; they are
    /// skipped.
    pub fn set_values<'a, I>(&mut self, values: I)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let values = values.into_iter();
        match self {
            ColumnSummaryStats::Double(stats) => {
                stats.set_values(values.filter_map(Value::as_f64).collect())
            }
            ColumnSummaryStats::Categorical(stats) => stats.set_values(
                values
                    .filter_map(|v| v.as_category().map(str::to_string))
                    .collect(),
            ),
            ColumnSummaryStats::Temporal(stats) => {
                stats.set_values(values.filter_map(Value::as_instant).collect())
            }
            ColumnSummaryStats::Bivariate(stats) => stats.set_values(values.count()),
        }
    }

    pub fn column(&self) -> ColumnId {
        match self {
            ColumnSummaryStats::Double(s) => s.column(),
            ColumnSummaryStats::Categorical(s) => s.column(),
            ColumnSummaryStats::Temporal(s) => s.column(),
            ColumnSummaryStats::Bivariate(s) => s.column(),
        }
    }

    /// Owning query, `None` for whole-table statistics
    pub fn query(&self) -> Option<QueryId> {
        match self {
            ColumnSummaryStats::Double(s) => s.query(),
            ColumnSummaryStats::Categorical(s) => s.query(),
            ColumnSummaryStats::Temporal(s) => s.query(),
            ColumnSummaryStats::Bivariate(s) => s.query(),
        }
    }

    pub fn num_histogram_bins(&self) -> usize {
        match self {
            ColumnSummaryStats::Double(s) => s.num_histogram_bins(),
            ColumnSummaryStats::Categorical(s) => s.num_histogram_bins(),
            ColumnSummaryStats::Temporal(s) => s.num_histogram_bins(),
            ColumnSummaryStats::Bivariate(s) => s.num_histogram_bins(),
        }
    }

    /// Change the bin count and rebuild the histogram only
    pub fn set_num_histogram_bins(&mut self, num_bins: usize) {
        match self {
            ColumnSummaryStats::Double(s) => s.set_num_histogram_bins(num_bins),
            ColumnSummaryStats::Categorical(s) => s.set_num_histogram_bins(num_bins),
            ColumnSummaryStats::Temporal(s) => s.set_num_histogram_bins(num_bins),
            ColumnSummaryStats::Bivariate(s) => s.set_num_histogram_bins(num_bins),
        }
    }

    /// Number of values summarized (NaN excluded)
    pub fn count(&self) -> usize {
        match self {
            ColumnSummaryStats::Double(s) => s.count(),
            ColumnSummaryStats::Categorical(s) => s.count(),
            ColumnSummaryStats::Temporal(s) => s.count(),
            ColumnSummaryStats::Bivariate(s) => s.count(),
        }
    }

    pub fn histogram(&self) -> Option<&dyn Histogram> {
        match self {
            ColumnSummaryStats::Double(s) => s.histogram().map(|h| h as &dyn Histogram),
            ColumnSummaryStats::Categorical(s) => s.histogram().map(|h| h as &dyn Histogram),
            ColumnSummaryStats::Temporal(s) => s.histogram().map(|h| h as &dyn Histogram),
            ColumnSummaryStats::Bivariate(_) => None,
        }
    }

    /// Axis binning for the pairwise pass; only ordered, non-empty columns
    pub fn histogram_2d_dimension(&self, num_bins: usize) -> Option<Histogram2DDimension> {
        match self {
            ColumnSummaryStats::Double(s) => s.histogram_2d_dimension(num_bins),
            ColumnSummaryStats::Temporal(s) => s.histogram_2d_dimension(num_bins),
            ColumnSummaryStats::Categorical(_) | ColumnSummaryStats::Bivariate(_) => None,
        }
    }

    pub fn as_double(&self) -> Option<&DoubleColumnSummaryStats> {
        match self {
            ColumnSummaryStats::Double(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalColumnSummaryStats> {
        match self {
            ColumnSummaryStats::Categorical(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&TemporalColumnSummaryStats> {
        match self {
            ColumnSummaryStats::Temporal(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bivariate(&self) -> Option<&BivariateColumnSummaryStats> {
        match self {
            ColumnSummaryStats::Bivariate(s) => Some(s),
            _ => None,
        }
    }
}
