use chrono::{DateTime, Duration, Utc};
use lv_core::ColumnId;

use crate::histogram::{Histogram2DDimension, TemporalHistogram};
use crate::query::QueryId;

/// Extent and histogram of a column of instants
#[derive(Debug, Clone)]
pub struct TemporalColumnSummaryStats {
    column: ColumnId,
    name: String,
    num_bins: usize,
    query: Option<QueryId>,
    values: Vec<DateTime<Utc>>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    histogram: Option<TemporalHistogram>,
}

impl TemporalColumnSummaryStats {
    pub fn new(column: ColumnId, name: &str, num_bins: usize, query: Option<QueryId>) -> Self {
        Self {
            column,
            name: name.to_string(),
            num_bins,
            query,
            values: Vec::new(),
            start: None,
            end: None,
            histogram: None,
        }
    }

    pub fn set_values(&mut self, values: Vec<DateTime<Utc>>) {
        self.values = values;
        self.start = self.values.iter().min().copied();
        self.end = self.values.iter().max().copied();
        self.calculate_histogram();
    }

    fn calculate_histogram(&mut self) {
        self.histogram = match (self.start, self.end) {
            (Some(start), Some(end)) => Some(TemporalHistogram::with_range(
                self.name.clone(),
                &self.values,
                self.num_bins,
                start,
                end,
            )),
            _ => None,
        };
    }

    pub fn set_num_histogram_bins(&mut self, num_bins: usize) {
        self.num_bins = num_bins;
        self.calculate_histogram();
    }

    pub fn histogram_2d_dimension(&self, num_bins: usize) -> Option<Histogram2DDimension> {
        Some(Histogram2DDimension::temporal(num_bins, self.start?, self.end?))
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
        self.values.len()
    }

    /// Earliest instant
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Latest instant
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn span(&self) -> Option<Duration> {
        Some(self.end? - self.start?)
    }

    pub fn histogram(&self) -> Option<&TemporalHistogram> {
        self.histogram.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;
    use chrono::TimeZone;

    #[test]
    fn test_start_and_end() {
        let t = |h| Utc.with_ymd_and_hms(2022, 6, 1, h, 0, 0).unwrap();
        let mut stats = TemporalColumnSummaryStats::new(ColumnId(2), "when", 3, None);
        stats.set_values(vec![t(5), t(1), t(9)]);
        assert_eq!(stats.start(), Some(t(1)));
        assert_eq!(stats.end(), Some(t(9)));
        assert_eq!(stats.span(), Some(Duration::hours(8)));
        assert_eq!(stats.histogram().map(|h| h.total_count()), Some(3));

        stats.set_values(Vec::new());
        assert!(stats.start().is_none());
        assert!(stats.histogram_2d_dimension(3).is_none());
    }
}
