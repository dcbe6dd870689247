use lv_core::ColumnId;
use statrs::statistics::Statistics;

use crate::histogram::{DoubleHistogram, Histogram2DDimension};
use crate::query::QueryId;

/// Descriptive statistics and box-plot whiskers for a numeric column.
///
/// Variance and standard deviation are the sample (n - 1) estimators,
/// skewness and kurtosis the bias-corrected sample estimators (kurtosis is
/// excess kurtosis). Percentiles interpolate linearly between closest ranks
/// (the inclusive definition). NaN and infinite values are excluded from
/// everything and counted in [`nan_count`](Self::nan_count).
#[derive(Debug, Clone)]
pub struct DoubleColumnSummaryStats {
    column: ColumnId,
    name: String,
    num_bins: usize,
    query: Option<QueryId>,
    values: Vec<f64>,
    nan_count: usize,
    min: f64,
    max: f64,
    mean: f64,
    median: f64,
    variance: f64,
    std_dev: f64,
    percentile_25: f64,
    percentile_75: f64,
    skewness: f64,
    kurtosis: f64,
    upper_whisker: f64,
    lower_whisker: f64,
    histogram: Option<DoubleHistogram>,
}

impl DoubleColumnSummaryStats {
    pub fn new(column: ColumnId, name: &str, num_bins: usize, query: Option<QueryId>) -> Self {
        Self {
            column,
            name: name.to_string(),
            num_bins,
            query,
            values: Vec::new(),
            nan_count: 0,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            median: f64::NAN,
            variance: f64::NAN,
            std_dev: f64::NAN,
            percentile_25: f64::NAN,
            percentile_75: f64::NAN,
            skewness: f64::NAN,
            kurtosis: f64::NAN,
            upper_whisker: f64::NAN,
            lower_whisker: f64::NAN,
            histogram: None,
        }
    }

    pub fn set_values(&mut self, values: Vec<f64>) {
        let total = values.len();
        self.values = values.into_iter().filter(|v| v.is_finite()).collect();
        self.nan_count = total - self.values.len();
        self.calculate_statistics();
        self.calculate_histogram();
    }

    fn calculate_statistics(&mut self) {
        let n = self.values.len();
        if n == 0 {
            let empty = Self::new(self.column, &self.name, self.num_bins, self.query);
            *self = Self {
                nan_count: self.nan_count,
                ..empty
            };
            return;
        }

        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        self.min = sorted[0];
        self.max = sorted[n - 1];
        self.mean = Statistics::mean(self.values.iter());
        self.variance = if n > 1 { Statistics::variance(self.values.iter()) } else { 0.0 };
        self.std_dev = self.variance.sqrt();

        self.percentile_25 = percentile(&sorted, 25.0);
        self.median = percentile(&sorted, 50.0);
        self.percentile_75 = percentile(&sorted, 75.0);

        self.skewness = self.sample_skewness();
        self.kurtosis = self.sample_kurtosis();

        let iqr = self.percentile_75 - self.percentile_25;
        let upper_fence = self.percentile_75 + 1.5 * iqr;
        let lower_fence = self.percentile_25 - 1.5 * iqr;
        self.upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= upper_fence)
            .unwrap_or(self.max);
        self.lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= lower_fence)
            .unwrap_or(self.min);
    }

    fn standardized_moment_sum(&self, power: i32) -> f64 {
        self.values
            .iter()
            .map(|v| ((v - self.mean) / self.std_dev).powi(power))
            .sum()
    }

    fn sample_skewness(&self) -> f64 {
        let n = self.values.len() as f64;
        if self.values.len() < 3 {
            return f64::NAN;
        }
        if self.std_dev == 0.0 {
            return 0.0;
        }
        n / ((n - 1.0) * (n - 2.0)) * self.standardized_moment_sum(3)
    }

    fn sample_kurtosis(&self) -> f64 {
        let n = self.values.len() as f64;
        if self.values.len() < 4 {
            return f64::NAN;
        }
        if self.std_dev == 0.0 {
            return 0.0;
        }
        let scale = n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0));
        let correction = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
        scale * self.standardized_moment_sum(4) - correction
    }

    fn calculate_histogram(&mut self) {
        self.histogram = if self.values.is_empty() {
            None
        } else {
            Some(DoubleHistogram::with_range(
                self.name.clone(),
                &self.values,
                self.num_bins,
                self.min,
                self.max,
            ))
        };
    }

    pub fn set_num_histogram_bins(&mut self, num_bins: usize) {
        self.num_bins = num_bins;
        self.calculate_histogram();
    }

    pub fn histogram_2d_dimension(&self, num_bins: usize) -> Option<Histogram2DDimension> {
        if self.values.is_empty() {
            None
        } else {
            Some(Histogram2DDimension::double(num_bins, self.min, self.max))
        }
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

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn nan_count(&self) -> usize {
        self.nan_count
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn median(&self) -> f64 {
        self.median
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn percentile_25(&self) -> f64 {
        self.percentile_25
    }

    pub fn percentile_75(&self) -> f64 {
        self.percentile_75
    }

    pub fn iqr(&self) -> f64 {
        self.percentile_75 - self.percentile_25
    }

    pub fn skewness(&self) -> f64 {
        self.skewness
    }

    pub fn kurtosis(&self) -> f64 {
        self.kurtosis
    }

    pub fn upper_whisker(&self) -> f64 {
        self.upper_whisker
    }

    pub fn lower_whisker(&self) -> f64 {
        self.lower_whisker
    }

    pub fn histogram(&self) -> Option<&DoubleHistogram> {
        self.histogram.as_ref()
    }
}

/// Inclusive percentile of sorted, non-empty data using linear interpolation
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = (sorted.len() - 1) as f64 * p / 100.0;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}
