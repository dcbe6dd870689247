use ahash::AHashMap;
use chrono::{DateTime, Utc};
use lv_core::{ColumnId, Value};
use ndarray::Array2;

use super::finite_extent;
use super::temporal::millis;

/// Binning strategy for one axis of a 2D histogram
#[derive(Debug, Clone, PartialEq)]
pub enum Histogram2DDimension {
    Double {
        num_bins: usize,
        min: f64,
        max: f64,
    },
    Temporal {
        num_bins: usize,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Histogram2DDimension {
    pub fn double(num_bins: usize, min: f64, max: f64) -> Self {
        Histogram2DDimension::Double {
            num_bins: num_bins.max(1),
            min,
            max,
        }
    }

    /// Range taken from the finite values; `None` if there are none
    pub fn double_from_values(num_bins: usize, values: &[f64]) -> Option<Self> {
        finite_extent(values).map(|(min, max)| Self::double(num_bins, min, max))
    }

    pub fn temporal(num_bins: usize, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Histogram2DDimension::Temporal {
            num_bins: num_bins.max(1),
            start,
            end,
        }
    }

    pub fn temporal_from_values(num_bins: usize, instants: &[DateTime<Utc>]) -> Option<Self> {
        let start = instants.iter().min()?;
        let end = instants.iter().max()?;
        Some(Self::temporal(num_bins, *start, *end))
    }

    pub fn num_bins(&self) -> usize {
        match self {
            Histogram2DDimension::Double { num_bins, .. } => *num_bins,
            Histogram2DDimension::Temporal { num_bins, .. } => *num_bins,
        }
    }

    fn bounds(&self) -> (f64, f64) {
        match self {
            Histogram2DDimension::Double { min, max, .. } => (*min, *max),
            Histogram2DDimension::Temporal { start, end, .. } => (millis(*start), millis(*end)),
        }
    }

    fn coordinate(&self, value: &Value) -> Option<f64> {
        match (self, value) {
            (Histogram2DDimension::Double { .. }, Value::Double(v)) if v.is_finite() => Some(*v),
            (Histogram2DDimension::Temporal { .. }, Value::Temporal(t)) => Some(millis(*t)),
            _ => None,
        }
    }

    /// Bin for `value` over the half-open range `[min, max)`.
    ///
    /// Values at `max`, or past it by no more than `epsilon` times the range
    /// span, fall into the last bin.
    pub fn bin_index(&self, value: &Value, epsilon: f64) -> Option<usize> {
        let x = self.coordinate(value)?;
        let (lo, hi) = self.bounds();
        let num_bins = self.num_bins();
        let span = hi - lo;
        let tolerance = epsilon * span.max(1.0);

        if x < lo {
            return None;
        }
        if span <= 0.0 {
            return if x - lo <= tolerance { Some(0) } else { None };
        }

        let bin = ((x - lo) / (span / num_bins as f64)).floor() as usize;
        if bin < num_bins {
            Some(bin)
        } else if x <= hi + tolerance {
            Some(num_bins - 1)
        } else {
            None
        }
    }
}

/// Joint bin counts of two columns, indexed `[x_bin, y_bin]`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram2D {
    x_column: ColumnId,
    y_column: ColumnId,
    x_dimension: Histogram2DDimension,
    y_dimension: Histogram2DDimension,
    counts: Array2<u64>,
    max_bin_count: u64,
}

impl Histogram2D {
    /// Bin `(x, y)` value pairs; pairs with an unbinnable half are skipped
    pub fn compute<'a, I>(
        x_column: ColumnId,
        x_dimension: Histogram2DDimension,
        y_column: ColumnId,
        y_dimension: Histogram2DDimension,
        pairs: I,
        epsilon: f64,
    ) -> Self
    where
        I: IntoIterator<Item = (&'a Value, &'a Value)>,
    {
        let mut counts = Array2::<u64>::zeros((x_dimension.num_bins(), y_dimension.num_bins()));
        for (x, y) in pairs {
            if let (Some(i), Some(j)) = (x_dimension.bin_index(x, epsilon), y_dimension.bin_index(y, epsilon)) {
                counts[[i, j]] += 1;
            }
        }
        let max_bin_count = counts.iter().copied().max().unwrap_or(0);

        Self {
            x_column,
            y_column,
            x_dimension,
            y_dimension,
            counts,
            max_bin_count,
        }
    }

    pub fn x_column(&self) -> ColumnId {
        self.x_column
    }

    pub fn y_column(&self) -> ColumnId {
        self.y_column
    }

    pub fn x_dimension(&self) -> &Histogram2DDimension {
        &self.x_dimension
    }

    pub fn y_dimension(&self) -> &Histogram2DDimension {
        &self.y_dimension
    }

    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    pub fn count(&self, x_bin: usize, y_bin: usize) -> u64 {
        self.counts[[x_bin, y_bin]]
    }

    pub fn total_count(&self) -> u64 {
        self.counts.sum()
    }

    pub fn max_bin_count(&self) -> u64 {
        self.max_bin_count
    }

    /// Same counts with the axes swapped
    pub fn transposed(&self) -> Self {
        Self {
            x_column: self.y_column,
            y_column: self.x_column,
            x_dimension: self.y_dimension.clone(),
            y_dimension: self.x_dimension.clone(),
            counts: self.counts.t().to_owned(),
            max_bin_count: self.max_bin_count,
        }
    }
}

/// All pairwise 2D histograms of one pass, keyed by `(x, y)` column
#[derive(Debug, Clone, Default)]
pub struct Histogram2DSet {
    histograms: AHashMap<(ColumnId, ColumnId), Histogram2D>,
    max_bin_count: u64,
}

impl Histogram2DSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, histogram: Histogram2D) {
        self.max_bin_count = self.max_bin_count.max(histogram.max_bin_count());
        self.histograms
            .insert((histogram.x_column(), histogram.y_column()), histogram);
    }

    pub fn get(&self, x: ColumnId, y: ColumnId) -> Option<&Histogram2D> {
        self.histograms.get(&(x, y))
    }

    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Largest bin count across every pair; normalizes renderer color scales
    pub fn max_bin_count(&self) -> u64 {
        self.max_bin_count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Histogram2D> {
        self.histograms.values()
    }

    pub fn clear(&mut self) {
        self.histograms.clear();
        self.max_bin_count = 0;
    }
}
