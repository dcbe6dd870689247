use super::{equal_width_bin, finite_extent, Histogram};

/// Equal-width histogram over numeric values
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleHistogram {
    name: String,
    min: f64,
    max: f64,
    counts: Vec<usize>,
    nan_count: usize,
    out_of_range_count: usize,
}

impl DoubleHistogram {
    /// Bucket `values` over their own extent
    pub fn new(name: impl Into<String>, values: &[f64], num_bins: usize) -> Self {
        let (min, max) = finite_extent(values).unwrap_or((0.0, 0.0));
        Self::with_range(name, values, num_bins, min, max)
    }

    /// Bucket `values` over a fixed `[min, max]`; values outside are counted
    /// separately
    pub fn with_range(name: impl Into<String>, values: &[f64], num_bins: usize, min: f64, max: f64) -> Self {
        let num_bins = num_bins.max(1);
        let mut counts = vec![0; num_bins];
        let mut nan_count = 0;
        let mut out_of_range_count = 0;

        for &value in values {
            if !value.is_finite() {
                nan_count += 1;
                continue;
            }
            match equal_width_bin(value, min, max, num_bins) {
                Some(bin) => counts[bin] += 1,
                None => out_of_range_count += 1,
            }
        }

        Self {
            name: name.into(),
            min,
            max,
            counts,
            nan_count,
            out_of_range_count,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Half-open `[lo, hi)` bounds of a bin; the last bin also holds `max`
    pub fn bin_bounds(&self, bin: usize) -> (f64, f64) {
        let width = self.bin_width();
        let lo = self.min + width * bin as f64;
        let hi = if bin + 1 == self.counts.len() { self.max } else { lo + width };
        (lo, hi)
    }

    pub fn bin_index(&self, value: f64) -> Option<usize> {
        equal_width_bin(value, self.min, self.max, self.counts.len())
    }

    pub fn nan_count(&self) -> usize {
        self.nan_count
    }

    pub fn out_of_range_count(&self) -> usize {
        self.out_of_range_count
    }
}

impl Histogram for DoubleHistogram {
    fn name(&self) -> &str {
        &self.name
    }

    fn counts(&self) -> &[usize] {
        &self.counts
    }
}
