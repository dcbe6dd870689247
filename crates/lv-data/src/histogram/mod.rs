//! Histogram builders
//!
//! One-dimensional histograms bucket a single column's values; the 2D
//! helpers pair two ordered columns for correlation displays.

mod categorical;
mod dimension;
mod double;
mod pairwise;
mod temporal;

pub use categorical::CategoricalHistogram;
pub use dimension::{Histogram2D, Histogram2DDimension, Histogram2DSet};
pub use double::DoubleHistogram;
pub use pairwise::calculate_column_2d_histograms;
pub use temporal::TemporalHistogram;

/// Common view over every histogram kind
pub trait Histogram {
    /// Display name, usually the column name
    fn name(&self) -> &str;

    /// Per-bin counts in bin order
    fn counts(&self) -> &[usize];

    fn num_bins(&self) -> usize {
        self.counts().len()
    }

    /// Number of values that landed in a bin
    fn total_count(&self) -> usize {
        self.counts().iter().sum()
    }

    fn max_bin_count(&self) -> usize {
        self.counts().iter().copied().max().unwrap_or(0)
    }
}

/// Equal-width bin for `value` over the closed range `[min, max]`.
///
/// The maximum lands in the last bin; a zero-width range puts everything in
/// bin 0. Non-finite and out-of-range values have no bin.
pub(crate) fn equal_width_bin(value: f64, min: f64, max: f64, num_bins: usize) -> Option<usize> {
    if num_bins == 0 || !value.is_finite() || value < min || value > max {
        return None;
    }
    let width = (max - min) / num_bins as f64;
    if width <= 0.0 {
        return Some(0);
    }
    let bin = ((value - min) / width).floor() as usize;
    Some(bin.min(num_bins - 1))
}

/// Extent of the finite values, `None` when there are none
pub(crate) fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |extent, v| match extent {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
