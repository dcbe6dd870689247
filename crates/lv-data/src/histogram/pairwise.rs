use tracing::debug;

use super::{Histogram2D, Histogram2DSet};
use crate::column::Column;
use crate::tuple::Tuple;

/// Bin every ordered pair of distinct ordered columns against each other.
///
/// `columns` are the enabled columns in tuple-slot order. Each axis uses the
/// column's whole-table extent, so query partitions share bins with the
/// full table. `(j, i)` is the transpose of `(i, j)` and is derived rather
/// than binned a second time. Restrict to `rows` when given.
pub fn calculate_column_2d_histograms(
    columns: &[Column],
    tuples: &[Tuple],
    rows: Option<&[usize]>,
    num_bins: usize,
    epsilon: f64,
) -> Histogram2DSet {
    let selected: Vec<&Tuple> = match rows {
        Some(rows) => rows.iter().map(|&row| &tuples[row]).collect(),
        None => tuples.iter().collect(),
    };

    let axes: Vec<_> = columns
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            let dimension = column.statistics()?.histogram_2d_dimension(num_bins)?;
            Some((index, column.id(), dimension))
        })
        .collect();

    let mut set = Histogram2DSet::new();
    for (a, (x_index, x_id, x_dimension)) in axes.iter().enumerate() {
        for (y_index, y_id, y_dimension) in axes.iter().skip(a + 1) {
            let histogram = Histogram2D::compute(
                *x_id,
                x_dimension.clone(),
                *y_id,
                y_dimension.clone(),
                selected
                    .iter()
                    .map(|tuple| (tuple.element(*x_index), tuple.element(*y_index))),
                epsilon,
            );
            set.insert(histogram.transposed());
            set.insert(histogram);
        }
    }

    debug!(
        "Calculated {} 2D histograms over {} rows (max bin count {})",
        set.len(),
        selected.len(),
        set.max_bin_count()
    );
    set
}
