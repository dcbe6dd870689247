//! Data engine for the linked-brushing table
//! 
//! This crate provides the row store, the column family with its summary
//! statistics and histograms, the brushing query that partitions rows into
//! queried and non-queried sets, and an Arrow import adapter.

pub mod column;
pub mod histogram;
pub mod import;
pub mod query;
pub mod stats;
pub mod table;
pub mod tuple;

// Re-export commonly used types
pub use column::{
    BivariateColumn, CategoricalColumn, Column, ColumnKind, DoubleColumn, FocusClass, TemporalColumn,
};
pub use histogram::{
    calculate_column_2d_histograms, CategoricalHistogram, DoubleHistogram, Histogram, Histogram2D,
    Histogram2DDimension, Histogram2DSet, TemporalHistogram,
};
pub use import::{from_record_batch, ImportError, ImportResult};
pub use query::{Query, QueryId};
pub use stats::{
    BivariateColumnSummaryStats, CategoricalColumnSummaryStats, ColumnSummaryStats,
    DoubleColumnSummaryStats, TemporalColumnSummaryStats,
};
pub use table::DataTable;
pub use tuple::Tuple;
