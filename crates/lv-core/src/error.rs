use thiserror::Error;

use crate::selection::SelectionId;
use crate::value::{ColumnId, ValueKind};

/// Errors raised at the table boundary.
///
/// Positional tuple access out of range is not represented here: it is a
/// caller bug and panics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown column: {0}")]
    UnknownColumn(ColumnId),

    #[error("Column {0} is disabled")]
    ColumnDisabled(ColumnId),

    #[error("Column {0} is already enabled")]
    ColumnAlreadyEnabled(ColumnId),

    #[error("Cannot add tuples while {0} column(s) are disabled")]
    DisabledColumnsPresent(usize),

    #[error("Tuple {row} has {found} elements, expected {expected}")]
    ArityMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Tuple {row}, column '{column}': expected {expected:?} value, found {found:?}")]
    TypeMismatch {
        row: usize,
        column: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Inverted selection range: {0}")]
    InvertedRange(String),

    #[error("Invalid column order: {0}")]
    InvalidColumnOrder(String),

    #[error("Unknown selection: {0}")]
    UnknownSelection(SelectionId),

    #[error("Column {column} of kind {kind:?} cannot carry this selection")]
    NotSelectable { column: ColumnId, kind: ValueKind },

    #[error("Column {0} is not bivariate")]
    NotBivariate(ColumnId),

    #[error("Column {column} of kind {kind:?} cannot be part of a bivariate column")]
    InvalidBivariateSource { column: ColumnId, kind: ValueKind },

    #[error("Histogram bin count must be positive")]
    InvalidBinCount,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::Config(error.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
