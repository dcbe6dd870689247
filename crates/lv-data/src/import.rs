//! Arrow record batch import
//!
//! Numeric columns become double columns, string-like columns become
//! categorical columns and timestamp or date columns become temporal
//! columns. Null numbers import as NaN and null strings as the empty
//! category; a null instant has no stand-in and is rejected.

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, TimeUnit};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, TimeZone, Utc};
use lv_core::{CoreError, TableEvent, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::column::Column;
use crate::table::DataTable;
use crate::tuple::Tuple;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Column '{column}' has unsupported type {data_type}")]
    UnsupportedType { column: String, data_type: DataType },

    #[error("Column '{column}' has a null instant at row {row}")]
    NullInstant { column: String, row: usize },

    #[error("Column '{column}' has an out-of-range instant at row {row}")]
    InstantOutOfRange { column: String, row: usize },

    #[error(transparent)]
    Table(#[from] CoreError),
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Convert a record batch into columns and tuples ready for
/// [`DataTable::set_data`]
pub fn from_record_batch(batch: &RecordBatch) -> ImportResult<(Vec<Column>, Vec<Tuple>)> {
    let schema = batch.schema();
    let mut columns = Vec::with_capacity(batch.num_columns());
    let mut column_values = Vec::with_capacity(batch.num_columns());

    for (field, array) in schema.fields().iter().zip(batch.columns()) {
        let (column, values) = import_column(field.name(), array)?;
        debug!("Imported column '{}' as {:?}", field.name(), column.value_kind());
        columns.push(column);
        column_values.push(values.into_iter());
    }

    let tuples = (0..batch.num_rows())
        .map(|_| Tuple::from_elements(column_values.iter_mut().filter_map(Iterator::next).collect()))
        .collect();
    Ok((columns, tuples))
}

impl DataTable {
    /// Replace the table with the contents of a record batch
    pub fn set_record_batch(&mut self, batch: &RecordBatch) -> ImportResult<Vec<TableEvent>> {
        let (columns, tuples) = from_record_batch(batch)?;
        info!(
            "Loading record batch: {} rows, {} columns",
            batch.num_rows(),
            batch.num_columns()
        );
        Ok(self.set_data(columns, tuples)?)
    }
}

fn import_column(name: &str, array: &ArrayRef) -> ImportResult<(Column, Vec<Value>)> {
    let data_type = array.data_type();
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Boolean | DataType::Dictionary(_, _) => {
            let strings = cast(array, &DataType::Utf8)?;
            let strings = downcast::<StringArray>(name, &strings)?;
            let values = strings
                .iter()
                .map(|v| Value::Categorical(v.unwrap_or_default().to_string()))
                .collect();
            Ok((Column::categorical(name), values))
        }
        DataType::Timestamp(unit, _) => {
            let millis = import_millis(name, array, unit)?;
            Ok((Column::temporal(name), millis))
        }
        DataType::Date32 | DataType::Date64 => {
            let dates = cast(array, &DataType::Date64)?;
            let millis = import_millis(name, &dates, &TimeUnit::Millisecond)?;
            Ok((Column::temporal(name), millis))
        }
        dt if dt.is_numeric() => {
            let floats = cast(array, &DataType::Float64)?;
            let floats = downcast::<Float64Array>(name, &floats)?;
            let values = floats
                .iter()
                .map(|v| Value::Double(v.unwrap_or(f64::NAN)))
                .collect();
            Ok((Column::double(name), values))
        }
        _ => Err(ImportError::UnsupportedType {
            column: name.to_string(),
            data_type: data_type.clone(),
        }),
    }
}

/// Read a timestamp-like array as instants; raw values count `unit`s since
/// the Unix epoch
fn import_millis(name: &str, array: &ArrayRef, unit: &TimeUnit) -> ImportResult<Vec<Value>> {
    let raw = cast(array, &DataType::Int64)?;
    let raw = downcast::<Int64Array>(name, &raw)?;
    raw.iter()
        .enumerate()
        .map(|(row, v)| {
            let v = v.ok_or_else(|| ImportError::NullInstant {
                column: name.to_string(),
                row,
            })?;
            to_instant(v, unit)
                .map(Value::Temporal)
                .ok_or_else(|| ImportError::InstantOutOfRange {
                    column: name.to_string(),
                    row,
                })
        })
        .collect()
}

fn to_instant(value: i64, unit: &TimeUnit) -> Option<DateTime<Utc>> {
    let millis = match unit {
        TimeUnit::Second => value.checked_mul(1_000)?,
        TimeUnit::Millisecond => value,
        TimeUnit::Microsecond => value.div_euclid(1_000),
        TimeUnit::Nanosecond => value.div_euclid(1_000_000),
    };
    Utc.timestamp_millis_opt(millis).single()
}

fn downcast<'a, T: 'static>(name: &str, array: &'a ArrayRef) -> ImportResult<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ImportError::UnsupportedType {
            column: name.to_string(),
            data_type: array.data_type().clone(),
        })
}
