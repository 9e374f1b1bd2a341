//! Parquet file loader

use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, ArrowPrimitiveType, AsArray, PrimitiveArray};
use arrow::datatypes::{
    DataType as ArrowType, Date32Type, Float32Type, Float64Type, Int16Type, Int32Type,
    Int64Type, Int8Type, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType, UInt16Type, UInt32Type, UInt64Type,
    UInt8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::debug;

use crate::config::Config;
use crate::error::{QueryError, Result};
use crate::model::{CellType, CellValue, Table, TableBuilder};

use super::{check_single_sheet, ensure_exists, file_sheet_name, header_columns, TableLoader};

/// Days between 0001-01-01 and the Unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Loader for Parquet files; the file is a single sheet named after its stem
pub struct ParquetLoader;

impl TableLoader for ParquetLoader {
    fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        ensure_exists(path)?;
        check_single_sheet(path, config)?;

        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema().clone();
        let reader = builder.build()?;

        // Declared types come from the Arrow schema
        let columns = header_columns(schema.fields().iter().map(|f| f.name().clone()))
            .into_iter()
            .zip(schema.fields().iter())
            .map(|(column, field)| column.typed(arrow_type_to_cell_type(field.data_type())))
            .collect();
        let mut table = TableBuilder::new(columns)?;

        for batch in reader {
            let batch = batch?;
            for row_idx in 0..batch.num_rows() {
                let cells = batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell_value(col, row_idx))
                    .collect::<Result<Vec<_>>>()?;
                table.push_row(cells)?;
            }
        }

        let table = table.build();
        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded parquet table"
        );
        Ok(table)
    }

    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        ensure_exists(path)?;
        Ok(vec![file_sheet_name(path)])
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "parquet" | "pq")
    }
}

fn arrow_type_to_cell_type(arrow_type: &ArrowType) -> CellType {
    match arrow_type {
        ArrowType::Null => CellType::Null,
        ArrowType::Boolean => CellType::Bool,
        ArrowType::Int8
        | ArrowType::Int16
        | ArrowType::Int32
        | ArrowType::Int64
        | ArrowType::UInt8
        | ArrowType::UInt16
        | ArrowType::UInt32
        | ArrowType::UInt64 => CellType::Int,
        ArrowType::Float16 | ArrowType::Float32 | ArrowType::Float64 => CellType::Float,
        ArrowType::Utf8 | ArrowType::LargeUtf8 => CellType::String,
        ArrowType::Date32 => CellType::Date,
        ArrowType::Timestamp(_, _) => CellType::DateTime,
        _ => CellType::String, // Fallback to string for complex types
    }
}

fn primitive<T: ArrowPrimitiveType>(array: &ArrayRef) -> Result<&PrimitiveArray<T>> {
    array.as_primitive_opt::<T>().ok_or_else(|| mismatch(array))
}

fn mismatch(array: &ArrayRef) -> QueryError {
    QueryError::Source(format!(
        "parquet column does not match its declared type {}",
        array.data_type()
    ))
}

fn extract_cell_value(array: &ArrayRef, row_idx: usize) -> Result<CellValue> {
    if array.is_null(row_idx) {
        return Ok(CellValue::Null);
    }

    let cell = match array.data_type() {
        ArrowType::Boolean => {
            let arr = array.as_boolean_opt().ok_or_else(|| mismatch(array))?;
            CellValue::Bool(arr.value(row_idx))
        }
        ArrowType::Int8 => CellValue::Int(primitive::<Int8Type>(array)?.value(row_idx) as i64),
        ArrowType::Int16 => CellValue::Int(primitive::<Int16Type>(array)?.value(row_idx) as i64),
        ArrowType::Int32 => CellValue::Int(primitive::<Int32Type>(array)?.value(row_idx) as i64),
        ArrowType::Int64 => CellValue::Int(primitive::<Int64Type>(array)?.value(row_idx)),
        ArrowType::UInt8 => CellValue::Int(primitive::<UInt8Type>(array)?.value(row_idx) as i64),
        ArrowType::UInt16 => {
            CellValue::Int(primitive::<UInt16Type>(array)?.value(row_idx) as i64)
        }
        ArrowType::UInt32 => {
            CellValue::Int(primitive::<UInt32Type>(array)?.value(row_idx) as i64)
        }
        ArrowType::UInt64 => {
            let v = primitive::<UInt64Type>(array)?.value(row_idx);
            // Values past i64::MAX keep every digit as text
            i64::try_from(v).map_or_else(
                |_| CellValue::String(Cow::Owned(v.to_string())),
                CellValue::Int,
            )
        }
        ArrowType::Float32 => {
            CellValue::Float(primitive::<Float32Type>(array)?.value(row_idx) as f64)
        }
        ArrowType::Float64 => CellValue::Float(primitive::<Float64Type>(array)?.value(row_idx)),
        ArrowType::Utf8 => {
            let arr = array.as_string_opt::<i32>().ok_or_else(|| mismatch(array))?;
            CellValue::String(Cow::Owned(arr.value(row_idx).to_string()))
        }
        ArrowType::LargeUtf8 => {
            let arr = array.as_string_opt::<i64>().ok_or_else(|| mismatch(array))?;
            CellValue::String(Cow::Owned(arr.value(row_idx).to_string()))
        }
        ArrowType::Date32 => {
            let days = primitive::<Date32Type>(array)?.value(row_idx);
            match days
                .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                .and_then(chrono::NaiveDate::from_num_days_from_ce_opt)
            {
                Some(date) => CellValue::Date(date),
                None => CellValue::Int(days as i64),
            }
        }
        ArrowType::Timestamp(unit, _) => {
            let (raw, per_second) = match unit {
                TimeUnit::Second => (primitive::<TimestampSecondType>(array)?.value(row_idx), 1),
                TimeUnit::Millisecond => (
                    primitive::<TimestampMillisecondType>(array)?.value(row_idx),
                    1_000,
                ),
                TimeUnit::Microsecond => (
                    primitive::<TimestampMicrosecondType>(array)?.value(row_idx),
                    1_000_000,
                ),
                TimeUnit::Nanosecond => (
                    primitive::<TimestampNanosecondType>(array)?.value(row_idx),
                    1_000_000_000,
                ),
            };
            let secs = raw.div_euclid(per_second);
            let nanos = (raw.rem_euclid(per_second) * (1_000_000_000 / per_second)) as u32;
            match chrono::DateTime::from_timestamp(secs, nanos) {
                Some(dt) => CellValue::DateTime(dt.naive_utc()),
                None => CellValue::Int(raw),
            }
        }
        _ => {
            // Fallback: convert to string
            let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
            CellValue::String(Cow::Owned(formatter.value(row_idx).to_string()))
        }
    };

    Ok(cell)
}
