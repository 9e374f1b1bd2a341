//! Workbook loader (xlsx, xlsm, xlsb, xls, ods)

use std::borrow::Cow;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use tracing::debug;

use crate::config::Config;
use crate::error::{QueryError, Result};
use crate::model::{CellValue, Table, TableBuilder};

use super::{ensure_exists, header_columns, TableLoader};

/// Loader for Excel workbooks
pub struct ExcelLoader;

impl TableLoader for ExcelLoader {
    fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        ensure_exists(path)?;
        let mut workbook = open_workbook_auto(path)?;

        let sheets = workbook.sheet_names();
        let sheet_name = match config.sheet_name {
            Some(ref name) => {
                if !sheets.iter().any(|s| s == name) {
                    return Err(QueryError::SheetNotFound(name.clone()));
                }
                name.clone()
            }
            // Use first sheet
            None => sheets
                .first()
                .cloned()
                .ok_or_else(|| QueryError::SheetNotFound("<first sheet>".to_string()))?,
        };

        let range: Range<Data> = workbook.worksheet_range(&sheet_name)?;
        let table = range_to_table(&range)?;
        debug!(
            path = %path.display(),
            sheet = %sheet_name,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded worksheet"
        );
        Ok(table)
    }

    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        ensure_exists(path)?;
        let workbook = open_workbook_auto(path)?;
        Ok(workbook.sheet_names())
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm" | "xlsb")
    }
}

/// Build a table from a worksheet's used range; its first row is the header
fn range_to_table(range: &Range<Data>) -> Result<Table> {
    let mut rows = range.rows();

    let header_row = match rows.next() {
        Some(row) => row,
        None => return Ok(TableBuilder::new(Vec::new())?.build()),
    };
    let mut builder = TableBuilder::new(header_columns(header_row.iter().map(cell_to_string)))?;

    // Every row of a range is as wide as the header row
    for row in rows {
        builder.push_row(row.iter().map(convert_cell).collect())?;
    }

    Ok(builder.build())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::Float(f) => {
            // Check if it's actually an integer
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) if Some(dt.time()) == chrono::NaiveTime::from_hms_opt(0, 0, 0) => {
                CellValue::Date(dt.date())
            }
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::String(Cow::Owned(cell_to_string(cell))),
        },
        Data::DurationIso(s) => CellValue::String(Cow::Owned(s.clone())),
        Data::Error(e) => CellValue::String(Cow::Owned(format!("#{:?}", e))),
    }
}
