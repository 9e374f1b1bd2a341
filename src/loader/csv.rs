//! CSV file loader

use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::error::{QueryError, Result};
use crate::model::{CellValue, Table, TableBuilder};

use super::{
    check_single_sheet, ensure_exists, file_sheet_name, header_columns, parse_temporal, TableLoader,
};

/// Loader for CSV/TSV files; the file is a single sheet named after its stem
pub struct CsvLoader;

impl CsvLoader {
    fn delimiter(path: &Path, config: &Config) -> u8 {
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
        if is_tsv && config.csv_delimiter == b',' {
            b'\t'
        } else {
            config.csv_delimiter
        }
    }
}

impl TableLoader for CsvLoader {
    fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        ensure_exists(path)?;
        check_single_sheet(path, config)?;

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(Self::delimiter(path, config))
            .from_reader(reader);

        // Read headers
        let headers = csv_reader.headers()?.clone();
        let mut builder = TableBuilder::new(header_columns(headers.iter().map(str::to_string)))?;
        let column_count = builder.column_count();

        for result in csv_reader.records() {
            let record = result?;
            let mut cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();
            // Empty fields past the last header column hold no data
            while cells.len() > column_count && cells.last().is_some_and(CellValue::is_null) {
                cells.pop();
            }
            if cells.len() > column_count {
                return Err(QueryError::Source(format!(
                    "{}: line {} has {} fields but the header has {} columns",
                    path.display(),
                    record.position().map_or(0, |pos| pos.line()),
                    cells.len(),
                    column_count
                )));
            }
            builder.push_row(cells)?;
        }

        let table = builder.build();
        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded csv table"
        );
        Ok(table)
    }

    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        ensure_exists(path)?;
        Ok(vec![file_sheet_name(path)])
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

/// Type a raw CSV field: null markers, booleans, numbers, dates, then text
fn parse_cell_value(s: &str) -> CellValue {
    let field = s.trim();

    match field {
        "" | "NA" => return CellValue::Null,
        _ if field.eq_ignore_ascii_case("null") => return CellValue::Null,
        _ if field.eq_ignore_ascii_case("true") => return CellValue::Bool(true),
        _ if field.eq_ignore_ascii_case("false") => return CellValue::Bool(false),
        _ => {}
    }

    if let Ok(i) = field.parse::<i64>() {
        CellValue::Int(i)
    } else if let Ok(f) = field.parse::<f64>() {
        CellValue::Float(f)
    } else {
        parse_temporal(field).unwrap_or_else(|| CellValue::String(Cow::Owned(field.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::model::CellType;

    fn write_csv(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(""), CellValue::Null);
        assert_eq!(parse_cell_value("null"), CellValue::Null);
        assert_eq!(parse_cell_value("true"), CellValue::Bool(true));
        assert_eq!(parse_cell_value("false"), CellValue::Bool(false));
        assert_eq!(parse_cell_value("42"), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.14"), CellValue::Float(3.14));
        assert_eq!(
            parse_cell_value("hello"),
            CellValue::String(Cow::Owned("hello".to_string()))
        );
        assert_eq!(
            parse_cell_value("2024-03-01"),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
    }

    #[test]
    fn test_load_csv() {
        let file = write_csv(".csv", "Id,Length,Note\nA,10,x\nB,20\nC,30,y,\n");
        let table = CsvLoader.load(file.path(), &Config::default()).unwrap();

        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Id", "Length", "Note"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(3, "Note").unwrap(), &CellValue::Null);
        assert_eq!(table.cell(4, "Length").unwrap(), &CellValue::Int(30));
        assert_eq!(table.column("Length").unwrap().inferred_type, CellType::Int);
    }

    #[test]
    fn test_surplus_field_is_an_error() {
        let file = write_csv(".csv", "Id,Length\nA,10\nB,20,SURPLUS\n");
        let err = CsvLoader.load(file.path(), &Config::default()).unwrap_err();
        match err {
            QueryError::Source(msg) => {
                assert!(msg.contains("line 3"), "{}", msg);
                assert!(msg.contains("3 fields"), "{}", msg);
            }
            other => panic!("expected source error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_tsv_uses_tab() {
        let file = write_csv(".tsv", "Id\tLength\nA\t1.5\n");
        let table = CsvLoader.load(file.path(), &Config::default()).unwrap();
        assert_eq!(table.cell(2, "Length").unwrap(), &CellValue::Float(1.5));
    }

    #[test]
    fn test_custom_delimiter() {
        let file = write_csv(".csv", "Id;Length\nA;7\n");
        let config = Config::new().with_csv_delimiter(b';');
        let table = CsvLoader.load(file.path(), &config).unwrap();
        assert_eq!(table.cell(2, "Length").unwrap(), &CellValue::Int(7));
    }

    #[test]
    fn test_unknown_sheet() {
        let file = write_csv(".csv", "Id\nA\n");
        let config = Config::new().with_sheet_name("Sheet9");
        assert!(matches!(
            CsvLoader.load(file.path(), &config),
            Err(QueryError::SheetNotFound(_))
        ));
    }
}
