//! JSON loader
//!
//! Accepted shapes:
//! - an array of records: a single sheet named after the file stem
//! - an object whose values are all arrays of records: one sheet per key
//! - a single record object: a one-row sheet
//! - `.jsonl` / `.ndjson`: one record per line

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{QueryError, Result};
use crate::model::{CellValue, Table, TableBuilder};

use super::{ensure_exists, file_sheet_name, header_columns, parse_temporal, TableLoader};

/// Loader for JSON array files
pub struct JsonLoader;

/// Parsed document: sheet name to records
type Sheets = Vec<(String, Vec<Value>)>;

impl JsonLoader {
    fn read_sheets(path: &Path) -> Result<Sheets> {
        ensure_exists(path)?;
        let reader = BufReader::new(File::open(path)?);

        let is_lines = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_lowercase().as_str(), "jsonl" | "ndjson"));

        if is_lines {
            let mut records = Vec::new();
            for line in reader.lines() {
                let line = line?;
                if !line.trim().is_empty() {
                    records.push(serde_json::from_str(&line)?);
                }
            }
            return Ok(vec![(file_sheet_name(path), records)]);
        }

        let value: Value = serde_json::from_reader(reader)?;
        match value {
            Value::Array(arr) => Ok(vec![(file_sheet_name(path), arr)]),
            Value::Object(obj) if !obj.is_empty() && obj.values().all(Value::is_array) => {
                let sheets: IndexMap<String, Vec<Value>> =
                    serde_json::from_value(Value::Object(obj))?;
                Ok(sheets.into_iter().collect())
            }
            Value::Object(obj) => Ok(vec![(file_sheet_name(path), vec![Value::Object(obj)])]),
            _ => Err(QueryError::Source(
                "JSON must be an array or object".to_string(),
            )),
        }
    }
}

impl TableLoader for JsonLoader {
    fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        let sheets = Self::read_sheets(path)?;

        let (sheet_name, records) = match config.sheet_name {
            Some(ref wanted) => sheets
                .into_iter()
                .find(|(name, _)| name == wanted)
                .ok_or_else(|| QueryError::SheetNotFound(wanted.clone()))?,
            None => sheets
                .into_iter()
                .next()
                .ok_or_else(|| QueryError::SheetNotFound("<first sheet>".to_string()))?,
        };

        let table = records_to_table(&records)?;
        debug!(
            path = %path.display(),
            sheet = %sheet_name,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded json table"
        );
        Ok(table)
    }

    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        Ok(Self::read_sheets(path)?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "json" | "jsonl" | "ndjson")
    }
}

fn records_to_table(records: &[Value]) -> Result<Table> {
    // Collect all unique keys across all objects to build column list
    let mut column_names: IndexSet<&str> = IndexSet::new();
    for item in records {
        if let Value::Object(obj) = item {
            column_names.extend(obj.keys().map(String::as_str));
        }
    }
    if column_names.is_empty() && !records.is_empty() {
        column_names.insert("Value");
    }

    let mut builder = TableBuilder::new(header_columns(
        column_names.iter().map(|name| name.to_string()),
    ))?;

    for item in records {
        let cells = match item {
            Value::Object(obj) => column_names
                .iter()
                .map(|key| json_value_to_cell(obj.get(*key)))
                .collect(),
            // Non-object item in array: put in first column
            _ => vec![json_value_to_cell(Some(item))],
        };
        builder.push_row(cells)?;
    }

    Ok(builder.build())
}

fn json_value_to_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(Cow::Owned(n.to_string()))
            }
        }
        Some(Value::String(s)) => {
            parse_temporal(s).unwrap_or_else(|| CellValue::String(Cow::Owned(s.clone())))
        }
        // Nested values keep their JSON text
        Some(nested @ (Value::Array(_) | Value::Object(_))) => {
            CellValue::String(Cow::Owned(nested.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_to_table_unions_keys() {
        let records = vec![json!({"Id": "A", "Length": 10}), json!({"Id": "B", "HP": 2.5})];
        let table = records_to_table(&records).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Id", "Length", "HP"]);
        assert_eq!(table.cell(3, "Length").unwrap(), &CellValue::Null);
        assert_eq!(table.cell(3, "HP").unwrap(), &CellValue::Float(2.5));
    }

    #[test]
    fn test_scalar_records() {
        let records = vec![json!(1), json!("two")];
        let table = records_to_table(&records).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Value"]);
        assert_eq!(table.cell(3, "Value").unwrap(), &CellValue::from("two"));
    }

    #[test]
    fn test_empty_records() {
        let table = records_to_table(&[]).unwrap();
        assert_eq!(table.column_count(), 0);
    }

    fn write_json(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        use std::io::Write;
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_sheets_map() {
        let file = write_json(
            ".json",
            r#"{"Pumps": [{"Id": "P1"}], "Motors": [{"Id": "M1", "HP": 5}, {"Id": "M2", "HP": 7}]}"#,
        );
        assert_eq!(JsonLoader.sheet_names(file.path()).unwrap(), vec!["Pumps", "Motors"]);

        let first = JsonLoader.load(file.path(), &Config::default()).unwrap();
        assert_eq!(first.row_count(), 1);

        let motors = JsonLoader
            .load(file.path(), &Config::new().with_sheet_name("Motors"))
            .unwrap();
        assert_eq!(motors.cell(3, "HP").unwrap(), &CellValue::Int(7));

        assert!(matches!(
            JsonLoader.load(file.path(), &Config::new().with_sheet_name("Valves")),
            Err(QueryError::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_object_mixing_arrays_and_scalars_is_one_row() {
        let file = write_json(".json", r#"{"Tags": ["a", "b"], "Id": "A"}"#);
        assert_eq!(JsonLoader.sheet_names(file.path()).unwrap().len(), 1);

        let table = JsonLoader.load(file.path(), &Config::default()).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(2, "Tags").unwrap(), &CellValue::from(r#"["a","b"]"#));
        assert_eq!(table.cell(2, "Id").unwrap(), &CellValue::from("A"));
    }

    #[test]
    fn test_load_jsonl() {
        let file = write_json(".jsonl", "{\"Id\": \"A\"}\n\n{\"Id\": \"B\"}\n");
        let table = JsonLoader.load(file.path(), &Config::default()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(3, "Id").unwrap(), &CellValue::from("B"));
    }

    #[test]
    fn test_single_object() {
        let file = write_json(".json", r#"{"Id": "A", "Length": 3}"#);
        let table = JsonLoader.load(file.path(), &Config::default()).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(2, "Length").unwrap(), &CellValue::Int(3));
    }

    #[test]
    fn test_json_value_to_cell() {
        assert_eq!(json_value_to_cell(None), CellValue::Null);
        assert_eq!(json_value_to_cell(Some(&json!(7))), CellValue::Int(7));
        assert_eq!(json_value_to_cell(Some(&json!([1, 2]))), CellValue::from("[1,2]"));
        assert_eq!(
            json_value_to_cell(Some(&json!("2024-01-31"))),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
    }
}
