//! Table loaders for spreadsheet-like sources
//!
//! Each loader reads one source format into a [`Table`]. The first row of the
//! source supplies the column names. File handles and workbooks are owned by
//! the `load` call and dropped before it returns, on success and on error.

mod csv;
mod excel;
mod json;
mod parquet;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::error::{QueryError, Result};
use crate::model::{CellValue, Column, Table};

pub use self::csv::CsvLoader;
pub use self::excel::ExcelLoader;
pub use self::json::JsonLoader;
pub use self::parquet::ParquetLoader;

/// Trait for reading tabular sources into tables
pub trait TableLoader: Send + Sync {
    /// Load the sheet named in `config` (or the first sheet) from `path`
    fn load(&self, path: &Path, config: &Config) -> Result<Table>;

    /// Names of the sheets the source holds
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>>;

    /// Check if this loader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Picks a loader by file extension (or content, for extensionless files)
pub struct LoaderFactory {
    loaders: Vec<Box<dyn TableLoader>>,
}

impl Default for LoaderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderFactory {
    /// Create a factory with every built-in loader
    pub fn new() -> Self {
        Self {
            loaders: vec![
                Box::new(CsvLoader),
                Box::new(ExcelLoader),
                Box::new(ParquetLoader),
                Box::new(JsonLoader),
            ],
        }
    }

    /// Get a loader for the given file path
    pub fn get_loader(&self, path: &Path) -> Result<&dyn TableLoader> {
        ensure_exists(path)?;

        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => detect_format(path)?.to_string(),
        };

        self.loaders
            .iter()
            .find(|loader| loader.supports_extension(&ext))
            .map(|loader| loader.as_ref())
            .ok_or(QueryError::UnsupportedFormat(ext))
    }

    /// Load a table using the appropriate loader
    pub fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        self.get_loader(path)?.load(path, config)
    }

    /// List the sheets of a source
    pub fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        self.get_loader(path)?.sheet_names(path)
    }
}

/// Load `sheet` (or the first sheet) from the file at `path`
pub fn load(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Table> {
    let mut config = Config::default();
    if let Some(sheet) = sheet {
        config = config.with_sheet_name(sheet);
    }
    load_with_config(path, &config)
}

/// Load a table with full configuration
pub fn load_with_config(path: impl AsRef<Path>, config: &Config) -> Result<Table> {
    LoaderFactory::new().load(path.as_ref(), config)
}

/// List the sheets of the file at `path`
pub fn sheet_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    LoaderFactory::new().sheet_names(path.as_ref())
}

/// Detect file format from content (for files without extension)
pub fn detect_format(path: &Path) -> Result<&'static str> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; 64];
    let bytes_read = file.read(&mut buffer)?;
    let head = &buffer[..bytes_read];

    // Check for Parquet magic bytes
    if head.starts_with(b"PAR1") {
        return Ok("parquet");
    }

    // Check for Excel ZIP format (xlsx)
    if head.starts_with(b"PK\x03\x04") {
        return Ok("xlsx");
    }

    // Check for old Excel format (xls)
    if head.starts_with(b"\xD0\xCF\x11\xE0") {
        return Ok("xls");
    }

    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Ok("json");
    }

    // Default to CSV
    Ok("csv")
}

pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(QueryError::SourceNotFound(path.display().to_string()))
    }
}

/// Identifier of the only sheet in a single-table source (the file stem)
pub(crate) fn file_sheet_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Fail unless the requested sheet is the single sheet of `path`
pub(crate) fn check_single_sheet(path: &Path, config: &Config) -> Result<()> {
    match config.sheet_name.as_deref() {
        Some(requested) if requested != file_sheet_name(path) => {
            Err(QueryError::SheetNotFound(requested.to_string()))
        }
        _ => Ok(()),
    }
}

/// Date formats recognised in untyped text sources
const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Read an ISO-style date or datetime out of text
pub(crate) fn parse_temporal(s: &str) -> Option<CellValue> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| chrono::NaiveDate::parse_from_str(s, fmt).ok())
        .map(CellValue::Date)
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(CellValue::DateTime)
        })
}

/// Turn raw header cells into unique column definitions.
///
/// Blank headers become `Column{n}` (1-based position); a repeated name gets
/// a `_{n}` suffix.
pub(crate) fn header_columns<I>(raw: I) -> Vec<Column>
where
    I: IntoIterator<Item = String>,
{
    let mut taken = rustc_hash::FxHashSet::default();
    let mut columns = Vec::new();

    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Column{}", i + 1)
        } else {
            name.trim().to_string()
        };

        let mut candidate = base.clone();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }
        if candidate != base {
            debug!(header = %base, renamed = %candidate, "duplicate header renamed");
        }

        taken.insert(candidate.clone());
        columns.push(Column::new(candidate, i));
    }

    columns
}
