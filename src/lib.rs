//! sheetquery - Spreadsheet-style queries over tabular data
//!
//! Load a sheet from a workbook or data file (Excel, CSV, Parquet, JSON), cut
//! out a block of rows the way a spreadsheet range does, and run
//! distinct counts, VLOOKUP-style lookups and dense rankings over it.
//!
//! ```no_run
//! use sheetquery::{count_distinct, load, slice, RowRange};
//!
//! let table = load("pumps.xlsx", Some("Sheet1"))?;
//! let rows = slice(&table, RowRange::new(2, 15)?);
//! let models = count_distinct(rows, "Model")?;
//! # Ok::<(), sheetquery::QueryError>(())
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod query;

pub use config::{Config, RangePolicy};
pub use error::{QueryError, Result};
pub use loader::{load, load_with_config, sheet_names, LoaderFactory, TableLoader};
pub use model::{CellValue, ColumnRange, ColumnSet, RowRange, RowRef, Table, TableSlice};
pub use query::{
    count_distinct, distinct_values, group_ranks, lookup, lookup_row, rank_groups, rank_rows,
    ranked_rows, slice, vlookup, vlookup_with, CellComparator, RangeSlicer, RankedGroup, RankedRow,
    SortKey, SortOrder, TextComparator, ValueComparator,
};
