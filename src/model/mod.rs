//! Data model for tabular data representation

mod columns;
mod range;
mod schema;
mod table;

pub use columns::ColumnSet;
pub use range::{column_letter_to_index, ColumnRange, RowRange};
pub use schema::{CellType, Column};
pub use table::{CellValue, Row, RowIter, RowRef, Table, TableBuilder, TableSlice};
