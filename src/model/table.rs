//! Table, Row, and Cell data structures

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

use super::schema::{CellType, Column};

/// A cell value with type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison, exact for every i64
            (CellValue::Int(a), CellValue::Float(b)) | (CellValue::Float(b), CellValue::Int(a)) => {
                compare_int_float(*a, *b) == Ordering::Equal
            }
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // An integral Float hashes as the Int it equals.
        match self {
            CellValue::Null => 0u8.hash(state),
            CellValue::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            CellValue::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            CellValue::Float(f) => match float_as_int(*f) {
                Some(i) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                None => {
                    6u8.hash(state);
                    float_bits(*f).hash(state);
                }
            },
            CellValue::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            CellValue::Date(d) => {
                4u8.hash(state);
                d.hash(state);
            }
            CellValue::DateTime(dt) => {
                5u8.hash(state);
                dt.hash(state);
            }
        }
    }
}

/// 2^63 as f64; every float in `[-I64_BOUND, I64_BOUND)` truncates to an i64 exactly
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The i64 an integral float equals, if any
fn float_as_int(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f)).then_some(f as i64)
}

fn float_bits(f: f64) -> u64 {
    if f.is_nan() {
        u64::MAX
    } else {
        f.to_bits()
    }
}

/// Compare an i64 with an f64 without rounding the integer
fn compare_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return Ordering::Less;
    }
    if f >= I64_BOUND {
        return Ordering::Less;
    }
    if f < -I64_BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    i.cmp(&(whole as i64)).then_with(|| {
        // Same integer part: the fraction decides
        if f > whole {
            Ordering::Less
        } else if f < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Total order used for ranking and sorting.
///
/// Values of different kinds order as Null < Bool < numbers < dates < strings.
/// Int and Float compare by exact numeric value (no rounding of large Ints),
/// NaN sorts after every other number, and a Date sorts just before a
/// DateTime at midnight of the same day.
impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::DateTime(b)) => a
                .and_hms_opt(0, 0, 0)
                .map_or(Ordering::Less, |midnight| midnight.cmp(b).then(Ordering::Less)),
            (CellValue::DateTime(a), CellValue::Date(b)) => b
                .and_hms_opt(0, 0, 0)
                .map_or(Ordering::Greater, |midnight| a.cmp(&midnight).then(Ordering::Greater)),
            (CellValue::Float(a), CellValue::Float(b)) => compare_numbers(*a, *b),
            (CellValue::Int(a), CellValue::Float(b)) => compare_int_float(*a, *b),
            (CellValue::Float(a), CellValue::Int(b)) => compare_int_float(*b, *a).reverse(),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Type of this value
    pub fn cell_type(&self) -> CellType {
        CellType::of(self)
    }

    fn number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Date(_) | CellValue::DateTime(_) => 3,
            CellValue::String(_) => 4,
        }
    }

    /// Read the value as a number; numeric strings are parsed
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            other => other.number(),
        }
    }

    /// Borrow the value as a string slice, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }

    /// Stringified value used for text comparisons and distinct counts.
    ///
    /// Same as [`display`](Self::display) except that an empty cell is `""`.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            other => other.display(),
        }
    }

    /// Compare with numeric tolerance
    pub fn equals_with_tolerance(&self, other: &Self, tolerance: f64) -> bool {
        match (self.number(), other.number()) {
            (Some(a), Some(b)) => (a - b).abs() <= tolerance,
            _ => self == other,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in column order
    cells: Vec<CellValue>,
    /// Spreadsheet row number (row 1 is the header, so data starts at 2)
    row_number: usize,
}

impl Row {
    /// Cell values in column order
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// Spreadsheet row number of this row
    pub fn row_number(&self) -> usize {
        self.row_number
    }
}

/// A read-only table of rows sharing one set of named columns
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    /// Column name to position
    column_index: IndexMap<String, usize>,
    rows: Vec<Row>,
}

impl Table {
    /// Start building a table with the given column names
    pub fn builder<I, S>(names: I) -> Result<TableBuilder>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, i))
            .collect();
        TableBuilder::new(columns)
    }

    /// Build a table from column names and row cells in one go
    pub fn from_rows<I, S>(names: I, rows: Vec<Vec<CellValue>>) -> Result<Table>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = Self::builder(names)?;
        for cells in rows {
            builder.push_row(cells)?;
        }
        Ok(builder.build())
    }

    /// Column definitions
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Whether the table has a column with this name
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at a zero-based position
    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|row| RowRef { table: self, row })
    }

    /// Iterate over all rows
    pub fn rows(&self) -> RowIter<'_> {
        self.all_rows().iter()
    }

    /// View over every row
    pub fn all_rows(&self) -> TableSlice<'_> {
        TableSlice {
            table: self,
            rows: &self.rows,
        }
    }

    /// View over `count` rows starting at zero-based `offset`, clamped to the table
    pub fn rows_at(&self, offset: usize, count: usize) -> TableSlice<'_> {
        let start = offset.min(self.rows.len());
        let end = offset.saturating_add(count).min(self.rows.len());
        TableSlice {
            table: self,
            rows: &self.rows[start..end],
        }
    }

    /// Cell at a spreadsheet row number (data starts at row 2) and column
    pub fn cell(&self, row_number: usize, column: &str) -> Result<&CellValue> {
        if row_number < 2 {
            return Err(QueryError::InvalidRange(format!(
                "row {} is not a data row; row 1 holds column names",
                row_number
            )));
        }
        let col_idx = self
            .column_index(column)
            .ok_or_else(|| QueryError::ColumnNotFound(column.to_string()))?;
        let row = self.rows.get(row_number - 2).ok_or(QueryError::OutOfBounds {
            requested: row_number,
            available: self.rows.len(),
        })?;
        Ok(&row.cells[col_idx])
    }
}

/// Collects rows before freezing them into a [`Table`]
#[derive(Debug)]
pub struct TableBuilder {
    columns: Vec<Column>,
    column_index: IndexMap<String, usize>,
    rows: Vec<Row>,
}

impl TableBuilder {
    /// Create a builder from column definitions.
    ///
    /// Names must be non-blank and unique. Column indices are reassigned by position.
    pub fn new(mut columns: Vec<Column>) -> Result<Self> {
        let mut column_index = IndexMap::with_capacity(columns.len());
        for (i, column) in columns.iter_mut().enumerate() {
            if column.name.trim().is_empty() {
                return Err(QueryError::InvalidArgument(format!(
                    "column {} has a blank name",
                    i + 1
                )));
            }
            if column_index.insert(column.name.clone(), i).is_some() {
                return Err(QueryError::InvalidArgument(format!(
                    "duplicate column name: {}",
                    column.name
                )));
            }
            column.index = i;
        }

        Ok(Self {
            columns,
            column_index,
            rows: Vec::new(),
        })
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Append a row; short rows are padded with nulls
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) -> Result<()> {
        if cells.len() > self.columns.len() {
            return Err(QueryError::InvalidArgument(format!(
                "row {} has {} cells but the table has {} columns",
                self.rows.len() + 2,
                cells.len(),
                self.columns.len()
            )));
        }
        cells.resize(self.columns.len(), CellValue::Null);

        let row_number = self.rows.len() + 2; // +2 for 1-indexing and header
        self.rows.push(Row { cells, row_number });
        Ok(())
    }

    /// Chaining form of [`push_row`](Self::push_row)
    pub fn row(mut self, cells: Vec<CellValue>) -> Result<Self> {
        self.push_row(cells)?;
        Ok(self)
    }

    /// Infer column types and freeze the table
    pub fn build(mut self) -> Table {
        for (col_idx, column) in self.columns.iter_mut().enumerate() {
            column.inferred_type = self
                .rows
                .iter()
                .filter_map(|row| row.cells.get(col_idx))
                .fold(column.inferred_type, |acc, cell| acc.widen(cell.cell_type()));
        }

        Table {
            columns: self.columns,
            column_index: self.column_index,
            rows: self.rows,
        }
    }
}

/// A borrowed row that can be indexed by column name
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    row: &'a Row,
}

impl<'a> RowRef<'a> {
    /// Cell in the named column
    pub fn get(&self, column: &str) -> Result<&'a CellValue> {
        self.try_get(column)
            .ok_or_else(|| QueryError::ColumnNotFound(column.to_string()))
    }

    /// Cell in the named column, if the column exists
    pub fn try_get(&self, column: &str) -> Option<&'a CellValue> {
        self.table
            .column_index(column)
            .and_then(|i| self.row.cells.get(i))
    }

    /// Cell at a zero-based column position
    pub fn at(&self, index: usize) -> Option<&'a CellValue> {
        self.row.cells.get(index)
    }

    /// Cell values in column order
    pub fn cells(&self) -> &'a [CellValue] {
        &self.row.cells
    }

    /// Spreadsheet row number of this row
    pub fn row_number(&self) -> usize {
        self.row.row_number
    }

    /// The table this row belongs to
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// `(column name, cell)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        let table = self.table;
        let row = self.row;
        table
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .zip(row.cells.iter())
    }
}

impl std::fmt::Debug for RowRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowRef")
            .field("row_number", &self.row.row_number)
            .field("cells", &self.row.cells)
            .finish()
    }
}

/// A contiguous, borrowed run of rows from a [`Table`]
#[derive(Clone, Copy)]
pub struct TableSlice<'a> {
    table: &'a Table,
    rows: &'a [Row],
}

impl<'a> TableSlice<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The table the slice borrows from
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Row at a position within the slice
    pub fn get(&self, index: usize) -> Option<RowRef<'a>> {
        let table = self.table;
        self.rows.get(index).map(|row| RowRef { table, row })
    }

    pub fn first(&self) -> Option<RowRef<'a>> {
        self.get(0)
    }

    pub fn iter(&self) -> RowIter<'a> {
        RowIter {
            table: self.table,
            inner: self.rows.iter(),
        }
    }

    /// Copy the slice into a standalone table
    pub fn to_table(&self) -> Table {
        let mut table = Table {
            columns: self.table.columns.clone(),
            column_index: self.table.column_index.clone(),
            rows: self.rows.to_vec(),
        };
        for (i, row) in table.rows.iter_mut().enumerate() {
            row.row_number = i + 2;
        }
        table
    }
}

impl std::fmt::Debug for TableSlice<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for TableSlice<'a> {
    type Item = RowRef<'a>;
    type IntoIter = RowIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = RowRef<'a>;
    type IntoIter = RowIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}

/// Iterator over borrowed rows
#[derive(Clone)]
pub struct RowIter<'a> {
    table: &'a Table,
    inner: std::slice::Iter<'a, Row>,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = RowRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        self.inner.next().map(|row| RowRef { table, row })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for RowIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let table = self.table;
        self.inner.next_back().map(|row| RowRef { table, row })
    }
}

impl ExactSizeIterator for RowIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &CellValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn sample() -> Table {
        Table::from_rows(
            ["Id", "Length"],
            vec![
                vec!["A".into(), 10.into()],
                vec!["B".into(), 20.into()],
                vec!["C".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_equality_and_hash_agree() {
        let a = CellValue::Int(3);
        let b = CellValue::Float(3.0);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(hash_of(&CellValue::Float(0.0)), hash_of(&CellValue::Float(-0.0)));
        assert_eq!(CellValue::Float(f64::NAN), CellValue::Float(f64::NAN));
    }

    #[test]
    fn test_large_int_against_float_is_exact() {
        let two_53 = 1i64 << 53;
        let above = CellValue::Int(two_53 + 1);
        let float = CellValue::Float(two_53 as f64);
        let exact = CellValue::Int(two_53);

        assert_ne!(above, float);
        assert_eq!(float, exact);
        assert_eq!(hash_of(&float), hash_of(&exact));
        assert_eq!(above.cmp(&float), Ordering::Greater);
        assert_eq!(float.cmp(&above), Ordering::Less);
        assert_eq!(float.cmp(&exact), Ordering::Equal);

        assert_eq!(CellValue::Int(2).cmp(&CellValue::Float(2.5)), Ordering::Less);
        assert_eq!(CellValue::Int(-3).cmp(&CellValue::Float(-2.5)), Ordering::Less);
        assert_eq!(CellValue::Int(-2).cmp(&CellValue::Float(-2.5)), Ordering::Greater);
        assert_eq!(CellValue::Int(i64::MAX).cmp(&CellValue::Float(9.3e18)), Ordering::Less);
        assert_eq!(CellValue::Int(i64::MIN), CellValue::Float(i64::MIN as f64));
        assert_eq!(
            CellValue::Float(f64::NEG_INFINITY).cmp(&CellValue::Int(i64::MIN)),
            Ordering::Less
        );
    }

    #[test]
    fn test_ordering_across_kinds() {
        let mut values = vec![
            CellValue::from("b"),
            CellValue::Float(2.5),
            CellValue::Null,
            CellValue::Int(2),
            CellValue::Bool(true),
            CellValue::from("a"),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Bool(true),
                CellValue::Int(2),
                CellValue::Float(2.5),
                CellValue::from("a"),
                CellValue::from("b"),
            ]
        );
        assert_eq!(CellValue::Int(5).cmp(&CellValue::Float(5.0)), Ordering::Equal);
        assert_eq!(CellValue::Float(f64::NAN).cmp(&CellValue::Int(i64::MAX)), Ordering::Greater);
    }

    #[test]
    fn test_date_orders_before_midnight_datetime() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let midnight = d.and_hms_opt(0, 0, 0).unwrap();
        let noon = d.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(CellValue::Date(d).cmp(&CellValue::DateTime(midnight)), Ordering::Less);
        assert_eq!(CellValue::DateTime(noon).cmp(&CellValue::Date(d)), Ordering::Greater);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(CellValue::Null.to_text(), "");
        assert_eq!(CellValue::Float(10.0).to_text(), "10");
        assert_eq!(CellValue::Float(2.5).to_text(), "2.5");
        assert_eq!(CellValue::from("x").to_text(), "x");
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(CellValue::Int(4).as_f64(), Some(4.0));
        assert_eq!(CellValue::from(" 4.5 ").as_f64(), Some(4.5));
        assert_eq!(CellValue::from("four").as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[test]
    fn test_builder_pads_and_infers() {
        let table = sample();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.row(2).unwrap().get("Length").unwrap(), &CellValue::Null);
        assert_eq!(table.column("Length").unwrap().inferred_type, CellType::Int);
        assert_eq!(table.column("Id").unwrap().inferred_type, CellType::String);
    }

    #[test]
    fn test_builder_rejects_duplicate_and_blank_names() {
        assert!(matches!(
            Table::builder(["Id", "Id"]),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            Table::builder(["Id", " "]),
            Err(QueryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_builder_rejects_long_rows() {
        let mut builder = Table::builder(["Id"]).unwrap();
        let err = builder.push_row(vec!["A".into(), "B".into()]).unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument(_)));
    }

    #[test]
    fn test_row_ref_by_name() {
        let table = sample();
        let row = table.row(1).unwrap();
        assert_eq!(row.get("Id").unwrap(), &CellValue::from("B"));
        assert_eq!(row.row_number(), 3);
        assert!(matches!(row.get("Nope"), Err(QueryError::ColumnNotFound(_))));
        let pairs: Vec<_> = row.iter().map(|(k, v)| (k, v.to_text().into_owned())).collect();
        assert_eq!(pairs, vec![("Id", "B".to_string()), ("Length", "20".to_string())]);
    }

    #[test]
    fn test_cell_by_row_number() {
        let table = sample();
        assert_eq!(table.cell(2, "Id").unwrap(), &CellValue::from("A"));
        assert_eq!(table.cell(3, "Length").unwrap(), &CellValue::Int(20));
        assert!(matches!(table.cell(1, "Id"), Err(QueryError::InvalidRange(_))));
        assert!(matches!(
            table.cell(9, "Id"),
            Err(QueryError::OutOfBounds { requested: 9, available: 3 })
        ));
        assert!(matches!(table.cell(2, "Nope"), Err(QueryError::ColumnNotFound(_))));
    }

    #[test]
    fn test_rows_at_clamps() {
        let table = sample();
        assert_eq!(table.rows_at(1, 10).len(), 2);
        assert_eq!(table.rows_at(5, 2).len(), 0);
        assert_eq!(table.rows_at(0, 0).len(), 0);
    }

    #[test]
    fn test_slice_to_table_renumbers() {
        let table = sample();
        let copy = table.rows_at(1, 2).to_table();
        assert_eq!(copy.row_count(), 2);
        assert_eq!(copy.row(0).unwrap().row_number(), 2);
        assert_eq!(copy.cell(2, "Id").unwrap(), &CellValue::from("B"));
    }
}
