//! Excel-style row and column ranges
//!
//! Row numbers are 1-based as in a spreadsheet: row 1 holds the column names,
//! so row 2 is the first data row (zero-based offset 0). Row ranges are
//! end-exclusive; column ranges are written with letters and are inclusive.

use std::str::FromStr;

use crate::error::{QueryError, Result};

use super::columns::ColumnSet;
use super::table::Table;

/// First spreadsheet row that holds data
const FIRST_DATA_ROW: usize = 2;

/// A `[start, end)` range of spreadsheet row numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    start: usize,
    end: usize,
}

impl RowRange {
    /// Create a range, validating `2 <= start <= end`
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(QueryError::InvalidRange(format!(
                "row range start {} is after end {}",
                start, end
            )));
        }
        if start < FIRST_DATA_ROW {
            return Err(QueryError::InvalidRange(format!(
                "row range starts at {}; row 1 holds column names",
                start
            )));
        }
        Ok(Self { start, end })
    }

    /// First row number in the range
    pub fn start(&self) -> usize {
        self.start
    }

    /// Row number one past the end of the range
    pub fn end(&self) -> usize {
        self.end
    }

    /// Zero-based offset of the first row into the table's data rows
    pub fn offset(&self) -> usize {
        self.start - FIRST_DATA_ROW
    }

    /// Number of rows the range asks for
    pub fn count(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl TryFrom<(usize, usize)> for RowRange {
    type Error = QueryError;

    fn try_from((start, end): (usize, usize)) -> Result<Self> {
        Self::new(start, end)
    }
}

impl FromStr for RowRange {
    type Err = QueryError;

    /// Parse `"2:15"`
    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s.split_once(':').ok_or_else(|| {
            QueryError::InvalidRange(format!("Expected format '2:15', got '{}'", s))
        })?;
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| QueryError::InvalidRange(format!("Invalid row number '{}'", part)))
        };
        Self::new(parse(start)?, parse(end)?)
    }
}

impl std::fmt::Display for RowRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Convert column letters to a 0-indexed number (A=0, B=1, ..., Z=25, AA=26)
pub fn column_letter_to_index(letters: &str) -> Result<usize> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(QueryError::InvalidRange("Empty column reference".to_string()));
    }

    let mut result: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(QueryError::InvalidRange(format!(
                "Invalid character '{}' in column reference '{}'",
                c, letters
            )));
        }
        let value = (c.to_ascii_uppercase() as usize) - ('A' as usize) + 1;
        result = result
            .checked_mul(26)
            .and_then(|r| r.checked_add(value))
            .ok_or_else(|| QueryError::InvalidRange(format!("Column '{}' is too large", letters)))?;
    }
    Ok(result - 1)
}

fn index_to_column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// An inclusive range of columns addressed by letter, e.g. `A:C`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRange {
    start: usize,
    end: usize,
}

impl ColumnRange {
    /// Create a range from two column letters
    pub fn new(start: &str, end: &str) -> Result<Self> {
        let start_idx = column_letter_to_index(start)?;
        let end_idx = column_letter_to_index(end)?;
        if start_idx > end_idx {
            return Err(QueryError::InvalidRange(format!(
                "column range {}:{} runs backwards",
                start.trim(),
                end.trim()
            )));
        }
        Ok(Self {
            start: start_idx,
            end: end_idx,
        })
    }

    /// Zero-based index of the first column
    pub fn start(&self) -> usize {
        self.start
    }

    /// Zero-based index of the last column (inclusive)
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of columns covered
    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    /// Map the letters onto a table's column names
    pub fn resolve(&self, table: &Table) -> Result<ColumnSet> {
        if self.end >= table.column_count() {
            return Err(QueryError::InvalidRange(format!(
                "column {} is past the last column {}",
                index_to_column_letter(self.end),
                index_to_column_letter(table.column_count().saturating_sub(1))
            )));
        }
        ColumnSet::new(
            table.columns()[self.start..=self.end]
                .iter()
                .map(|c| c.name.clone()),
        )
    }
}

impl FromStr for ColumnRange {
    type Err = QueryError;

    /// Parse `"A:C"`, or a single column such as `"B"`
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((start, end)) => Self::new(start, end),
            None => Self::new(s, s),
        }
    }
}

impl std::fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}",
            index_to_column_letter(self.start),
            index_to_column_letter(self.end)
        )
    }
}
