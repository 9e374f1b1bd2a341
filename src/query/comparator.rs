//! Cell-level comparison logic for lookups

use std::borrow::Cow;

use crate::model::CellValue;

/// Decides whether a cell matches the value being looked up
pub trait ValueComparator {
    fn matches(&self, cell: &CellValue, lookup_value: &CellValue) -> bool;
}

impl<F> ValueComparator for F
where
    F: Fn(&CellValue, &CellValue) -> bool,
{
    fn matches(&self, cell: &CellValue, lookup_value: &CellValue) -> bool {
        self(cell, lookup_value)
    }
}

/// Equality with optional case, whitespace and numeric relaxations.
///
/// Case and whitespace options apply only when both cells are strings;
/// the tolerance applies only when both are numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellComparator {
    ignore_case: bool,
    ignore_whitespace: bool,
    numeric_tolerance: Option<f64>,
}

impl CellComparator {
    pub fn new(ignore_case: bool, ignore_whitespace: bool, numeric_tolerance: Option<f64>) -> Self {
        Self {
            ignore_case,
            ignore_whitespace,
            numeric_tolerance,
        }
    }

    /// Plain cell equality (`Int(1)` equals `Float(1.0)`)
    pub fn exact() -> Self {
        Self::default()
    }

    pub fn equal(&self, a: &CellValue, b: &CellValue) -> bool {
        match (a, b) {
            (CellValue::String(x), CellValue::String(y)) => {
                fold(x, self.ignore_case, self.ignore_whitespace)
                    == fold(y, self.ignore_case, self.ignore_whitespace)
            }
            _ => match self.numeric_tolerance {
                Some(tolerance) => a.equals_with_tolerance(b, tolerance),
                None => a == b,
            },
        }
    }
}

impl ValueComparator for CellComparator {
    fn matches(&self, cell: &CellValue, lookup_value: &CellValue) -> bool {
        self.equal(cell, lookup_value)
    }
}

/// Compares the text form of both values, so `Int(10)` matches `"10"`
#[derive(Debug, Clone, Copy, Default)]
pub struct TextComparator {
    ignore_case: bool,
}

impl TextComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_case() -> Self {
        Self { ignore_case: true }
    }
}

impl ValueComparator for TextComparator {
    fn matches(&self, cell: &CellValue, lookup_value: &CellValue) -> bool {
        fold(&cell.to_text(), self.ignore_case, false)
            == fold(&lookup_value.to_text(), self.ignore_case, false)
    }
}

fn fold(s: &str, ignore_case: bool, trim: bool) -> Cow<'_, str> {
    let s = if trim { s.trim() } else { s };
    if ignore_case {
        Cow::Owned(s.to_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}
