//! Row range slicing

use tracing::debug;

use crate::config::{Config, RangePolicy};
use crate::error::{QueryError, Result};
use crate::model::{RowRange, Table, TableSlice};

/// Turns spreadsheet row ranges into views over a table's rows
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeSlicer {
    policy: RangePolicy,
}

impl RangeSlicer {
    pub fn new(policy: RangePolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.range_policy)
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Rows `[range.start, range.end)` of the table.
    ///
    /// Under [`RangePolicy::Clamp`] a range reaching past the last row yields
    /// the rows that exist; under [`RangePolicy::Strict`] it is an error.
    pub fn slice<'a>(&self, table: &'a Table, range: RowRange) -> Result<TableSlice<'a>> {
        let available = table.row_count();
        let wanted_end = range.offset() + range.count();

        if wanted_end > available {
            match self.policy {
                RangePolicy::Strict => {
                    return Err(QueryError::OutOfBounds {
                        requested: range.end() - 1,
                        available,
                    });
                }
                RangePolicy::Clamp => {
                    debug!(range = %range, available, "row range clamped to table size");
                }
            }
        }

        Ok(table.rows_at(range.offset(), range.count()))
    }

    /// Same as [`slice`](Self::slice) with raw row numbers
    pub fn slice_rows<'a>(&self, table: &'a Table, start: usize, end: usize) -> Result<TableSlice<'a>> {
        self.slice(table, RowRange::new(start, end)?)
    }
}

/// Slice with the default clamping policy
pub fn slice(table: &Table, range: RowRange) -> TableSlice<'_> {
    table.rows_at(range.offset(), range.count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn numbered(n: i64) -> Table {
        Table::from_rows(["N"], (0..n).map(|i| vec![CellValue::Int(i)]).collect()).unwrap()
    }

    #[test]
    fn test_slice_starts_at_row_number() {
        let table = numbered(10);
        let rows = slice(&table, RowRange::new(4, 7).unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.first().unwrap().get("N").unwrap(), &CellValue::Int(2));
        assert_eq!(rows.first().unwrap().row_number(), 4);
    }

    #[test]
    fn test_clamp_takes_what_exists() {
        let table = numbered(5);
        let slicer = RangeSlicer::default();
        // rows 2..=6 exist
        let rows = slicer.slice_rows(&table, 5, 20).unwrap();
        assert_eq!(rows.len(), 2);

        let rows = slicer.slice_rows(&table, 12, 20).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_strict_rejects_overrun() {
        let table = numbered(5);
        let slicer = RangeSlicer::new(RangePolicy::Strict);
        assert_eq!(slicer.slice_rows(&table, 2, 7).unwrap().len(), 5);
        assert!(matches!(
            slicer.slice_rows(&table, 2, 8),
            Err(QueryError::OutOfBounds { requested: 7, available: 5 })
        ));
    }

    #[test]
    fn test_invalid_range() {
        let table = numbered(5);
        assert!(matches!(
            RangeSlicer::default().slice_rows(&table, 6, 3),
            Err(QueryError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = Config::new().with_range_policy(RangePolicy::Strict);
        assert_eq!(RangeSlicer::from_config(&config).policy(), RangePolicy::Strict);
    }
}
