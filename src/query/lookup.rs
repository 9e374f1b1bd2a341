//! VLOOKUP-style first-match lookup
//!
//! Rows are scanned in order. For each row, every column of the search set is
//! tested against the lookup value in order; the first row with any matching
//! column wins and the cell from the result column of that row is returned.
//! A miss is `Ok(None)` rather than a default value, so a matched empty cell
//! (`Some(&CellValue::Null)`) stays distinguishable from no match.

use tracing::trace;

use crate::error::{QueryError, Result};
use crate::model::{CellValue, ColumnSet, RowRange, RowRef, Table};

use super::comparator::ValueComparator;
use super::slice::RangeSlicer;

/// First row in which any of `columns` matches `lookup_value`
pub fn lookup_row<'a, I, C>(
    rows: I,
    lookup_value: &CellValue,
    columns: &ColumnSet,
    comparator: &C,
) -> Result<Option<RowRef<'a>>>
where
    I: IntoIterator<Item = RowRef<'a>>,
    C: ValueComparator + ?Sized,
{
    for row in rows {
        for column in columns.iter() {
            if comparator.matches(row.get(column)?, lookup_value) {
                return Ok(Some(row));
            }
        }
    }

    trace!(value = %lookup_value, "lookup found no matching row");
    Ok(None)
}

/// VLOOKUP equivalent: the cell at `columns[result_index]` of the first matching row
pub fn lookup<'a, I, C>(
    rows: I,
    lookup_value: &CellValue,
    columns: &ColumnSet,
    result_index: usize,
    comparator: &C,
) -> Result<Option<&'a CellValue>>
where
    I: IntoIterator<Item = RowRef<'a>>,
    C: ValueComparator + ?Sized,
{
    let result_column = columns.get(result_index).ok_or_else(|| {
        QueryError::InvalidArgument(format!(
            "result column index {} is outside the {} lookup columns",
            result_index,
            columns.len()
        ))
    })?;

    match lookup_row(rows, lookup_value, columns, comparator)? {
        Some(row) => Ok(Some(row.get(result_column)?)),
        None => Ok(None),
    }
}

/// Slice `table` to `range`, then [`lookup`] within it.
///
/// A range reaching past the last row is clamped; use [`vlookup_with`] and a
/// strict [`RangeSlicer`] to reject it instead.
pub fn vlookup<'a, C>(
    table: &'a Table,
    lookup_value: &CellValue,
    range: RowRange,
    columns: &ColumnSet,
    result_index: usize,
    comparator: &C,
) -> Result<Option<&'a CellValue>>
where
    C: ValueComparator + ?Sized,
{
    let slicer = RangeSlicer::default();
    vlookup_with(&slicer, table, lookup_value, range, columns, result_index, comparator)
}

/// [`vlookup`] with the range cut by `slicer` under its own policy
pub fn vlookup_with<'a, C>(
    slicer: &RangeSlicer,
    table: &'a Table,
    lookup_value: &CellValue,
    range: RowRange,
    columns: &ColumnSet,
    result_index: usize,
    comparator: &C,
) -> Result<Option<&'a CellValue>>
where
    C: ValueComparator + ?Sized,
{
    columns.validate_against(table)?;
    let rows = slicer.slice(table, range)?;
    lookup(rows, lookup_value, columns, result_index, comparator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RangePolicy;
    use crate::query::{CellComparator, TextComparator};

    fn sheet3() -> Table {
        Table::from_rows(
            ["Id", "Length"],
            vec![
                vec!["A".into(), "10".into()],
                vec!["B".into(), "20".into()],
                vec!["C".into(), CellValue::Null],
                vec!["20".into(), "B".into()],
            ],
        )
        .unwrap()
    }

    fn equals(a: &CellValue, b: &CellValue) -> bool {
        a == b
    }

    #[test]
    fn test_lookup_returns_result_column() {
        let table = sheet3();
        let columns = ColumnSet::new(["Id", "Length"]).unwrap();
        let found = lookup(&table, &"B".into(), &columns, 1, &equals).unwrap();
        assert_eq!(found, Some(&CellValue::from("20")));
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let table = sheet3();
        let columns = ColumnSet::new(["Id"]).unwrap();
        assert_eq!(lookup(&table, &"Z".into(), &columns, 0, &equals).unwrap(), None);
    }

    #[test]
    fn test_matched_empty_cell_is_some_null() {
        let table = sheet3();
        let columns = ColumnSet::new(["Id", "Length"]).unwrap();
        let found = lookup(&table, &"C".into(), &columns, 1, &equals).unwrap();
        assert_eq!(found, Some(&CellValue::Null));
    }

    #[test]
    fn test_first_match_wins_across_columns() {
        let table = sheet3();
        let columns = ColumnSet::new(["Id", "Length"]).unwrap();
        // "20" appears in Length of row 3 before Id of row 5
        let row = lookup_row(&table, &"20".into(), &columns, &equals).unwrap().unwrap();
        assert_eq!(row.row_number(), 3);

        let reversed: Vec<_> = table.rows().rev().collect();
        let row = lookup_row(reversed, &"20".into(), &columns, &equals).unwrap().unwrap();
        assert_eq!(row.row_number(), 5);
    }

    #[test]
    fn test_bad_result_index() {
        let table = sheet3();
        let columns = ColumnSet::new(["Id"]).unwrap();
        assert!(matches!(
            lookup(&table, &"A".into(), &columns, 1, &equals),
            Err(QueryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unknown_column() {
        let table = sheet3();
        let columns = ColumnSet::new(["Id", "HP"]).unwrap();
        assert!(matches!(
            lookup(&table, &"Z".into(), &columns, 1, &equals),
            Err(QueryError::ColumnNotFound(_))
        ));
        assert!(matches!(
            vlookup(&table, &"A".into(), RowRange::new(2, 7).unwrap(), &columns, 0, &equals),
            Err(QueryError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_vlookup_limits_to_range() {
        let table = sheet3();
        let columns = ColumnSet::new(["Id", "Length"]).unwrap();
        let range = RowRange::new(2, 4).unwrap();
        assert_eq!(vlookup(&table, &"C".into(), range, &columns, 1, &equals).unwrap(), None);
        let range = RowRange::new(2, 7).unwrap();
        assert_eq!(
            vlookup(&table, &"C".into(), range, &columns, 1, &equals).unwrap(),
            Some(&CellValue::Null)
        );
    }

    #[test]
    fn test_vlookup_with_strict_slicer() {
        let table = sheet3();
        let columns = ColumnSet::new(["Id", "Length"]).unwrap();
        let past_end = RowRange::new(2, 9).unwrap();

        let strict = RangeSlicer::new(RangePolicy::Strict);
        assert!(matches!(
            vlookup_with(&strict, &table, &"B".into(), past_end, &columns, 1, &equals),
            Err(QueryError::OutOfBounds { requested: 8, available: 4 })
        ));
        assert_eq!(
            vlookup(&table, &"B".into(), past_end, &columns, 1, &equals).unwrap(),
            Some(&CellValue::from("20"))
        );

        let inside = RowRange::new(2, 6).unwrap();
        assert_eq!(
            vlookup_with(&strict, &table, &"B".into(), inside, &columns, 1, &equals).unwrap(),
            Some(&CellValue::from("20"))
        );
    }

    #[test]
    fn test_pluggable_comparators() {
        let table = sheet3();
        let columns = ColumnSet::new(["Id", "Length"]).unwrap();

        let exact = lookup(&table, &"b".into(), &columns, 1, &CellComparator::default()).unwrap();
        assert_eq!(exact, None);

        let relaxed = CellComparator::new(true, false, None);
        let found = lookup(&table, &"b".into(), &columns, 1, &relaxed).unwrap();
        assert_eq!(found, Some(&CellValue::from("20")));

        let found = lookup(&table, &CellValue::Int(10), &columns, 0, &TextComparator::new()).unwrap();
        assert_eq!(found, Some(&CellValue::from("A")));
    }
}
