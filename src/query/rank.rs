//! Dense ranking of rows and row groups
//!
//! Ties share a rank and the next distinct value takes the following integer,
//! so ranks over `k` distinct keys are exactly `1..=k` ("1, 1, 2", never
//! "1, 1, 3").

use std::cmp::Ordering;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::error::{QueryError, Result};
use crate::model::{CellValue, RowRef};

/// Direction of a sort key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

type Extractor<'f> = Box<dyn Fn(&RowRef<'_>) -> Result<CellValue> + 'f>;

fn boxed<'f, F>(f: F) -> Extractor<'f>
where
    F: Fn(&RowRef<'_>) -> Result<CellValue> + 'f,
{
    Box::new(f)
}

/// Extracts one ordering key from a row
pub struct SortKey<'f> {
    name: String,
    extractor: Extractor<'f>,
    order: SortOrder,
}

impl<'f> SortKey<'f> {
    /// Key on the raw cell of a column
    pub fn column(name: impl Into<String>) -> Self {
        let name = name.into();
        let column = name.clone();
        Self {
            name,
            extractor: boxed(move |row| row.get(&column).cloned()),
            order: SortOrder::Ascending,
        }
    }

    /// Key on a column read as a number; non-numeric cells are a type mismatch
    pub fn numeric(name: impl Into<String>) -> Self {
        let name = name.into();
        let column = name.clone();
        Self {
            name,
            extractor: boxed(move |row| {
                let cell = row.get(&column)?;
                cell.as_f64()
                    .map(CellValue::Float)
                    .ok_or_else(|| QueryError::TypeMismatch {
                        column: column.clone(),
                        expected: "number".to_string(),
                        found: cell.cell_type().to_string(),
                    })
            }),
            order: SortOrder::Ascending,
        }
    }

    /// Key computed by a closure
    pub fn by<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&RowRef<'_>) -> Result<CellValue> + 'f,
    {
        Self {
            name: name.into(),
            extractor: boxed(f),
            order: SortOrder::Ascending,
        }
    }

    pub fn ascending(mut self) -> Self {
        self.order = SortOrder::Ascending;
        self
    }

    pub fn descending(mut self) -> Self {
        self.order = SortOrder::Descending;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Key value for a row
    pub fn extract(&self, row: &RowRef<'_>) -> Result<CellValue> {
        (self.extractor)(row)
    }

    /// Compare two key values in this key's direction
    pub fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        match self.order {
            SortOrder::Ascending => a.cmp(b),
            SortOrder::Descending => b.cmp(a),
        }
    }
}

impl std::fmt::Debug for SortKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortKey")
            .field("name", &self.name)
            .field("order", &self.order)
            .finish()
    }
}

/// Dense ranks of `items` under `compare`, aligned with the input
pub fn dense_rank<T, F>(items: &[T], mut compare: F) -> Vec<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| compare(&items[a], &items[b]));

    let mut ranks = vec![0; items.len()];
    let mut rank = 0;
    let mut previous: Option<usize> = None;
    for idx in order {
        match previous {
            Some(prev) if compare(&items[prev], &items[idx]) == Ordering::Equal => {}
            _ => rank += 1,
        }
        ranks[idx] = rank;
        previous = Some(idx);
    }
    ranks
}

/// A row paired with its rank
#[derive(Debug, Clone, Copy)]
pub struct RankedRow<'a> {
    pub row: RowRef<'a>,
    pub rank: usize,
}

/// Rows sharing one key value, with the key's rank
#[derive(Debug, Clone)]
pub struct RankedGroup<'a> {
    pub key: CellValue,
    pub rank: usize,
    pub rows: Vec<RowRef<'a>>,
}

/// Group rows by key and dense-rank the distinct keys.
///
/// Groups come back in first-seen order; rows keep their input order within
/// a group. The rank depends only on the key value.
pub fn group_ranks<'a, I>(rows: I, key: &SortKey<'_>) -> Result<Vec<RankedGroup<'a>>>
where
    I: IntoIterator<Item = RowRef<'a>>,
{
    let mut groups: IndexMap<CellValue, Vec<RowRef<'a>>, FxBuildHasher> = IndexMap::default();
    for row in rows {
        groups.entry(key.extract(&row)?).or_default().push(row);
    }

    let keys: Vec<&CellValue> = groups.keys().collect();
    let ranks = dense_rank(&keys, |a, b| key.compare(a, b));

    Ok(groups
        .into_iter()
        .zip(ranks)
        .map(|((key, rows), rank)| RankedGroup { key, rank, rows })
        .collect())
}

/// Every row with its group's rank, grouped as in [`group_ranks`]
pub fn rank_groups<'a, I>(rows: I, key: &SortKey<'_>) -> Result<Vec<RankedRow<'a>>>
where
    I: IntoIterator<Item = RowRef<'a>>,
{
    Ok(group_ranks(rows, key)?
        .into_iter()
        .flat_map(|group| {
            let rank = group.rank;
            group.rows.into_iter().map(move |row| RankedRow { row, rank })
        })
        .collect())
}

fn compare_tuples(keys: &[SortKey<'_>], a: &[CellValue], b: &[CellValue]) -> Ordering {
    keys.iter()
        .zip(a.iter().zip(b))
        .map(|(key, (x, y))| key.compare(x, y))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Rows in input order, each with its dense rank under the composite key order
pub fn ranked_rows<'a, I>(rows: I, keys: &[SortKey<'_>]) -> Result<Vec<RankedRow<'a>>>
where
    I: IntoIterator<Item = RowRef<'a>>,
{
    if keys.is_empty() {
        return Err(QueryError::InvalidArgument(
            "at least one ordering key is required".to_string(),
        ));
    }

    let rows: Vec<RowRef<'a>> = rows.into_iter().collect();
    let tuples = rows
        .iter()
        .map(|row| keys.iter().map(|key| key.extract(row)).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()?;

    let ranks = dense_rank(&tuples, |a, b| compare_tuples(keys, a, b));

    Ok(rows
        .into_iter()
        .zip(ranks)
        .map(|(row, rank)| RankedRow { row, rank })
        .collect())
}

/// Dense rank of each row under the composite key order, aligned with the input
pub fn rank_rows<'a, I>(rows: I, keys: &[SortKey<'_>]) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = RowRef<'a>>,
{
    Ok(ranked_rows(rows, keys)?.into_iter().map(|r| r.rank).collect())
}
