//! Distinct value counting

use std::borrow::Cow;

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::error::Result;
use crate::model::RowRef;

/// Number of distinct text values in `column` across `rows`
pub fn count_distinct<'a, I>(rows: I, column: &str) -> Result<usize>
where
    I: IntoIterator<Item = RowRef<'a>>,
{
    let mut seen: FxHashSet<Cow<'a, str>> = FxHashSet::default();
    for row in rows {
        seen.insert(row.get(column)?.to_text());
    }
    Ok(seen.len())
}

/// Distinct text values in `column`, in first-seen order
pub fn distinct_values<'a, I>(rows: I, column: &str) -> Result<Vec<String>>
where
    I: IntoIterator<Item = RowRef<'a>>,
{
    let mut seen: IndexSet<Cow<'a, str>, FxBuildHasher> = IndexSet::default();
    for row in rows {
        seen.insert(row.get(column)?.to_text());
    }
    Ok(seen.into_iter().map(Cow::into_owned).collect())
}
