//! Query operations over table rows
//!
//! Every operation takes rows as an iterator of [`RowRef`](crate::model::RowRef),
//! so a [`TableSlice`](crate::model::TableSlice) from the slicer, a whole
//! `&Table`, or a filtered iterator can all be fed in.

mod comparator;
mod distinct;
mod lookup;
mod rank;
mod slice;

pub use comparator::{CellComparator, TextComparator, ValueComparator};
pub use distinct::{count_distinct, distinct_values};
pub use lookup::{lookup, lookup_row, vlookup, vlookup_with};
pub use rank::{
    dense_rank, group_ranks, rank_groups, rank_rows, ranked_rows, RankedGroup, RankedRow, SortKey,
    SortOrder,
};
pub use slice::{slice, RangeSlicer};
