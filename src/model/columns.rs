//! Ordered sets of column names used by lookups

use indexmap::IndexSet;

use crate::error::{QueryError, Result};

use super::table::Table;

/// A non-empty, ordered list of distinct, non-blank column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    names: Vec<String>,
}

impl ColumnSet {
    /// Create a column set, rejecting empty sets, blank names and duplicates
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: IndexSet<String> = IndexSet::new();
        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(QueryError::InvalidArgument(
                    "column names can not be blank".to_string(),
                ));
            }
            if !seen.insert(name.clone()) {
                return Err(QueryError::InvalidArgument(format!(
                    "column {} appears more than once",
                    name
                )));
            }
        }

        if seen.is_empty() {
            return Err(QueryError::InvalidArgument(
                "column set can not be empty".to_string(),
            ));
        }

        Ok(Self {
            names: seen.into_iter().collect(),
        })
    }

    /// Column names in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name at a position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Check that every name exists in the table
    pub fn validate_against(&self, table: &Table) -> Result<()> {
        match self.iter().find(|name| !table.has_column(name)) {
            Some(missing) => Err(QueryError::ColumnNotFound(missing.to_string())),
            None => Ok(()),
        }
    }
}
