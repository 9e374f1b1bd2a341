//! Configuration for loading and querying tables

use serde::Deserialize;

use crate::error::{QueryError, Result};
use crate::query::CellComparator;

/// What to do when a row range reaches past the end of the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Take as many rows as exist
    #[default]
    Clamp,
    /// Fail with `QueryError::OutOfBounds`
    Strict,
}

impl std::str::FromStr for RangePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clamp" => Ok(RangePolicy::Clamp),
            "strict" => Ok(RangePolicy::Strict),
            _ => Err(format!("Unknown range policy: {}", s)),
        }
    }
}

/// Options shared by loaders and queries
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sheet to load; the first sheet when unset
    pub sheet_name: Option<String>,
    /// Out-of-bounds handling for row ranges
    pub range_policy: RangePolicy,
    /// Ignore case when comparing string values
    pub ignore_case: bool,
    /// Ignore leading/trailing whitespace in string values
    pub ignore_whitespace: bool,
    /// Tolerance for numeric comparisons
    pub numeric_tolerance: Option<f64>,
    /// Field delimiter for CSV sources
    pub csv_delimiter: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_name: None,
            range_policy: RangePolicy::default(),
            ignore_case: false,
            ignore_whitespace: false,
            numeric_tolerance: None,
            csv_delimiter: b',',
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a JSON document
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| QueryError::InvalidArgument(format!("config: {}", e)))
    }

    /// Set the sheet to load
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Set the out-of-bounds policy for row ranges
    pub fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }

    /// Enable case-insensitive comparison
    pub fn with_ignore_case(mut self, ignore: bool) -> Self {
        self.ignore_case = ignore;
        self
    }

    /// Enable whitespace-insensitive comparison
    pub fn with_ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    /// Set numeric tolerance for float comparisons
    pub fn with_numeric_tolerance(mut self, tolerance: f64) -> Self {
        self.numeric_tolerance = Some(tolerance);
        self
    }

    /// Set the CSV field delimiter
    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Build the cell comparator described by this config
    pub fn comparator(&self) -> CellComparator {
        CellComparator::new(self.ignore_case, self.ignore_whitespace, self.numeric_tolerance)
    }
}
