//! Column metadata and cell types

use serde::{Deserialize, Serialize};

use super::table::CellValue;

/// Type of a cell, or the common type of a column's cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    DateTime,
    /// Column holds cells of incompatible types
    Mixed,
}

impl CellType {
    pub fn of(value: &CellValue) -> CellType {
        match value {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Smallest type holding both `self` and `other`.
    ///
    /// Null is absorbed by anything, Int widens to Float and Date to
    /// DateTime; every other pairing is `Mixed`.
    pub fn widen(self, other: CellType) -> CellType {
        use CellType::*;

        match (self, other) {
            (a, b) if a == b => a,
            (Null, t) | (t, Null) => t,
            (Int, Float) | (Float, Int) => Float,
            (Date, DateTime) | (DateTime, Date) => DateTime,
            _ => Mixed,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, CellType::Int | CellType::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CellType::Null => "null",
            CellType::Bool => "bool",
            CellType::Int => "int",
            CellType::Float => "float",
            CellType::String => "string",
            CellType::Date => "date",
            CellType::DateTime => "datetime",
            CellType::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Header name, unique within the table
    pub name: String,
    /// 0-based position
    pub index: usize,
    /// Declared type widened over every cell of the column
    pub inferred_type: CellType,
}

impl Column {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            inferred_type: CellType::Null,
        }
    }

    /// Start type inference from a type the source declares
    pub fn typed(mut self, cell_type: CellType) -> Self {
        self.inferred_type = cell_type;
        self
    }
}
