//! Coerced row types

use serde::{Deserialize, Serialize};

/// How values that do not fit their column type are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// Fail with a value mismatch
    Strict,
    /// Substitute null (default, used for scans)
    #[default]
    Lenient,
}

/// A single coerced value, shaped by its column type
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Double(f64),
    String(String),
    Array(Vec<Cell>),
    /// Field values, positionally aligned with the record type's fields
    Record(Vec<Cell>),
}

/// A coerced row, positionally aligned with a row type
pub type Row = Vec<Cell>;

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) => Some(s),
            _ => None,
        }
    }

    /// Element or field cells of a composite value
    pub fn children(&self) -> Option<&[Cell]> {
        match self {
            Cell::Array(cells) | Cell::Record(cells) => Some(cells),
            _ => None,
        }
    }
}
