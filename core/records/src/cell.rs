//! FILENAME: core/records/src/cell.rs
//! PURPOSE: Raw cell values as they arrive from a worksheet row.
//! CONTEXT: The loader hands each data row over as header-keyed `CellValue`s.
//! Every coercion used by record normalization (trimming, emptiness, numeric
//! parsing, path-key rendering) lives here so both directions agree.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single raw cell value read from the source sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

/// One source row keyed by its header name.
pub type RawRow = HashMap<String, CellValue>;

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// The value converted to a string and trimmed.
    pub fn trimmed(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number_key(*n),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
        }
    }

    /// A value is blank iff its trimmed string form has zero length.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Boolean(_) => false,
        }
    }

    /// Trimmed text, or `None` when blank.
    pub fn as_label(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.trimmed())
        }
    }

    /// Base-10 numeric reading of the cell.
    ///
    /// Text is trimmed before parsing. Blank cells, booleans, unparseable
    /// text and non-finite results are all `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Renders a number the way it appears in a path key: integral values have
/// no decimal part (`1.0` -> `"1"`).
pub fn format_number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}
