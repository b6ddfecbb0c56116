//! Column type hints for the tabular source.

use serde::{Deserialize, Serialize};

/// How a hinted column should be coerced during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Per-cell numeric coercion finalized to a nullable integer column.
    Integer,
    /// Per-cell numeric coercion finalized to a nullable float column.
    Real,
    /// Kept as text.
    Text,
    /// Parsed as a date; invalid values become null.
    Date,
}

/// A single `(column, kind)` ingestion hint.
///
/// Columns without a hint are left to natural inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHint {
    pub column: String,
    pub kind: ColumnKind,
}

impl ColumnHint {
    pub fn new(column: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }
}
