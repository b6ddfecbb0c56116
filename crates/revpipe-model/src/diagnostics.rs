//! Observable diagnostics reported by enrichment stages.
//!
//! Data-quality findings (unmatched keys, unresolved conflicts) are
//! surfaced here as counts and samples; they never abort a run.

use serde::{Deserialize, Serialize};

/// Counts for one pass of a matching cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPass {
    pub record_column: String,
    pub lookup_column: String,
    /// Rows newly resolved by this pass.
    pub matched: usize,
}

/// Diagnostics for one cascading match against a lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDiagnostics {
    /// Usable lookup rows after partner filtering and date parsing.
    pub lookup_rows: usize,
    pub passes: Vec<MatchPass>,
    /// Records resolved by any pass.
    pub resolved: usize,
    /// Total records considered.
    pub total: usize,
}

/// Outcome of one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: String,
    pub rows_in: usize,
    pub rows_out: usize,
    /// Rows matched against the stage's lookup, where applicable.
    pub matched: Option<usize>,
    /// Rows flagged/classified by the stage, where applicable.
    pub flagged: Option<usize>,
    pub warnings: Vec<String>,
}

impl StageReport {
    pub fn new(stage: impl Into<String>, rows_in: usize, rows_out: usize) -> Self {
        Self {
            stage: stage.into(),
            rows_in,
            rows_out,
            matched: None,
            flagged: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_matched(mut self, matched: usize) -> Self {
        self.matched = Some(matched);
        self
    }

    pub fn with_flagged(mut self, flagged: usize) -> Self {
        self.flagged = Some(flagged);
        self
    }
}
