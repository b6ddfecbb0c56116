//! CLI result types.

use std::path::PathBuf;

use revpipe_model::{Partner, StageReport};

/// Outcome of one partner pipeline run.
#[derive(Debug)]
pub struct RunResult {
    pub partner: Partner,
    pub rows_in: usize,
    pub rows_out: usize,
    /// None on a dry run.
    pub output_path: Option<PathBuf>,
    pub reports: Vec<StageReport>,
}

impl RunResult {
    pub fn warning_count(&self) -> usize {
        self.reports
            .iter()
            .map(|report| report.warnings.len())
            .sum()
    }
}
