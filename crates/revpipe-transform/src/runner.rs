//! Generic pipeline executor.
//!
//! One executor interprets every partner's declarative plan: it threads
//! the record table through the ordered stages, collects per-stage
//! reports, and finishes with column projection. A structural failure in
//! any stage aborts the run; there is no partial output.

use polars::prelude::DataFrame;
use tracing::info;

use revpipe_model::{PartnerPlan, StageReport};

use crate::context::StageContext;
use crate::error::Result;
use crate::project::project;
use crate::stages::run_stage;

/// Execute a partner plan over the raw record table.
///
/// Returns the projected output table and the per-stage reports in plan
/// order.
pub fn execute_plan(
    df: DataFrame,
    plan: &PartnerPlan,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, Vec<StageReport>)> {
    let mut frame = df;
    let mut reports = Vec::with_capacity(plan.stages.len());
    for spec in &plan.stages {
        let span = tracing::info_span!("stage", name = spec.name());
        let _enter = span.enter();
        let (next, report) = run_stage(&frame, spec, ctx)?;
        info!(
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            "stage complete"
        );
        reports.push(report);
        frame = next;
    }
    let out = project(&frame, &plan.output_columns)?;
    info!(
        partner = %ctx.partner,
        stages = reports.len(),
        rows = out.height(),
        columns = out.width(),
        "pipeline complete"
    );
    Ok((out, reports))
}
