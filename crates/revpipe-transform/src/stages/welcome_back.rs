//! Welcome-back promotion detection.

use polars::prelude::DataFrame;
use tracing::info;

use revpipe_ingest::parse_date;
use revpipe_model::{DuplicatePolicy, KeyPair, StageReport, WelcomeBackSpec};

use crate::columns::{set_i64_column, string_column};
use crate::context::StageContext;
use crate::error::Result;
use crate::matcher::{resolve_dates, CascadeSpec};

/// Mark returning customers: the record's order number resolves a
/// welcome-back end date, and the record's reference date is strictly
/// earlier than it. Structurally the same check as strategic
/// verification, keyed on the order number instead of the account.
pub fn tag_welcome_back(
    df: &DataFrame,
    spec: &WelcomeBackSpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    let source = spec.lookup.label();
    let lookup = ctx.lookups.load(&spec.lookup)?;
    let keys = [KeyPair::new(
        spec.order_column.clone(),
        spec.lookup_order_column.clone(),
    )];
    let (end_dates, diagnostics) = resolve_dates(
        df,
        &lookup,
        &CascadeSpec {
            source: &source,
            partner: ctx.partner.name(),
            company_column: &spec.company_column,
            date_column: &spec.lookup_date_column,
            keys: &keys,
            policy: DuplicatePolicy::KeepFirst,
        },
    )?;

    let reference = string_column(df, "records", &spec.record_date_column)?;
    let mut flags: Vec<i64> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let welcome = match (parse_date(&reference[idx]), end_dates[idx]) {
            (Some(record_date), Some(end_date)) => record_date < end_date,
            _ => false,
        };
        flags.push(i64::from(welcome));
    }
    let flagged = flags.iter().filter(|flag| **flag == 1).count();
    info!(
        partner = %ctx.partner,
        matched = diagnostics.resolved,
        flagged,
        "welcome back detection"
    );

    let mut out = df.clone();
    set_i64_column(&mut out, &spec.output_column, flags)?;
    let report = StageReport::new("welcome_back", df.height(), out.height())
        .with_matched(diagnostics.resolved)
        .with_flagged(flagged);
    Ok((out, report))
}
