//! Strategic account verification and order enforcement.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use tracing::info;

use revpipe_ingest::parse_date;
use revpipe_model::{
    DuplicatePolicy, StageReport, StrategicOrdersSpec, StrategicSpec, STRATEGIC_AGENT,
};

use crate::columns::{set_i64_column, set_string_column, string_column};
use crate::context::StageContext;
use crate::error::{Result, TransformError};
use crate::matcher::{partner_rows, resolve_dates, CascadeSpec};
use crate::normalize::normalized_column;

/// Flag records whose own reference date is strictly earlier than the
/// strategic end date resolved through the cascade.
///
/// A record matching on the date boundary itself is not strategic: the
/// comparison is strict less-than. A configured category exclusion
/// (e.g. legal ads) forces the flag to 0 regardless of dates.
pub fn tag_strategic(
    df: &DataFrame,
    spec: &StrategicSpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    let source = spec.lookup.label();
    let lookup = ctx.lookups.load(&spec.lookup)?;
    let (end_dates, diagnostics) = resolve_dates(
        df,
        &lookup,
        &CascadeSpec {
            source: &source,
            partner: ctx.partner.name(),
            company_column: &spec.company_column,
            date_column: &spec.lookup_date_column,
            keys: &spec.keys,
            policy: DuplicatePolicy::KeepFirst,
        },
    )?;

    let reference = string_column(df, "records", &spec.record_date_column)?;
    let mut flags: Vec<i64> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let verified = match (parse_date(&reference[idx]), end_dates[idx]) {
            (Some(record_date), Some(end_date)) => record_date < end_date,
            _ => false,
        };
        flags.push(i64::from(verified));
    }

    if let (Some(column), Some(term)) = (&spec.exclusion_column, &spec.exclusion_term) {
        let categories = string_column(df, "records", column)?;
        let term_lower = term.to_lowercase();
        for (idx, category) in categories.iter().enumerate() {
            if category.to_lowercase().contains(&term_lower) {
                flags[idx] = 0;
            }
        }
    }

    let flagged = flags.iter().filter(|flag| **flag == 1).count();
    info!(
        partner = %ctx.partner,
        resolved = diagnostics.resolved,
        flagged,
        "strategic verification"
    );

    let mut out = df.clone();
    set_i64_column(&mut out, &spec.output_column, flags.clone())?;
    if let Some(sales) = &spec.sales_column {
        replace_sales(&mut out, sales, &flags)?;
    }

    let report = StageReport::new("strategic", df.height(), out.height())
        .with_matched(diagnostics.resolved)
        .with_flagged(flagged);
    Ok((out, report))
}

/// Force the strategic flag to 1 for records whose normalized order
/// identifier appears in the strategic-orders lookup, regardless of the
/// date logic that ran before.
pub fn enforce_strategic_orders(
    df: &DataFrame,
    spec: &StrategicOrdersSpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    let source = spec.lookup.label();
    let lookup = ctx.lookups.load(&spec.lookup)?;
    let rows = partner_rows(&lookup, &source, &spec.company_column, ctx.partner.name())?;
    let order_keys = normalized_column(&lookup, &source, &spec.lookup_order_column)?;
    let orders: HashSet<&str> = rows
        .iter()
        .map(|idx| order_keys[*idx].as_str())
        .filter(|key| !key.is_empty())
        .collect();
    if orders.is_empty() {
        return Err(TransformError::lookup_empty(source, ctx.partner.name()));
    }

    let record_orders = normalized_column(df, "records", &spec.order_column)?;
    let mut flags: Vec<i64> = crate::columns::numeric_column_i64(df, "records", &spec.flag_column)?
        .into_iter()
        .map(|flag| flag.unwrap_or(0))
        .collect();
    let mut forced = 0usize;
    for (idx, key) in record_orders.iter().enumerate() {
        if !key.is_empty() && orders.contains(key.as_str()) {
            if flags[idx] != 1 {
                forced += 1;
            }
            flags[idx] = 1;
        }
    }
    info!(partner = %ctx.partner, orders = orders.len(), forced, "strategic order enforcement");

    let enforced: Vec<bool> = record_orders
        .iter()
        .map(|key| !key.is_empty() && orders.contains(key.as_str()))
        .collect();
    let mut out = df.clone();
    set_i64_column(&mut out, &spec.flag_column, flags)?;
    if let Some(sales) = &spec.sales_column {
        let mask: Vec<i64> = enforced.iter().map(|hit| i64::from(*hit)).collect();
        replace_sales(&mut out, sales, &mask)?;
    }

    let matched = enforced.iter().filter(|hit| **hit).count();
    let report = StageReport::new("strategic_orders", df.height(), out.height())
        .with_matched(matched)
        .with_flagged(forced);
    Ok((out, report))
}

/// Overwrite the salesperson column with the strategic-handling sentinel
/// wherever the mask is 1.
fn replace_sales(df: &mut DataFrame, sales_column: &str, mask: &[i64]) -> Result<()> {
    let mut names = string_column(df, "records", sales_column)?;
    for (idx, name) in names.iter_mut().enumerate() {
        if mask[idx] == 1 {
            *name = STRATEGIC_AGENT.to_string();
        }
    }
    set_string_column(df, sales_column, names)
}
