//! Reporting-period revenue date assignment.

use chrono::{Datelike, NaiveDate};
use polars::prelude::DataFrame;
use tracing::info;

use revpipe_ingest::parse_date;
use revpipe_model::{ColumnCatalog, RevenueDateMode, RevenueDateSpec, StageReport};

use crate::columns::{
    require_column, set_opt_string_column, set_string_column, string_column,
};
use crate::context::StageContext;
use crate::error::{Result, TransformError};
use crate::normalize::{normalize_key, normalized_column};

/// `M/D/YY`, the reporting format the downstream dashboard expects.
fn format_short_date(date: NaiveDate) -> String {
    format!("{}/{}/{:02}", date.month(), date.day(), date.year() % 100)
}

/// Assign the revenue date, either as the first day of the current
/// month (fixed mode) or via the partner calendar (lookup mode).
pub fn assign_revenue_date(
    df: &DataFrame,
    spec: &RevenueDateSpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    require_column(df, "records", &spec.period_column)?;
    match &spec.mode {
        RevenueDateMode::FixedMonthStart => {
            let first = NaiveDate::from_ymd_opt(ctx.today.year(), ctx.today.month(), 1)
                .unwrap_or(ctx.today);
            let formatted = format_short_date(first);
            info!(partner = %ctx.partner, date = %formatted, "fixed revenue date");
            let mut out = df.clone();
            set_string_column(
                &mut out,
                &spec.output_column,
                vec![formatted; df.height()],
            )?;
            let report = StageReport::new("revenue_date", df.height(), out.height());
            Ok((out, report))
        }
        RevenueDateMode::Calendar(calendar) => {
            assign_from_calendar(df, spec, calendar, ctx)
        }
    }
}

fn assign_from_calendar(
    df: &DataFrame,
    spec: &RevenueDateSpec,
    calendar: &revpipe_model::CalendarSpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    let source = calendar.lookup.label();
    let table = ctx.lookups.load(&calendar.lookup)?;

    let catalog = ColumnCatalog::new(table.get_column_names().iter().map(|name| name.as_str()));
    let period_column = calendar
        .period_candidates
        .iter()
        .find_map(|name| catalog.resolve(name))
        .ok_or_else(|| {
            TransformError::missing_column(&source, calendar.period_candidates.join(" | "))
        })?;
    let partner_lower = ctx.partner.name().to_lowercase();
    let partner_column = table
        .get_column_names()
        .iter()
        .find(|name| name.to_lowercase().contains(&partner_lower))
        .map(|name| name.to_string())
        .ok_or_else(|| {
            TransformError::missing_column(&source, format!("*{}*", ctx.partner.name()))
        })?;

    // Calendar duplicates intentionally keep the last occurrence.
    let period_keys = normalized_column(&table, &source, period_column)?;
    let period_dates = string_column(&table, &source, &partner_column)?;
    let mut map = std::collections::HashMap::new();
    for idx in 0..table.height() {
        if period_keys[idx].is_empty() {
            continue;
        }
        if let Some(date) = parse_date(&period_dates[idx]) {
            map.insert(period_keys[idx].clone(), date);
        }
    }
    if map.is_empty() {
        return Err(TransformError::lookup_empty(source, ctx.partner.name()));
    }

    let current_year = ctx.today.year();
    let records = string_column(df, "records", &spec.period_column)?;
    let mut values: Vec<Option<String>> = Vec::with_capacity(df.height());
    let mut matched = 0usize;
    for period in &records {
        let resolved = map
            .get(&normalize_key(period))
            .and_then(|date| date.with_year(current_year))
            .map(format_short_date);
        if resolved.is_some() {
            matched += 1;
        }
        values.push(resolved);
    }
    info!(
        partner = %ctx.partner,
        calendar_rows = map.len(),
        matched,
        rows = df.height(),
        "calendar revenue dates"
    );

    let mut out = df.clone();
    set_opt_string_column(&mut out, &spec.output_column, values)?;
    let report =
        StageReport::new("revenue_date", df.height(), out.height()).with_matched(matched);
    Ok((out, report))
}
