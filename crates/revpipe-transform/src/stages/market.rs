//! Market enrichment and column swapping (Hearst).

use polars::prelude::DataFrame;
use tracing::info;

use std::collections::HashMap;

use revpipe_model::{MarketKeySpec, StageReport, SwapSpec};

use crate::columns::{filter_rows, set_string_column, string_column, swap_columns};
use crate::context::StageContext;
use crate::error::Result;
use crate::normalize::normalized_column;

/// Join the records against the market sheet on the normalized
/// publication name and derive the aggregation group key as
/// `{market}{job number}`. Records whose publication has no market row
/// are dropped (inner join); a blank market falls back to the plain job
/// number.
pub fn derive_market_key(
    df: &DataFrame,
    spec: &MarketKeySpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    let source = spec.lookup.label();
    let lookup = ctx.lookups.load(&spec.lookup)?;
    // A publication with a blank market still joins; its group key falls
    // back to the plain job number below.
    let lookup_pubs = normalized_column(&lookup, &source, &spec.pub_column)?;
    let lookup_markets = string_column(&lookup, &source, &spec.market_column)?;
    let mut markets: HashMap<String, String> = HashMap::new();
    for (key, market) in lookup_pubs.into_iter().zip(lookup_markets) {
        if key.is_empty() {
            continue;
        }
        markets.entry(key).or_insert(market);
    }

    let pub_keys = normalized_column(df, "records", &spec.pub_column)?;
    let jobs = string_column(df, "records", &spec.job_column)?;

    let keep: Vec<bool> = pub_keys
        .iter()
        .map(|key| !key.is_empty() && markets.contains_key(key))
        .collect();
    let kept = keep.iter().filter(|flag| **flag).count();
    info!(
        partner = %ctx.partner,
        matched = kept,
        rows = df.height(),
        "market join"
    );

    let mut market_values = Vec::with_capacity(kept);
    let mut group_keys = Vec::with_capacity(kept);
    for idx in 0..df.height() {
        if !keep[idx] {
            continue;
        }
        let market = markets.get(&pub_keys[idx]).map(String::as_str).unwrap_or("");
        market_values.push(market.to_string());
        if market.is_empty() {
            group_keys.push(jobs[idx].clone());
        } else {
            group_keys.push(format!("{market}{}", jobs[idx]));
        }
    }

    let mut out = filter_rows(df, &keep)?;
    set_string_column(&mut out, &spec.market_column, market_values)?;
    set_string_column(&mut out, &spec.output_column, group_keys)?;

    let report =
        StageReport::new("market_key", df.height(), out.height()).with_matched(kept);
    Ok((out, report))
}

/// Exchange the contents of two columns (the aggregated group key swaps
/// back with the plain job number so downstream order lookups match on
/// the latter).
pub fn swap_column_pair(df: &DataFrame, spec: &SwapSpec) -> Result<(DataFrame, StageReport)> {
    let mut out = df.clone();
    swap_columns(&mut out, "records", &spec.left, &spec.right)?;
    let report = StageReport::new("swap_columns", df.height(), out.height());
    Ok((out, report))
}
