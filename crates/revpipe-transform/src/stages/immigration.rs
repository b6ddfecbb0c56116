//! Immigration flag conflict resolution (Boston).

use std::collections::{HashMap, HashSet};

use polars::prelude::{AnyValue, DataFrame};
use tracing::{debug, info, warn};

use revpipe_ingest::{any_to_f64, any_to_string};
use revpipe_model::{ImmigrationSpec, StageReport};

use crate::columns::{require_column, set_string_column, string_column};
use crate::context::StageContext;
use crate::error::Result;
use crate::normalize::normalized_column;

const EXAMPLE_LIMIT: usize = 5;

/// Normalized flag value: trimmed, uppercased, empty treated as missing.
fn normalize_flag(raw: &str) -> Option<String> {
    let upper = raw.trim().to_uppercase();
    if upper.is_empty() || upper == "NAN" {
        None
    } else {
        Some(upper)
    }
}

/// Coerce a lookup cell into a Y/N flag: truthy numerics and
/// `true`/`1` strings are Y, everything else is N.
fn to_flag(value: AnyValue<'_>) -> String {
    if let Some(number) = any_to_f64(value.clone()) {
        return if number == 1.0 { "Y" } else { "N" }.to_string();
    }
    let text = any_to_string(value);
    let lower = text.trim().to_lowercase();
    if lower == "true" || lower == "1" {
        "Y".to_string()
    } else {
        "N".to_string()
    }
}

/// Distinct non-missing flag values per normalized order key.
fn conflicting_keys(keys: &[String], flags: &[String]) -> Vec<String> {
    let mut seen: HashMap<&str, HashSet<String>> = HashMap::new();
    for (key, flag) in keys.iter().zip(flags) {
        if key.is_empty() {
            continue;
        }
        if let Some(value) = normalize_flag(flag) {
            seen.entry(key.as_str()).or_default().insert(value);
        }
    }
    seen.into_iter()
        .filter(|(_, values)| values.len() > 1)
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Standardize the immigration flag for orders whose rows disagree.
///
/// Only conflicting groups are touched; groups the lookup cannot
/// resolve keep their conflicting values and are reported as warnings,
/// never as errors.
pub fn resolve_immigration_flags(
    df: &DataFrame,
    spec: &ImmigrationSpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    require_column(df, "records", &spec.order_column)?;
    require_column(df, "records", &spec.flag_column)?;

    let keys = normalized_column(df, "records", &spec.order_column)?;
    let mut flags = string_column(df, "records", &spec.flag_column)?;
    let raw_orders = string_column(df, "records", &spec.order_column)?;

    let conflicts = conflicting_keys(&keys, &flags);
    let mut report = StageReport::new("immigration_flags", df.height(), df.height());
    if conflicts.is_empty() {
        debug!(partner = %ctx.partner, "no conflicting immigration flags; skipping lookup");
        return Ok((df.clone(), report));
    }
    let conflict_set: HashSet<&str> = conflicts.iter().map(String::as_str).collect();
    let conflict_rows = keys
        .iter()
        .filter(|key| conflict_set.contains(key.as_str()))
        .count();
    let examples = sample_orders(&keys, &raw_orders, &conflict_set);
    info!(
        partner = %ctx.partner,
        rows = conflict_rows,
        examples = ?examples,
        "conflicting immigration flags"
    );

    let source = spec.lookup.label();
    let lookup = ctx.lookups.load(&spec.lookup)?;
    require_column(&lookup, &source, &spec.lookup_order_column)?;
    require_column(&lookup, &source, &spec.lookup_flag_column)?;
    let lookup_keys = normalized_column(&lookup, &source, &spec.lookup_order_column)?;
    let flag_column = lookup.column(&spec.lookup_flag_column)?;
    let mut order_map: HashMap<String, String> = HashMap::new();
    for idx in 0..lookup.height() {
        if lookup_keys[idx].is_empty() {
            continue;
        }
        let value = flag_column.get(idx).unwrap_or(AnyValue::Null);
        order_map
            .entry(lookup_keys[idx].clone())
            .or_insert_with(|| to_flag(value));
    }

    let mut resolved = 0usize;
    for idx in 0..df.height() {
        if !conflict_set.contains(keys[idx].as_str()) {
            continue;
        }
        if let Some(flag) = order_map.get(&keys[idx]) {
            flags[idx] = flag.clone();
            resolved += 1;
        }
    }

    let missing: Vec<&str> = conflicts
        .iter()
        .map(String::as_str)
        .filter(|key| !order_map.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        let missing_set: HashSet<&str> = missing.iter().copied().collect();
        let examples = sample_orders(&keys, &raw_orders, &missing_set);
        let message = format!(
            "{} conflicting order keys not found in lookup (examples: {})",
            missing.len(),
            examples.join(", ")
        );
        warn!(partner = %ctx.partner, "{message}");
        report.warnings.push(message);
    }

    let remaining = conflicting_keys(&keys, &flags);
    if !remaining.is_empty() {
        let remaining_set: HashSet<&str> = remaining.iter().map(String::as_str).collect();
        let rows = keys
            .iter()
            .filter(|key| remaining_set.contains(key.as_str()))
            .count();
        let message =
            format!("{rows} rows still have conflicting immigration flags after lookup");
        warn!(partner = %ctx.partner, "{message}");
        report.warnings.push(message);
    }

    let mut out = df.clone();
    set_string_column(&mut out, &spec.flag_column, flags)?;
    report.matched = Some(resolved);
    report.flagged = Some(conflict_rows);
    Ok((out, report))
}

/// First few distinct raw order identifiers whose key is in the set.
fn sample_orders(keys: &[String], raw_orders: &[String], set: &HashSet<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut examples = Vec::new();
    for (key, raw) in keys.iter().zip(raw_orders) {
        if !set.contains(key.as_str()) {
            continue;
        }
        if seen.insert(raw.clone()) {
            examples.push(raw.clone());
            if examples.len() == EXAMPLE_LIMIT {
                break;
            }
        }
    }
    examples
}
