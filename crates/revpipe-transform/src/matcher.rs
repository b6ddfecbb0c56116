//! Generic cascading lookup matcher.
//!
//! A cascade is an ordered list of `(record column, lookup column)`
//! pairs. Records match on the strongest key first and fall back to
//! weaker keys only while still unresolved; a value resolved by an
//! earlier pair is never overwritten by a later one.

use std::collections::HashMap;

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tracing::debug;

use revpipe_ingest::parse_date;
use revpipe_model::{DuplicatePolicy, KeyPair, MatchDiagnostics, MatchPass};

use crate::columns::{require_column, string_column};
use crate::error::{Result, TransformError};
use crate::normalize::normalized_column;

/// Parameters of one cascading match against a lookup table.
pub struct CascadeSpec<'a> {
    /// Lookup label for diagnostics and errors.
    pub source: &'a str,
    /// Partner name matched as a case-insensitive substring of the
    /// company column (intentionally not an exact match).
    pub partner: &'a str,
    pub company_column: &'a str,
    /// Validity-date column; rows that fail to parse are dropped.
    pub date_column: &'a str,
    pub keys: &'a [KeyPair],
    pub policy: DuplicatePolicy,
}

/// Lookup rows surviving the partner filter and date parse.
struct UsableRows {
    /// Index into the lookup frame, paired with the parsed validity date.
    rows: Vec<(usize, NaiveDate)>,
}

fn usable_rows(lookup: &DataFrame, spec: &CascadeSpec<'_>) -> Result<UsableRows> {
    require_column(lookup, spec.source, spec.company_column)?;
    require_column(lookup, spec.source, spec.date_column)?;
    let companies = string_column(lookup, spec.source, spec.company_column)?;
    let dates = string_column(lookup, spec.source, spec.date_column)?;
    let partner_lower = spec.partner.to_lowercase();
    let mut rows = Vec::new();
    for idx in 0..lookup.height() {
        if !companies[idx].to_lowercase().contains(&partner_lower) {
            continue;
        }
        if let Some(date) = parse_date(&dates[idx]) {
            rows.push((idx, date));
        }
    }
    if rows.is_empty() {
        return Err(TransformError::lookup_empty(spec.source, spec.partner));
    }
    Ok(UsableRows { rows })
}

/// Resolve a validity date per record via the cascade.
///
/// Returns one `Option<NaiveDate>` per record (None = no match) plus the
/// per-pass diagnostics.
pub fn resolve_dates(
    records: &DataFrame,
    lookup: &DataFrame,
    spec: &CascadeSpec<'_>,
) -> Result<(Vec<Option<NaiveDate>>, MatchDiagnostics)> {
    for pair in spec.keys {
        require_column(lookup, spec.source, &pair.lookup_column)?;
        require_column(records, "records", &pair.record_column)?;
    }
    let usable = usable_rows(lookup, spec)?;

    let mut resolved: Vec<Option<NaiveDate>> = vec![None; records.height()];
    let mut diagnostics = MatchDiagnostics {
        lookup_rows: usable.rows.len(),
        passes: Vec::new(),
        resolved: 0,
        total: records.height(),
    };
    debug!(
        source = spec.source,
        partner = spec.partner,
        rows = usable.rows.len(),
        "lookup rows after partner filter"
    );

    for pair in spec.keys {
        if resolved.iter().all(Option::is_some) {
            break;
        }
        let lookup_keys = normalized_column(lookup, spec.source, &pair.lookup_column)?;
        let mut map: HashMap<&str, NaiveDate> = HashMap::new();
        for (idx, date) in &usable.rows {
            let key = lookup_keys[*idx].as_str();
            if key.is_empty() {
                continue;
            }
            match spec.policy {
                DuplicatePolicy::KeepFirst => {
                    map.entry(key).or_insert(*date);
                }
                DuplicatePolicy::KeepLast => {
                    map.insert(key, *date);
                }
            }
        }

        let record_keys = normalized_column(records, "records", &pair.record_column)?;
        let mut matched = 0usize;
        for (idx, slot) in resolved.iter_mut().enumerate() {
            if slot.is_some() {
                continue;
            }
            let key = record_keys[idx].as_str();
            if key.is_empty() {
                continue;
            }
            if let Some(date) = map.get(key) {
                *slot = Some(*date);
                matched += 1;
            }
        }
        debug!(
            record_column = %pair.record_column,
            lookup_column = %pair.lookup_column,
            matched,
            "cascade pass"
        );
        diagnostics.passes.push(MatchPass {
            record_column: pair.record_column.clone(),
            lookup_column: pair.lookup_column.clone(),
            matched,
        });
    }

    diagnostics.resolved = resolved.iter().filter(|slot| slot.is_some()).count();
    Ok((resolved, diagnostics))
}

/// Build a normalized-key → value map from two lookup columns, without
/// partner or date filtering. Empty keys and empty values are skipped.
pub fn build_value_map(
    lookup: &DataFrame,
    source: &str,
    key_column: &str,
    value_column: &str,
    policy: DuplicatePolicy,
) -> Result<HashMap<String, String>> {
    let keys = normalized_column(lookup, source, key_column)?;
    let values = string_column(lookup, source, value_column)?;
    let mut map = HashMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        if key.is_empty() || value.is_empty() {
            continue;
        }
        match policy {
            DuplicatePolicy::KeepFirst => {
                map.entry(key).or_insert(value);
            }
            DuplicatePolicy::KeepLast => {
                map.insert(key, value);
            }
        }
    }
    Ok(map)
}

/// Indices of lookup rows whose company column contains the partner.
pub fn partner_rows(
    lookup: &DataFrame,
    source: &str,
    company_column: &str,
    partner: &str,
) -> Result<Vec<usize>> {
    let companies = string_column(lookup, source, company_column)?;
    let partner_lower = partner.to_lowercase();
    Ok((0..lookup.height())
        .filter(|idx| companies[*idx].to_lowercase().contains(&partner_lower))
        .collect())
}
