//! MSP classification stages: roster tagging, reference enrichment,
//! and section-based category classification.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use tracing::{debug, info};

use revpipe_model::{
    ClassCategorySpec, ColumnCatalog, DuplicatePolicy, ReferenceSpec, RosterSpec, StageReport,
};

use crate::columns::{has_column, set_string_column, string_column, value_at};
use crate::context::StageContext;
use crate::error::{Result, TransformError};
use crate::matcher::build_value_map;
use crate::normalize::{normalize_key, normalized_column};

/// Classify each record as MSP or Non-MSP by roster membership.
///
/// The roster is filtered to rows whose system column contains the
/// partner name, deduplicated keep-first on the normalized agent name,
/// and the excluded sentinel agent never joins the roster regardless of
/// case.
pub fn tag_msp_roster(
    df: &DataFrame,
    spec: &RosterSpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    let source = spec.lookup.label();
    let lookup = ctx.lookups.load(&spec.lookup)?;
    let systems = string_column(&lookup, &source, &spec.system_column)?;
    let agents = normalized_column(&lookup, &source, &spec.agent_column)?;

    let partner_lower = ctx.partner.name().to_lowercase();
    let excluded = normalize_key(&spec.excluded_agent);
    let mut roster: HashSet<&str> = HashSet::new();
    for idx in 0..lookup.height() {
        if !systems[idx].to_lowercase().contains(&partner_lower) {
            continue;
        }
        let agent = agents[idx].as_str();
        if agent.is_empty() || agent == excluded {
            continue;
        }
        roster.insert(agent);
    }
    if roster.is_empty() {
        return Err(TransformError::lookup_empty(source, ctx.partner.name()));
    }

    let names = normalized_column(df, "records", &spec.name_column)?;
    let mut classes = Vec::with_capacity(df.height());
    let mut matched = 0usize;
    for name in &names {
        if !name.is_empty() && roster.contains(name.as_str()) {
            classes.push("MSP".to_string());
            matched += 1;
        } else {
            classes.push("Non-MSP".to_string());
        }
    }
    info!(partner = %ctx.partner, roster = roster.len(), matched, "msp roster tagging");

    let mut out = df.clone();
    set_string_column(&mut out, &spec.output_column, classes)?;
    let report = StageReport::new("msp_roster", df.height(), out.height())
        .with_matched(matched)
        .with_flagged(matched);
    Ok((out, report))
}

/// Resolve unassigned salesperson rows through the job reference list.
///
/// Rows whose salesperson normalizes to one of the unassigned sentinels
/// are looked up by job identifier (keep-last duplicates): matches get
/// the resolved agent and MSP, misses fall back to the fallback agent
/// and Non-MSP. The section override runs strictly after the job pass so
/// rows the job pass resolved are judged on their resolved agent.
pub fn enrich_msp_reference(
    df: &DataFrame,
    spec: &ReferenceSpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    let catalog = ColumnCatalog::new(df.get_column_names().iter().map(|name| name.as_str()));
    let job_column = spec
        .job_columns
        .iter()
        .find_map(|name| catalog.resolve(name))
        .ok_or_else(|| {
            TransformError::missing_column("records", spec.job_columns.join(" | "))
        })?;
    let mut names = string_column(df, "records", &spec.name_column)?;

    let source = spec.lookup.label();
    let lookup = ctx.lookups.load(&spec.lookup)?;
    let job_map = build_value_map(
        &lookup,
        &source,
        &spec.lookup_job_column,
        &spec.lookup_agent_column,
        DuplicatePolicy::KeepLast,
    )?;

    let unassigned: HashSet<String> = spec
        .unassigned_names
        .iter()
        .map(|name| normalize_key(name))
        .collect();
    let job_keys = normalized_column(df, "records", job_column)?;

    let has_msp = has_column(df, &spec.msp_column);
    let mut msp_classes: Vec<String> = if has_msp {
        string_column(df, "records", &spec.msp_column)?
    } else {
        Vec::new()
    };

    let mut targets = 0usize;
    let mut matched = 0usize;
    for idx in 0..df.height() {
        if !unassigned.contains(&normalize_key(&names[idx])) {
            continue;
        }
        targets += 1;
        match job_map.get(&job_keys[idx]) {
            Some(agent) => {
                names[idx] = agent.clone();
                if has_msp {
                    msp_classes[idx] = "MSP".to_string();
                }
                matched += 1;
            }
            None => {
                names[idx] = spec.fallback_agent.clone();
                if has_msp {
                    msp_classes[idx] = "Non-MSP".to_string();
                }
            }
        }
    }
    if targets == 0 {
        debug!(partner = %ctx.partner, "no unassigned salesperson records; skipping reference enrichment");
    } else {
        info!(partner = %ctx.partner, targets, matched, "msp reference enrichment");
    }

    // Blanket section override, applied after the job pass: rows in the
    // override section reset to the fallback agent unless the current
    // salesperson is allow-listed.
    let mut overridden = 0usize;
    if has_column(df, &spec.section_column) {
        let sections = string_column(df, "records", &spec.section_column)?;
        let allowed: HashSet<&str> = spec
            .allowed_agents
            .iter()
            .map(String::as_str)
            .collect();
        for idx in 0..df.height() {
            if sections[idx] != spec.override_section {
                continue;
            }
            if allowed.contains(names[idx].trim()) {
                continue;
            }
            names[idx] = spec.fallback_agent.clone();
            if has_msp {
                msp_classes[idx] = "Non-MSP".to_string();
            }
            overridden += 1;
        }
        if overridden > 0 {
            info!(partner = %ctx.partner, overridden, section = %spec.override_section, "section override applied");
        }
    }

    let mut out = df.clone();
    set_string_column(&mut out, &spec.name_column, names)?;
    if has_msp {
        set_string_column(&mut out, &spec.msp_column, msp_classes)?;
    }

    let report = StageReport::new("msp_reference", df.height(), out.height())
        .with_matched(matched)
        .with_flagged(targets + overridden);
    Ok((out, report))
}

/// Map a normalized section value to an ad category (Pittsburgh).
///
/// Records with no match keep their existing category when one is
/// present, and default to the configured literal otherwise.
pub fn classify_sections(
    df: &DataFrame,
    spec: &ClassCategorySpec,
    ctx: &StageContext<'_>,
) -> Result<(DataFrame, StageReport)> {
    let source = spec.lookup.label();
    let lookup = ctx.lookups.load(&spec.lookup)?;
    let categories = build_value_map(
        &lookup,
        &source,
        &spec.lookup_key_column,
        &spec.lookup_value_column,
        DuplicatePolicy::KeepFirst,
    )?;

    let sections = normalized_column(df, "records", &spec.section_column)?;
    let existing = has_column(df, &spec.output_column);
    let mut values = Vec::with_capacity(df.height());
    let mut matched = 0usize;
    for (idx, section) in sections.iter().enumerate() {
        match categories.get(section) {
            Some(category) => {
                values.push(category.clone());
                matched += 1;
            }
            None => {
                let current = if existing {
                    value_at(df, &spec.output_column, idx).trim().to_string()
                } else {
                    String::new()
                };
                if current.is_empty() {
                    values.push(spec.default_category.clone());
                } else {
                    values.push(current);
                }
            }
        }
    }
    info!(partner = %ctx.partner, matched, rows = df.height(), "section classification");

    let mut out = df.clone();
    set_string_column(&mut out, &spec.output_column, values)?;
    let report = StageReport::new("class_category", df.height(), out.height())
        .with_matched(matched);
    Ok((out, report))
}
