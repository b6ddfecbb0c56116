//! Partner run orchestration: directory scaffold, raw load, plan
//! execution, and output writing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use polars::prelude::DataFrame;
use tracing::info;

use revpipe_ingest::{load_sheet, sheet_path};
use revpipe_model::{LookupRef, Partner};
use revpipe_report::{write_sheet, WriteMode};
use revpipe_transform::{execute_plan, LookupSource, StageContext, TransformError};

use crate::plans;
use crate::types::RunResult;

/// Directory overrides for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root data directory (default `data`).
    pub data_dir: PathBuf,
    /// Shared lookup directory (default `<data_dir>/lookups`).
    pub lookup_dir: Option<PathBuf>,
    /// Output directory (default `<data_dir>/<partner>/processed`).
    pub output_dir: Option<PathBuf>,
    /// Execute the pipeline but skip writing the output sheet.
    pub dry_run: bool,
}

struct PartnerPaths {
    raw_dir: PathBuf,
    lookup_roots: Vec<PathBuf>,
    output_dir: PathBuf,
}

fn resolve_paths(partner: Partner, options: &RunOptions) -> Result<PartnerPaths> {
    let partner_dir = options.data_dir.join(partner.slug());
    let raw_dir = partner_dir.join("raw");
    let partner_lookup_dir = partner_dir.join("lookups");
    let common_lookup_dir = options
        .lookup_dir
        .clone()
        .unwrap_or_else(|| options.data_dir.join("lookups"));
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| partner_dir.join("processed"));
    for dir in [&raw_dir, &partner_lookup_dir, &common_lookup_dir, &output_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("create directory: {}", dir.display()))?;
    }
    Ok(PartnerPaths {
        raw_dir: raw_dir.clone(),
        // Partner-specific lookups shadow the shared ones; the raw
        // directory comes last for workbooks that carry their own
        // reference sheets (e.g. the Hearst market list).
        lookup_roots: vec![partner_lookup_dir, common_lookup_dir, raw_dir],
        output_dir,
    })
}

/// Directory-backed lookup provider searching a list of roots in order.
struct DirLookups {
    roots: Vec<PathBuf>,
}

impl LookupSource for DirLookups {
    fn load(
        &self,
        lookup: &LookupRef,
    ) -> std::result::Result<DataFrame, TransformError> {
        for root in &self.roots {
            let path = sheet_path(root, &lookup.file, lookup.sheet.as_deref());
            if !path.exists() {
                continue;
            }
            return load_sheet(root, &lookup.file, lookup.sheet.as_deref(), &[])
                .map_err(|error| TransformError::Source(error.to_string()));
        }
        Err(TransformError::Source(format!(
            "lookup '{}' not found under {}",
            lookup.label(),
            self.roots
                .iter()
                .map(|root| root.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

fn load_raw(partner: Partner, raw_dir: &Path) -> Result<DataFrame> {
    let (file, sheet, hints) = plans::raw_source(partner);
    let frame = load_sheet(raw_dir, file, sheet, &hints)
        .with_context(|| format!("load raw extract for {partner}"))?;
    info!(partner = %partner, rows = frame.height(), "raw extract loaded");
    Ok(frame)
}

/// Run one partner pipeline end-to-end.
pub fn run_partner(partner: Partner, options: &RunOptions) -> Result<RunResult> {
    run_partner_at(partner, options, Local::now().date_naive())
}

/// Like [`run_partner`] with an explicit "today" for deterministic runs.
pub fn run_partner_at(
    partner: Partner,
    options: &RunOptions,
    today: NaiveDate,
) -> Result<RunResult> {
    info!(partner = %partner, "processing partner extract");
    let paths = resolve_paths(partner, options)?;
    let raw = load_raw(partner, &paths.raw_dir)?;
    let rows_in = raw.height();

    let plan = plans::plan_for(partner);
    let lookups = DirLookups {
        roots: paths.lookup_roots,
    };
    let ctx = StageContext::new(partner, today, &lookups);
    let (out, reports) = execute_plan(raw, &plan, &ctx)?;

    let output_path = if options.dry_run {
        info!(partner = %partner, "dry run; skipping output");
        None
    } else {
        let (workbook, sheet) = plans::output_target(partner);
        let path = write_sheet(&out, &paths.output_dir, workbook, sheet, WriteMode::Overwrite)?;
        info!(partner = %partner, path = %path.display(), "output written");
        Some(path)
    };

    Ok(RunResult {
        partner,
        rows_in,
        rows_out: out.height(),
        output_path,
        reports,
    })
}
