//! Sheet writing with workbook semantics.
//!
//! A workbook is a directory of sheet CSVs (mirroring the source side).
//! Overwrite mode produces a fresh workbook holding only the written
//! sheet; append mode replaces the named sheet in place, preserving the
//! workbook's other sheets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame};

use revpipe_ingest::any_to_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Overwrite,
    Append,
}

/// Write a table as sheet `sheet` of workbook `workbook` under `dir`,
/// creating directories as needed. Returns the written path.
pub fn write_sheet(
    df: &DataFrame,
    dir: &Path,
    workbook: &str,
    sheet: &str,
    mode: WriteMode,
) -> Result<PathBuf> {
    let book_dir = dir.join(workbook);
    fs::create_dir_all(&book_dir)
        .with_context(|| format!("create workbook dir: {}", book_dir.display()))?;

    if mode == WriteMode::Overwrite {
        remove_other_sheets(&book_dir, sheet)?;
    }

    let path = book_dir.join(format!("{sheet}.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("write sheet: {}", path.display()))?;

    let columns = df.get_columns();
    let names: Vec<&str> = columns.iter().map(|column| column.name().as_str()).collect();
    writer.write_record(&names)?;
    for idx in 0..df.height() {
        let row: Vec<String> = columns
            .iter()
            .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(path)
}

fn remove_other_sheets(book_dir: &Path, keep_sheet: &str) -> Result<()> {
    let keep = format!("{keep_sheet}.csv");
    for entry in fs::read_dir(book_dir)
        .with_context(|| format!("read workbook dir: {}", book_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let is_sheet = path.extension().is_some_and(|ext| ext == "csv");
        let is_kept = entry.file_name().to_string_lossy() == keep.as_str();
        if is_sheet && !is_kept {
            fs::remove_file(&path)
                .with_context(|| format!("remove sheet: {}", path.display()))?;
        }
    }
    Ok(())
}
