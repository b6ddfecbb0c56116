//! Workbook/sheet loading into typed DataFrames.

use std::path::{Path, PathBuf};

use polars::prelude::{Column, DataFrame};
use tracing::debug;

use revpipe_model::{ColumnHint, ColumnKind};

use crate::dates::{format_iso_date, parse_date};
use crate::error::{IngestError, Result};
use crate::sheet::{read_csv_sheet, CsvSheet};
use crate::values::parse_f64;

/// Resolve the on-disk path of a sheet: `dir/workbook/sheet.csv`, or
/// `dir/workbook.csv` for a flat table.
pub fn sheet_path(dir: &Path, workbook: &str, sheet: Option<&str>) -> PathBuf {
    match sheet {
        Some(sheet) => dir.join(workbook).join(format!("{sheet}.csv")),
        None => dir.join(format!("{workbook}.csv")),
    }
}

/// Load a sheet into a DataFrame, coercing hinted columns.
///
/// A missing file fails with [`IngestError::NotFound`].
pub fn load_sheet(
    dir: &Path,
    workbook: &str,
    sheet: Option<&str>,
    hints: &[ColumnHint],
) -> Result<DataFrame> {
    let path = sheet_path(dir, workbook, sheet);
    if !path.exists() {
        return Err(IngestError::NotFound(path));
    }
    let table = read_csv_sheet(&path)?;
    let frame = build_frame(&table, hints)?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "loaded sheet"
    );
    Ok(frame)
}

fn hint_for<'a>(hints: &'a [ColumnHint], header: &str) -> Option<&'a ColumnHint> {
    hints
        .iter()
        .find(|hint| hint.column.eq_ignore_ascii_case(header))
}

/// Build a typed DataFrame from a raw sheet.
///
/// Hinted integer/real columns coerce per cell (non-numeric → null) into
/// nullable Int64/Float64; date columns parse with invalid values
/// becoming null and are stored as ISO strings. Unhinted columns stay
/// text unless every non-empty cell is numeric, in which case they
/// become Float64.
pub fn build_frame(sheet: &CsvSheet, hints: &[ColumnHint]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(sheet.headers.len());
    for (col_idx, header) in sheet.headers.iter().enumerate() {
        let cells: Vec<&str> = sheet
            .rows
            .iter()
            .map(|row| row.get(col_idx).map(String::as_str).unwrap_or(""))
            .collect();
        let kind = match hint_for(hints, header) {
            Some(hint) => hint.kind,
            None => infer_kind(&cells),
        };
        let column = match kind {
            ColumnKind::Integer => {
                let values: Vec<Option<i64>> = cells
                    .iter()
                    .map(|cell| parse_f64(cell).map(|v| v as i64))
                    .collect();
                Column::new(header.as_str().into(), values)
            }
            ColumnKind::Real => {
                let values: Vec<Option<f64>> =
                    cells.iter().map(|cell| parse_f64(cell)).collect();
                Column::new(header.as_str().into(), values)
            }
            ColumnKind::Date => {
                let values: Vec<Option<String>> = cells
                    .iter()
                    .map(|cell| parse_date(cell).map(format_iso_date))
                    .collect();
                Column::new(header.as_str().into(), values)
            }
            ColumnKind::Text => {
                let values: Vec<String> = cells.iter().map(|cell| cell.to_string()).collect();
                Column::new(header.as_str().into(), values)
            }
        };
        columns.push(column);
    }
    Ok(DataFrame::new(columns)?)
}

fn infer_kind(cells: &[&str]) -> ColumnKind {
    let mut non_empty = 0usize;
    for cell in cells {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        non_empty += 1;
        if parse_f64(trimmed).is_none() {
            return ColumnKind::Text;
        }
    }
    if non_empty > 0 {
        ColumnKind::Real
    } else {
        ColumnKind::Text
    }
}
