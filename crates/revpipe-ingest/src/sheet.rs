//! Raw CSV sheet reading.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::Result;

/// A sheet as read from disk: trimmed headers plus string rows, before
/// any type coercion.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV sheet: the first row is the header, fully-empty rows are
/// skipped, short rows are padded to the header width.
pub fn read_csv_sheet(path: &Path) -> Result<CsvSheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        if headers.is_empty() {
            headers = record.iter().map(normalize_header).collect();
            continue;
        }
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).unwrap_or("");
            row.push(normalize_cell(value));
        }
        rows.push(row);
    }
    Ok(CsvSheet { headers, rows })
}
