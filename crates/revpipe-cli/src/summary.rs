//! Run summary rendering.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Partner: {}", result.partner);
    if let Some(path) = &result.output_path {
        println!("Output: {}", path.display());
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Matched"),
        header_cell("Flagged"),
        header_cell("Warnings"),
    ]);
    for column_idx in 1..=5 {
        if let Some(column) = table.column_mut(column_idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    for report in &result.reports {
        table.add_row(vec![
            Cell::new(&report.stage),
            Cell::new(report.rows_in),
            Cell::new(report.rows_out),
            count_cell(report.matched),
            count_cell(report.flagged),
            warning_cell(report.warnings.len()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.rows_in).add_attribute(Attribute::Bold),
        Cell::new(result.rows_out).add_attribute(Attribute::Bold),
        Cell::new("-"),
        Cell::new("-"),
        warning_cell(result.warning_count()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    for report in &result.reports {
        for warning in &report.warnings {
            eprintln!("warning [{}]: {warning}", report.stage);
        }
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(count) => Cell::new(count),
        None => Cell::new("-"),
    }
}

fn warning_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow)
    } else {
        Cell::new(count)
    }
}
