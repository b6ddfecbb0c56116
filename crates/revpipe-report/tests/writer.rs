//! Sink workbook semantics.

use std::fs;

use polars::prelude::{Column, DataFrame};

use revpipe_report::{write_sheet, WriteMode};

fn sample() -> DataFrame {
    DataFrame::new(vec![
        Column::new("Order #".into(), vec!["A", "B"]),
        Column::new("Sum of 'Revenue'".into(), vec![15.0, 7.0]),
        Column::new("Count of matches".into(), vec![2i64, 1]),
    ])
    .unwrap()
}

#[test]
fn writes_headers_and_rendered_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sheet(
        &sample(),
        dir.path(),
        "Hearst Sisense",
        "Sisense",
        WriteMode::Overwrite,
    )
    .unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("Order #,Sum of 'Revenue',Count of matches")
    );
    // Whole floats render without a trailing .0.
    assert_eq!(lines.next(), Some("A,15,2"));
    assert_eq!(lines.next(), Some("B,7,1"));
}

#[test]
fn overwrite_clears_sibling_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("Report");
    fs::create_dir_all(&book).unwrap();
    fs::write(book.join("Old.csv"), "stale\n").unwrap();
    write_sheet(&sample(), dir.path(), "Report", "Sisense", WriteMode::Overwrite).unwrap();
    assert!(!book.join("Old.csv").exists());
    assert!(book.join("Sisense.csv").exists());
}

#[test]
fn append_preserves_sibling_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("Report");
    fs::create_dir_all(&book).unwrap();
    fs::write(book.join("Other.csv"), "kept\n").unwrap();
    fs::write(book.join("Sisense.csv"), "replaced\n").unwrap();
    write_sheet(&sample(), dir.path(), "Report", "Sisense", WriteMode::Append).unwrap();
    assert!(book.join("Other.csv").exists());
    let contents = fs::read_to_string(book.join("Sisense.csv")).unwrap();
    assert!(contents.starts_with("Order #"));
}
