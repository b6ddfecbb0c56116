//! Sheet loading and type coercion tests.

use std::fs;

use polars::prelude::{AnyValue, DataType};

use revpipe_ingest::{any_to_string, load_sheet, sheet_path, IngestError};
use revpipe_model::{ColumnHint, ColumnKind};

#[test]
fn sheet_path_layout() {
    let dir = std::path::Path::new("/data");
    assert_eq!(
        sheet_path(dir, "Hearst Files", Some("Raw")),
        std::path::Path::new("/data/Hearst Files/Raw.csv")
    );
    assert_eq!(
        sheet_path(dir, "Strategic Orders", None),
        std::path::Path::new("/data/Strategic Orders.csv")
    );
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_sheet(dir.path(), "Nope", None, &[]);
    assert!(matches!(result, Err(IngestError::NotFound(_))));
}

#[test]
fn hinted_columns_coerce_per_cell() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("orders.csv"),
        "Job Number,Revenue,First Issue Date,Note\n\
         101,10.5,2024-01-02,ok\n\
         junk,n/a,never,\n\
         103,2,1/15/2024,fine\n",
    )
    .unwrap();

    let hints = vec![
        ColumnHint::new("Job Number", ColumnKind::Integer),
        ColumnHint::new("Revenue", ColumnKind::Real),
        ColumnHint::new("First Issue Date", ColumnKind::Date),
    ];
    let df = load_sheet(dir.path(), "orders", None, &hints).unwrap();

    let jobs = df.column("Job Number").unwrap();
    assert_eq!(jobs.dtype(), &DataType::Int64);
    assert_eq!(jobs.get(0).unwrap(), AnyValue::Int64(101));
    assert_eq!(jobs.get(1).unwrap(), AnyValue::Null);

    let revenue = df.column("Revenue").unwrap();
    assert_eq!(revenue.dtype(), &DataType::Float64);
    assert_eq!(revenue.get(1).unwrap(), AnyValue::Null);

    let dates = df.column("First Issue Date").unwrap();
    assert_eq!(
        any_to_string(dates.get(0).unwrap_or(AnyValue::Null)),
        "2024-01-02"
    );
    assert_eq!(any_to_string(dates.get(1).unwrap_or(AnyValue::Null)), "");
    assert_eq!(
        any_to_string(dates.get(2).unwrap_or(AnyValue::Null)),
        "2024-01-15"
    );
}

#[test]
fn unhinted_all_numeric_column_becomes_real() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("plain.csv"),
        "Amount,Label\n1.5,a\n2,b\n,c\n",
    )
    .unwrap();
    let df = load_sheet(dir.path(), "plain", None, &[]).unwrap();
    assert_eq!(df.column("Amount").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("Label").unwrap().dtype(), &DataType::String);
}

#[test]
fn named_sheet_loads_from_workbook_directory() {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("Hearst Files");
    fs::create_dir_all(&book).unwrap();
    fs::write(book.join("Raw.csv"), "Pub,Revenue\nTimes,5\n").unwrap();
    let df = load_sheet(dir.path(), "Hearst Files", Some("Raw"), &[]).unwrap();
    assert_eq!(df.height(), 1);
    assert_eq!(df.width(), 2);
}

#[test]
fn blank_rows_and_bom_headers_are_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("messy.csv"),
        "\u{feff}Order #, Section \nA1,News\n,,\nA2,Sports\n",
    )
    .unwrap();
    let df = load_sheet(dir.path(), "messy", None, &[]).unwrap();
    assert!(df.column("Order #").is_ok());
    assert!(df.column("Section").is_ok());
    assert_eq!(df.height(), 2);
}
