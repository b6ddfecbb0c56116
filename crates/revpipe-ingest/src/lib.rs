//! Tabular source for the partner revenue pipeline.
//!
//! A "workbook" is a directory whose files are sheets: sheet `S` of
//! workbook `W` under directory `D` is the file `D/W/S.csv`, and a flat
//! (sheetless) table is `D/W.csv`. Sheets load into polars DataFrames,
//! optionally coerced per-column through [`revpipe_model::ColumnHint`]s.

pub mod dates;
pub mod error;
pub mod sheet;
pub mod values;
pub mod workbook;

pub use dates::{format_iso_date, parse_date};
pub use error::{IngestError, Result};
pub use sheet::{read_csv_sheet, CsvSheet};
pub use values::{any_to_f64, any_to_i64, any_to_string, format_numeric, parse_f64};
pub use workbook::{build_frame, load_sheet, sheet_path};
