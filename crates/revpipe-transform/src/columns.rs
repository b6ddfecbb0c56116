//! DataFrame column access and mutation helpers.
//!
//! All cell reads go through the ingest `AnyValue` helpers so typed and
//! text columns behave identically, and all required-column checks fail
//! with [`TransformError::MissingColumn`] naming the offending table.

use polars::prelude::{
    AnyValue, BooleanChunked, Column, DataFrame, NamedFrom, NewChunkedArray, Series,
};

use revpipe_ingest::{any_to_f64, any_to_i64, any_to_string};

use crate::error::{Result, TransformError};

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Fail with a schema error unless the column exists.
pub fn require_column(df: &DataFrame, table: &str, name: &str) -> Result<()> {
    if has_column(df, name) {
        Ok(())
    } else {
        Err(TransformError::missing_column(table, name))
    }
}

/// Single cell as a string; missing column or row yields empty.
pub fn value_at(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

/// All values of a required column, stringified and trimmed.
pub fn string_column(df: &DataFrame, table: &str, name: &str) -> Result<Vec<String>> {
    require_column(df, table, name)?;
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
        values.push(value.trim().to_string());
    }
    Ok(values)
}

/// All values of a required column, stringified without trimming.
pub fn raw_string_column(df: &DataFrame, table: &str, name: &str) -> Result<Vec<String>> {
    require_column(df, table, name)?;
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

pub fn numeric_column_f64(df: &DataFrame, table: &str, name: &str) -> Result<Vec<Option<f64>>> {
    require_column(df, table, name)?;
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

pub fn numeric_column_i64(df: &DataFrame, table: &str, name: &str) -> Result<Vec<Option<i64>>> {
    require_column(df, table, name)?;
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_i64(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

pub fn set_string_column(df: &mut DataFrame, name: &str, values: Vec<String>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub fn set_opt_string_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub fn set_f64_column(df: &mut DataFrame, name: &str, values: Vec<f64>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub fn set_i64_column(df: &mut DataFrame, name: &str, values: Vec<i64>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

/// Keep only the rows where `keep` is true.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Exchange the contents of two columns, keeping both names in place.
pub fn swap_columns(df: &mut DataFrame, table: &str, left: &str, right: &str) -> Result<()> {
    require_column(df, table, left)?;
    require_column(df, table, right)?;
    let left_col: Column = df.column(left)?.clone();
    let right_col: Column = df.column(right)?.clone();
    df.with_column(left_col.with_name(right.into()))?;
    df.with_column(right_col.with_name(left.into()))?;
    Ok(())
}
