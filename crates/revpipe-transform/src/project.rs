//! Final column projection.

use polars::prelude::DataFrame;

use crate::error::Result;

/// Keep only the columns present in both the table and the requested
/// list, in the requested order. Requested columns absent from the table
/// are silently dropped; this never errors on unknown names.
pub fn project(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    let existing: Vec<&str> = columns
        .iter()
        .filter(|name| df.column(name.as_str()).is_ok())
        .map(String::as_str)
        .collect();
    Ok(df.select(existing)?)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, DataFrame};

    use super::project;

    #[test]
    fn keeps_intersection_in_requested_order() {
        let df = DataFrame::new(vec![
            Column::new("B".into(), vec![2i64, 3]),
            Column::new("A".into(), vec![1i64, 2]),
            Column::new("C".into(), vec![5i64, 6]),
        ])
        .unwrap();
        let out = project(
            &df,
            &["A".to_string(), "B".to_string(), "D".to_string()],
        )
        .unwrap();
        let names: Vec<String> = out
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn unknown_columns_never_error() {
        let df = DataFrame::new(vec![Column::new("A".into(), vec![1i64])]).unwrap();
        let out = project(&df, &["X".to_string(), "Y".to_string()]).unwrap();
        assert_eq!(out.width(), 0);
    }
}
