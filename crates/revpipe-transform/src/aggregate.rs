//! Revenue aggregation: line-level rows collapsed into order-level
//! records.

use std::collections::HashMap;

use polars::prelude::{DataFrame, UInt32Chunked};
use tracing::debug;

use revpipe_model::AggregateSpec;

use crate::columns::{
    filter_rows, has_column, numeric_column_f64, raw_string_column, require_column,
    set_f64_column, set_i64_column, set_string_column, string_column,
};
use crate::error::Result;

/// Group rows by the exact value of the group column: descriptive
/// columns take the value from the first row of the group (in original
/// row order), the money column sums, and a count column records how
/// many rows contributed. Output keeps one row per group in the order
/// groups first appeared.
pub fn aggregate(df: &DataFrame, spec: &AggregateSpec) -> Result<DataFrame> {
    let mut frame = df.clone();
    if !has_column(&frame, &spec.group_column) {
        if let Some(source) = &spec.derive_group_from {
            let values = string_column(&frame, "records", source)?;
            set_string_column(&mut frame, &spec.group_column, values)?;
        }
    }
    require_column(&frame, "records", &spec.group_column)?;

    let keys = raw_string_column(&frame, "records", &spec.group_column)?;
    let money: Vec<f64> = numeric_column_f64(&frame, "records", &spec.money_source)?
        .into_iter()
        .map(|value| value.unwrap_or(0.0))
        .collect();

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut first_indices: Vec<u32> = Vec::new();
    let mut sums: Vec<f64> = Vec::new();
    let mut counts: Vec<i64> = Vec::new();
    for (idx, key) in keys.iter().enumerate() {
        match positions.get(key.as_str()) {
            Some(&pos) => {
                sums[pos] += money[idx];
                counts[pos] += 1;
            }
            None => {
                positions.insert(key.as_str(), first_indices.len());
                first_indices.push(idx as u32);
                sums.push(money[idx]);
                counts.push(1);
            }
        }
    }
    debug!(
        groups = first_indices.len(),
        rows = frame.height(),
        "aggregated revenue groups"
    );

    let take = UInt32Chunked::from_vec("take".into(), first_indices);
    let mut out = frame.take(&take)?;
    set_f64_column(&mut out, &spec.money_column, sums.clone())?;
    set_i64_column(&mut out, &spec.count_column, counts)?;

    // Group, money, and count columns move to the end of the layout.
    let tail = [
        spec.group_column.as_str(),
        spec.money_column.as_str(),
        spec.count_column.as_str(),
    ];
    let mut order: Vec<String> = out
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .filter(|name| !tail.contains(&name.as_str()))
        .collect();
    order.extend(tail.iter().map(|name| (*name).to_string()));
    let mut out = out.select(order)?;

    if spec.drop_zero {
        let keep: Vec<bool> = sums.iter().map(|sum| *sum != 0.0).collect();
        out = filter_rows(&out, &keep)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, DataFrame};

    use super::aggregate;
    use crate::columns::{numeric_column_i64, raw_string_column};
    use revpipe_model::AggregateSpec;

    fn spec(drop_zero: bool) -> AggregateSpec {
        AggregateSpec {
            group_column: "Order #".to_string(),
            derive_group_from: None,
            money_column: "Sum of 'Revenue'".to_string(),
            money_source: "Revenue".to_string(),
            count_column: "Count of matches".to_string(),
            drop_zero,
        }
    }

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Order #".into(), vec!["A", "A", "B"]),
            Column::new("Customer".into(), vec!["first", "second", "third"]),
            Column::new("Revenue".into(), vec![10.0, 5.0, 7.0]),
        ])
        .unwrap()
    }

    #[test]
    fn sums_and_counts_per_group() {
        let out = aggregate(&sample(), &spec(false)).unwrap();
        assert_eq!(out.height(), 2);
        let orders = raw_string_column(&out, "out", "Order #").unwrap();
        assert_eq!(orders, vec!["A", "B"]);
        let sums = crate::columns::numeric_column_f64(&out, "out", "Sum of 'Revenue'").unwrap();
        assert_eq!(sums, vec![Some(15.0), Some(7.0)]);
        let counts = numeric_column_i64(&out, "out", "Count of matches").unwrap();
        assert_eq!(counts, vec![Some(2), Some(1)]);
    }

    #[test]
    fn descriptive_columns_take_first_row() {
        let out = aggregate(&sample(), &spec(false)).unwrap();
        let customers = raw_string_column(&out, "out", "Customer").unwrap();
        assert_eq!(customers, vec!["first", "third"]);
    }

    #[test]
    fn group_money_count_move_to_the_end() {
        let out = aggregate(&sample(), &spec(false)).unwrap();
        let names: Vec<String> = out
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Customer", "Order #", "Sum of 'Revenue'", "Count of matches"]
        );
    }

    #[test]
    fn zero_sum_groups_drop_when_configured() {
        let df = DataFrame::new(vec![
            Column::new("Order #".into(), vec!["A", "C", "C"]),
            Column::new("Revenue".into(), vec![3.0, 4.0, -4.0]),
        ])
        .unwrap();
        let out = aggregate(&df, &spec(true)).unwrap();
        let orders = raw_string_column(&out, "out", "Order #").unwrap();
        assert_eq!(orders, vec!["A"]);
    }

    #[test]
    fn conservation_of_money_and_counts() {
        let df = DataFrame::new(vec![
            Column::new("Order #".into(), vec!["A", "B", "A", "C", "B"]),
            Column::new("Revenue".into(), vec![1.5, 2.0, 3.5, 4.0, 6.0]),
        ])
        .unwrap();
        let out = aggregate(&df, &spec(false)).unwrap();
        let sums = crate::columns::numeric_column_f64(&out, "out", "Sum of 'Revenue'").unwrap();
        let total: f64 = sums.into_iter().flatten().sum();
        assert!((total - 17.0).abs() < 1e-9);
        let counts = numeric_column_i64(&out, "out", "Count of matches").unwrap();
        let rows: i64 = counts.into_iter().flatten().sum();
        assert_eq!(rows, 5);
    }

    #[test]
    fn group_key_derives_from_source_when_absent() {
        let df = DataFrame::new(vec![
            Column::new("Job Number".into(), vec!["7", "7"]),
            Column::new("Revenue".into(), vec![1.0, 2.0]),
        ])
        .unwrap();
        let mut with_derive = spec(false);
        with_derive.group_column = "Job Number +".to_string();
        with_derive.derive_group_from = Some("Job Number".to_string());
        let out = aggregate(&df, &with_derive).unwrap();
        assert_eq!(out.height(), 1);
        let keys = raw_string_column(&out, "out", "Job Number +").unwrap();
        assert_eq!(keys, vec!["7"]);
    }

    #[test]
    fn non_numeric_money_coerces_to_zero() {
        let df = DataFrame::new(vec![
            Column::new("Order #".into(), vec!["A", "A"]),
            Column::new("Revenue".into(), vec!["junk", "5"]),
        ])
        .unwrap();
        let out = aggregate(&df, &spec(false)).unwrap();
        let sums = crate::columns::numeric_column_f64(&out, "out", "Sum of 'Revenue'").unwrap();
        assert_eq!(sums, vec![Some(5.0)]);
    }
}
