//! Join-key canonicalization.
//!
//! Every matching stage normalizes both sides of a join through
//! [`normalize_key`], so `"123"`, `" 123 "`, `123.0`, and `"1,230"`-style
//! values cannot drift apart between the records and a lookup table.

use polars::prelude::{AnyValue, DataFrame};

use revpipe_ingest::any_to_string;

use crate::columns::require_column;
use crate::error::Result;

/// Largest float magnitude collapsed to an integer string. Beyond this,
/// f64 cannot represent every integer exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Canonicalize a raw value into a join key.
///
/// Empty/missing → empty string. Numeric-looking values (thousands
/// separators allowed) collapse to their integer string form when whole;
/// other numerics keep their separator-stripped text lowercased.
/// Everything else is trimmed and lowercased.
pub fn normalize_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let cleaned: String = trimmed.chars().filter(|ch| *ch != ',').collect();
    if let Ok(number) = cleaned.parse::<f64>() {
        if number.is_finite() && number.fract() == 0.0 && number.abs() <= MAX_EXACT_INT {
            return (number as i64).to_string();
        }
        return cleaned.to_lowercase();
    }
    trimmed.to_lowercase()
}

/// Normalize a cell, stringifying typed values first.
pub fn normalize_value(value: AnyValue<'_>) -> String {
    normalize_key(&any_to_string(value))
}

/// Normalized keys for an entire required column.
pub fn normalized_column(df: &DataFrame, table: &str, name: &str) -> Result<Vec<String>> {
    require_column(df, table, name)?;
    let column = df.column(name)?;
    let mut keys = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        keys.push(normalize_value(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_forms_are_equivalent() {
        assert_eq!(normalize_key("123"), "123");
        assert_eq!(normalize_key(" 123 "), "123");
        assert_eq!(normalize_key("123.0"), "123");
        assert_eq!(normalize_key("1,230"), "1230");
    }

    #[test]
    fn typed_values_match_text_values() {
        assert_eq!(normalize_value(AnyValue::Int64(123)), "123");
        assert_eq!(normalize_value(AnyValue::Float64(123.0)), "123");
        assert_eq!(normalize_value(AnyValue::String(" 123 ")), "123");
        assert_eq!(normalize_value(AnyValue::Null), "");
    }

    #[test]
    fn text_is_trimmed_and_lowercased() {
        assert_eq!(normalize_key("  Wave2, Wave2  "), "wave2, wave2");
        assert_eq!(normalize_key("ACME Media"), "acme media");
    }

    #[test]
    fn non_whole_numbers_keep_their_text() {
        assert_eq!(normalize_key("1.5"), "1.5");
        assert_eq!(normalize_key("1,234.5"), "1234.5");
    }

    #[test]
    fn non_finite_numerics_stay_text() {
        assert_eq!(normalize_key("inf"), "inf");
        assert_eq!(normalize_key("NaN"), "nan");
        assert_eq!(normalize_key("1e300"), "1e300");
    }
}
