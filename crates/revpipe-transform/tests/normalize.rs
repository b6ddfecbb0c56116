//! Join-key normalization properties.

use proptest::prelude::*;

use revpipe_transform::normalize_key;

#[test]
fn equivalent_numeric_forms_share_a_key() {
    assert_eq!(normalize_key("123"), normalize_key(" 123 "));
    assert_eq!(normalize_key("123"), normalize_key("123.0"));
    assert_eq!(normalize_key("123"), normalize_key("123.000"));
    assert_eq!(normalize_key("1230"), normalize_key("1,230"));
}

#[test]
fn missing_values_normalize_to_empty() {
    assert_eq!(normalize_key(""), "");
    assert_eq!(normalize_key("   "), "");
}

#[test]
fn distinct_orders_stay_distinct() {
    assert_ne!(normalize_key("123"), normalize_key("1234"));
    assert_ne!(normalize_key("12.5"), normalize_key("125"));
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in ".*") {
        let once = normalize_key(&raw);
        let twice = normalize_key(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn whole_numbers_collapse_to_integer_form(n in -1_000_000i64..1_000_000) {
        let as_float = format!("{n}.0");
        prop_assert_eq!(normalize_key(&as_float), n.to_string());
        let padded = format!("  {n}  ");
        prop_assert_eq!(normalize_key(&padded), n.to_string());
    }
}
