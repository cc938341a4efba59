//! Unit tests for missing value analysis

use gbscale::pipeline::{analyze_missing_values, get_features_above_threshold};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_analyze_missing_values_basic() {
    let df = df! {
        "col_complete" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "col_partial_missing" => [Some(1.0f64), Some(2.0), None, None, Some(5.0)],
        "col_all_missing" => [None::<f64>, None, None, None, None],
    }
    .unwrap();

    let ratios = analyze_missing_values(&df).unwrap();
    let ratio_map: std::collections::HashMap<_, _> = ratios.into_iter().collect();

    assert!((ratio_map["col_complete"] - 0.0).abs() < 0.001);
    assert!((ratio_map["col_partial_missing"] - 0.4).abs() < 0.001);
    assert!((ratio_map["col_all_missing"] - 1.0).abs() < 0.001);
}

#[test]
fn test_nan_counts_as_missing() {
    let df = df! {
        "esf" => [1.0f64, f64::NAN, 3.0, 4.0],
    }
    .unwrap();

    let ratios = analyze_missing_values(&df).unwrap();

    assert!((ratios[0].1 - 0.25).abs() < 1e-12);
}

#[test]
fn test_analyze_missing_values_sorted_descending() {
    let df = common::create_observation_dataframe_with_missing();

    let ratios = analyze_missing_values(&df).unwrap();

    assert_eq!(ratios[0].0, "empty");
    for pair in ratios.windows(2) {
        assert!(
            pair[0].1 >= pair[1].1,
            "Ratios should be sorted descending: {} >= {}",
            pair[0].1,
            pair[1].1
        );
    }
}

#[test]
fn test_empty_dataframe() {
    let df = DataFrame::empty();
    assert!(analyze_missing_values(&df).unwrap().is_empty());
}

#[test]
fn test_threshold_excludes_target() {
    let ratios = vec![
        ("gb_coeff".to_string(), 0.5),
        ("esf".to_string(), 0.4),
        ("c44".to_string(), 0.1),
    ];

    let above = get_features_above_threshold(&ratios, 0.3, "gb_coeff");

    assert_eq!(above, vec!["esf"]);
}
