//! Missing value analysis

use anyhow::Result;
use polars::prelude::*;

/// Missing ratio (`null_count / row_count`) of every column, sorted descending.
///
/// NaN entries in float columns count as missing.
pub fn analyze_missing_values(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = Vec::new();

    for column in df.get_columns() {
        let nan_count = if column.dtype().is_float() {
            column
                .cast(&DataType::Float64)?
                .f64()?
                .iter()
                .filter(|v| v.is_some_and(f64::is_nan))
                .count()
        } else {
            0
        };

        let missing = column.null_count() + nan_count;
        missing_ratios.push((column.name().to_string(), missing as f64 / rows));
    }

    // Sort by missing ratio descending, stable for equal ratios
    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_ratios)
}

/// Columns (other than the target) whose missing ratio exceeds `threshold`
pub fn get_features_above_threshold(
    missing_ratios: &[(String, f64)],
    threshold: f64,
    target_column: &str,
) -> Vec<String> {
    missing_ratios
        .iter()
        .filter(|(name, ratio)| *ratio > threshold && name != target_column)
        .map(|(name, _)| name.clone())
        .collect()
}
