//! Exploratory correlation analysis between properties and the QoI

use std::cmp::Ordering;

use faer::Mat;
use polars::prelude::*;
use serde::Serialize;

use super::error::EvalResult;
use super::table::{column_values, require_columns};

/// Represents a correlated pair of properties
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Correlation of one property with the target
#[derive(Debug, Clone, Serialize)]
pub struct TargetCorrelation {
    pub feature: String,
    /// Pearson r, NaN when undefined
    pub correlation: f64,
    /// Rows where both the property and the target are observed
    pub observations: usize,
}

/// Symmetric Pearson correlation matrix over named columns.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[(i, j)])
    }
}

/// Pearson correlation over rows where both values are present, computed with
/// a single-pass Welford update for numerical stability.
///
/// Returns the correlation and the number of rows used, or `None` when fewer
/// than two rows overlap or either side has zero variance.
fn pairwise_pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> (Option<f64>, usize) {
    let mut n = 0usize;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            if x.is_nan() || y.is_nan() {
                continue;
            }
            n += 1;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n as f64;
            mean_y += dy / n as f64;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2 || var_x == 0.0 || var_y == 0.0 {
        return (None, n);
    }

    let r = cov_xy / (var_x.sqrt() * var_y.sqrt());
    (Some(r.clamp(-1.0, 1.0)), n)
}

/// Pairwise-complete correlation matrix of the given numeric columns.
///
/// The diagonal is 1 for columns with variance, NaN otherwise.
pub fn correlation_matrix<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
) -> EvalResult<CorrelationMatrix> {
    require_columns(df, columns)?;
    let values: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| column_values(df, c.as_ref()))
        .collect::<EvalResult<_>>()?;

    let n = columns.len();
    let mut matrix = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        for j in i..n {
            let r = pairwise_pearson(&values[i], &values[j]).0.unwrap_or(f64::NAN);
            matrix[(i, j)] = r;
            matrix[(j, i)] = r;
        }
    }

    Ok(CorrelationMatrix {
        names: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        values: matrix,
    })
}

/// Ordering used for correlation rankings: |r| descending, then name
/// ascending, undefined correlations last.
fn by_strength(a_name: &str, a: f64, b_name: &str, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => a_name.cmp(b_name),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .abs()
            .total_cmp(&a.abs())
            .then_with(|| a_name.cmp(b_name)),
    }
}

/// Correlation of each candidate property with the target, strongest first.
pub fn rank_target_correlations<S: AsRef<str>>(
    df: &DataFrame,
    target_column: &str,
    candidates: &[S],
) -> EvalResult<Vec<TargetCorrelation>> {
    require_columns(df, &[target_column])?;
    require_columns(df, candidates)?;
    let target = column_values(df, target_column)?;

    let mut ranked = candidates
        .iter()
        .map(|c| {
            let values = column_values(df, c.as_ref())?;
            let (r, observations) = pairwise_pearson(&values, &target);
            Ok(TargetCorrelation {
                feature: c.as_ref().to_string(),
                correlation: r.unwrap_or(f64::NAN),
                observations,
            })
        })
        .collect::<EvalResult<Vec<_>>>()?;

    ranked.sort_by(|a, b| by_strength(&a.feature, a.correlation, &b.feature, b.correlation));
    Ok(ranked)
}

/// Property pairs whose |r| exceeds `threshold`, strongest first.
pub fn find_correlated_pairs<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
    threshold: f64,
) -> EvalResult<Vec<CorrelatedPair>> {
    let matrix = correlation_matrix(df, columns)?;
    let n = matrix.names.len();

    // Extract upper triangle
    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let corr = matrix.values[(i, j)];
            if !corr.is_nan() && corr.abs() > threshold {
                pairs.push(CorrelatedPair {
                    feature1: matrix.names[i].clone(),
                    feature2: matrix.names[j].clone(),
                    correlation: corr,
                });
            }
        }
    }

    pairs.sort_by(|a, b| {
        b.correlation
            .abs()
            .total_cmp(&a.correlation.abs())
            .then_with(|| a.feature1.cmp(&b.feature1))
            .then_with(|| a.feature2.cmp(&b.feature2))
    });

    Ok(pairs)
}
