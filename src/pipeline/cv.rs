//! Cross-validated scoring of a feature subset

use std::fmt;
use std::str::FromStr;

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

use super::error::{EvalError, EvalResult};
use super::model::{PipelineConfig, RegressionPipeline};
use super::subsets::FeatureSubset;
use super::table::{feature_matrix, require_columns, target_rows};

/// Default number of folds per repeat
pub const DEFAULT_FOLDS: usize = 5;
/// Default number of repeats
pub const DEFAULT_REPEATS: usize = 10;
/// Default partition seed
pub const DEFAULT_SEED: u64 = 42;

/// How rows are partitioned into train/validation splits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FoldStrategy {
    /// Contiguous folds in row order, no shuffling
    KFold { n_splits: usize },
    /// `n_repeats` independent shuffles, each split into `n_splits` folds
    RepeatedKFold {
        n_splits: usize,
        n_repeats: usize,
        seed: u64,
    },
}

impl Default for FoldStrategy {
    fn default() -> Self {
        FoldStrategy::RepeatedKFold {
            n_splits: DEFAULT_FOLDS,
            n_repeats: DEFAULT_REPEATS,
            seed: DEFAULT_SEED,
        }
    }
}

/// One train/validation split over row positions.
#[derive(Debug, Clone)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

impl FoldStrategy {
    pub fn n_splits(&self) -> usize {
        match self {
            FoldStrategy::KFold { n_splits } | FoldStrategy::RepeatedKFold { n_splits, .. } => {
                *n_splits
            }
        }
    }

    pub fn n_repeats(&self) -> usize {
        match self {
            FoldStrategy::KFold { .. } => 1,
            FoldStrategy::RepeatedKFold { n_repeats, .. } => *n_repeats,
        }
    }

    pub fn validate(&self) -> EvalResult<()> {
        if self.n_splits() < 2 {
            return Err(EvalError::InvalidFoldStrategy(format!(
                "at least 2 folds are required, got {}",
                self.n_splits()
            )));
        }
        if self.n_repeats() < 1 {
            return Err(EvalError::InvalidFoldStrategy(
                "at least 1 repeat is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Partition `n_rows` positions into folds.
    ///
    /// Folds hold `n_rows / k` positions, the first `n_rows % k` folds one more.
    /// The same strategy always yields the same folds.
    pub fn split(&self, n_rows: usize) -> EvalResult<Vec<Fold>> {
        self.validate()?;
        let k = self.n_splits();
        if n_rows < k {
            return Err(EvalError::InsufficientRows {
                rows: n_rows,
                required: k,
            });
        }

        let mut folds = Vec::with_capacity(k * self.n_repeats());
        match self {
            FoldStrategy::KFold { .. } => {
                let order: Vec<usize> = (0..n_rows).collect();
                folds.extend(partition(&order, k));
            }
            FoldStrategy::RepeatedKFold {
                n_repeats, seed, ..
            } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                for _ in 0..*n_repeats {
                    let mut order: Vec<usize> = (0..n_rows).collect();
                    order.shuffle(&mut rng);
                    folds.extend(partition(&order, k));
                }
            }
        }
        Ok(folds)
    }
}

impl fmt::Display for FoldStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldStrategy::KFold { n_splits } => write!(f, "{}-fold", n_splits),
            FoldStrategy::RepeatedKFold {
                n_splits,
                n_repeats,
                seed,
            } => write!(f, "{}-fold × {} repeats (seed {})", n_splits, n_repeats, seed),
        }
    }
}

fn partition(order: &[usize], k: usize) -> Vec<Fold> {
    let n = order.len();
    let base = n / k;
    let extra = n % k;

    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for f in 0..k {
        let size = base + usize::from(f < extra);
        let end = start + size;
        let validation = order[start..end].to_vec();
        let train = order[..start]
            .iter()
            .chain(&order[end..])
            .copied()
            .collect();
        folds.push(Fold { train, validation });
        start = end;
    }
    folds
}

/// Validation metric. Every variant is oriented so that greater is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    #[default]
    NegRootMeanSquaredError,
    NegMeanSquaredError,
    NegMeanAbsoluteError,
    R2,
}

impl Scoring {
    /// Score predictions against observed values.
    pub fn score(&self, observed: &[f64], predicted: &[f64]) -> EvalResult<f64> {
        let n = observed.len() as f64;
        let residuals = observed.iter().zip(predicted).map(|(o, p)| o - p);

        let score = match self {
            Scoring::NegMeanSquaredError => -residuals.map(|r| r * r).sum::<f64>() / n,
            Scoring::NegRootMeanSquaredError => -(residuals.map(|r| r * r).sum::<f64>() / n).sqrt(),
            Scoring::NegMeanAbsoluteError => -residuals.map(f64::abs).sum::<f64>() / n,
            Scoring::R2 => {
                let mean = observed.iter().sum::<f64>() / n;
                let ss_tot: f64 = observed.iter().map(|o| (o - mean) * (o - mean)).sum();
                if ss_tot == 0.0 {
                    return Err(EvalError::DegenerateFit(format!(
                        "R² is undefined on a validation fold of {} row(s) with constant target",
                        observed.len()
                    )));
                }
                let ss_res: f64 = residuals.map(|r| r * r).sum();
                1.0 - ss_res / ss_tot
            }
        };

        if !score.is_finite() {
            return Err(EvalError::DegenerateFit(format!(
                "{} produced a non-finite score",
                self
            )));
        }
        Ok(score)
    }
}

impl fmt::Display for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scoring::NegRootMeanSquaredError => "neg-rmse",
            Scoring::NegMeanSquaredError => "neg-mse",
            Scoring::NegMeanAbsoluteError => "neg-mae",
            Scoring::R2 => "r2",
        };
        f.write_str(name)
    }
}

impl FromStr for Scoring {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neg-rmse" | "rmse" => Ok(Scoring::NegRootMeanSquaredError),
            "neg-mse" | "mse" => Ok(Scoring::NegMeanSquaredError),
            "neg-mae" | "mae" => Ok(Scoring::NegMeanAbsoluteError),
            "r2" => Ok(Scoring::R2),
            other => Err(format!(
                "Unknown scoring '{}'. Options: neg-rmse, neg-mse, neg-mae, r2",
                other
            )),
        }
    }
}

/// Mean and per-fold scores of one subset.
#[derive(Debug, Clone, Serialize)]
pub struct CvScore {
    pub mean: f64,
    pub fold_scores: Vec<f64>,
}

impl CvScore {
    /// Sample standard deviation across folds
    pub fn std(&self) -> f64 {
        let n = self.fold_scores.len();
        if n < 2 {
            return 0.0;
        }
        let var = self
            .fold_scores
            .iter()
            .map(|s| (s - self.mean) * (s - self.mean))
            .sum::<f64>()
            / (n - 1) as f64;
        var.sqrt()
    }
}

/// Cross-validated mean score of the pipeline on `subset` → `target_column`.
pub fn evaluate_subset(
    df: &DataFrame,
    subset: &FeatureSubset,
    target_column: &str,
    fold_strategy: &FoldStrategy,
    scoring: Scoring,
    config: &PipelineConfig,
) -> EvalResult<f64> {
    cross_validate(df, subset, target_column, fold_strategy, scoring, config).map(|s| s.mean)
}

/// Like [`evaluate_subset`], keeping every fold's score.
///
/// Rows with a missing target are dropped before partitioning. Any fold that
/// cannot be fitted or scored fails the whole evaluation.
pub fn cross_validate(
    df: &DataFrame,
    subset: &FeatureSubset,
    target_column: &str,
    fold_strategy: &FoldStrategy,
    scoring: Scoring,
    config: &PipelineConfig,
) -> EvalResult<CvScore> {
    require_columns(df, subset.features())?;
    require_columns(df, &[target_column])?;

    let target = target_rows(df, target_column)?;
    let x = feature_matrix(df, subset.features(), Some(target.rows.as_slice()))?;
    let folds = fold_strategy.split(target.rows.len())?;

    let mut fold_scores = Vec::with_capacity(folds.len());
    for (i, fold) in folds.iter().enumerate() {
        let x_train = select_rows(&x, &fold.train);
        let y_train: Vec<f64> = fold.train.iter().map(|&r| target.values[r]).collect();
        let x_valid = select_rows(&x, &fold.validation);
        let y_valid: Vec<f64> = fold.validation.iter().map(|&r| target.values[r]).collect();

        let pipeline = RegressionPipeline::fit(&x_train, &y_train, config).map_err(|e| match e {
            EvalError::DegenerateFit(msg) => {
                EvalError::DegenerateFit(format!("subset {} fold {}: {}", subset, i + 1, msg))
            }
            other => other,
        })?;
        let predicted = pipeline.predict(&x_valid);
        fold_scores.push(scoring.score(&y_valid, &predicted)?);
    }

    let mean = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
    debug!(subset = %subset, score = mean, folds = fold_scores.len(), "Subset evaluated");

    Ok(CvScore { mean, fold_scores })
}

fn select_rows(x: &faer::Mat<f64>, rows: &[usize]) -> faer::Mat<f64> {
    let mut out = faer::Mat::<f64>::zeros(rows.len(), x.ncols());
    for j in 0..x.ncols() {
        for (i, &r) in rows.iter().enumerate() {
            out[(i, j)] = x[(r, j)];
        }
    }
    out
}
