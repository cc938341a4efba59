//! Ranking of feature subsets by cross-validated score

use std::cmp::Ordering;

use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use super::cv::{cross_validate, FoldStrategy, Scoring};
use super::error::{EvalError, EvalResult};
use super::model::PipelineConfig;
use super::subsets::FeatureSubset;
use super::table::{column_values, require_columns, target_rows};
use crate::utils::create_progress_bar;

/// Cross-validated result for one subset
#[derive(Debug, Clone, Serialize)]
pub struct SubsetScore {
    pub subset: FeatureSubset,
    /// Mean score across all folds of all repeats
    pub score: f64,
    /// Sample standard deviation across folds
    pub score_std: f64,
    pub fold_scores: Vec<f64>,
    /// Position of the subset in the evaluated list
    pub enumeration_index: usize,
}

/// A subset left out of the ranking because its evaluation failed
#[derive(Debug, Clone, Serialize)]
pub struct SubsetFailure {
    pub subset: FeatureSubset,
    pub enumeration_index: usize,
    pub reason: String,
}

/// Subsets ordered best first, plus the ones that could not be scored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankedResults {
    pub rows: Vec<SubsetScore>,
    pub failures: Vec<SubsetFailure>,
}

impl RankedResults {
    pub fn best(&self) -> Option<&SubsetScore> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ranked rows as a DataFrame: rank, features, size, score, score_std.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let rank: Vec<u32> = (1..=self.rows.len() as u32).collect();
        let features: Vec<String> = self
            .rows
            .iter()
            .map(|r| r.subset.features().join(";"))
            .collect();
        let size: Vec<u32> = self.rows.iter().map(|r| r.subset.len() as u32).collect();
        let score: Vec<f64> = self.rows.iter().map(|r| r.score).collect();
        let score_std: Vec<f64> = self.rows.iter().map(|r| r.score_std).collect();

        df! {
            "rank" => rank,
            "features" => features,
            "n_features" => size,
            "score" => score,
            "score_std" => score_std,
        }
    }
}

/// Best-first order: higher score, then fewer features, then enumeration order.
fn rank_order(a: &SubsetScore, b: &SubsetScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.subset.len().cmp(&b.subset.len()))
        .then_with(|| a.enumeration_index.cmp(&b.enumeration_index))
}

/// Evaluate every subset and order the results best first.
///
/// Unknown columns, a non-numeric column, an invalid fold strategy, or fewer
/// usable rows than folds abort the whole ranking. Subsets whose fit is
/// degenerate are logged, recorded in `failures` and excluded.
pub fn rank_subsets(
    df: &DataFrame,
    subsets: &[FeatureSubset],
    target_column: &str,
    fold_strategy: &FoldStrategy,
    scoring: Scoring,
    config: &PipelineConfig,
) -> EvalResult<RankedResults> {
    fold_strategy.validate()?;
    require_columns(df, &[target_column])?;

    let mut referenced: Vec<&str> = subsets
        .iter()
        .flat_map(|s| s.features().iter().map(String::as_str))
        .collect();
    referenced.sort_unstable();
    referenced.dedup();
    require_columns(df, &referenced)?;
    for name in &referenced {
        column_values(df, name)?;
    }

    let usable_rows = target_rows(df, target_column)?.rows.len();
    if usable_rows < fold_strategy.n_splits() {
        return Err(EvalError::InsufficientRows {
            rows: usable_rows,
            required: fold_strategy.n_splits(),
        });
    }

    info!(
        subsets = subsets.len(),
        rows = usable_rows,
        strategy = %fold_strategy,
        scoring = %scoring,
        "Ranking feature subsets"
    );

    let pb = create_progress_bar(subsets.len() as u64, "   Evaluating subsets");
    let mut results = RankedResults::default();

    for (index, subset) in subsets.iter().enumerate() {
        match cross_validate(df, subset, target_column, fold_strategy, scoring, config) {
            Ok(cv) => results.rows.push(SubsetScore {
                subset: subset.clone(),
                score: cv.mean,
                score_std: cv.std(),
                fold_scores: cv.fold_scores,
                enumeration_index: index,
            }),
            Err(e) if e.is_degenerate() => {
                warn!(subset = %subset, error = %e, "Excluding subset from ranking");
                results.failures.push(SubsetFailure {
                    subset: subset.clone(),
                    enumeration_index: index,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    results.rows.sort_by(rank_order);

    info!(
        ranked = results.rows.len(),
        excluded = results.failures.len(),
        "Subset ranking complete"
    );

    Ok(results)
}

/// Keep only rows whose whole subset lies within `available_columns`.
///
/// Relative order of the surviving rows is unchanged. Failures are filtered
/// the same way.
pub fn filter_by_available_columns<S: AsRef<str>>(
    ranked: &RankedResults,
    available_columns: &[S],
) -> RankedResults {
    RankedResults {
        rows: ranked
            .rows
            .iter()
            .filter(|r| r.subset.is_within(available_columns))
            .cloned()
            .collect(),
        failures: ranked
            .failures
            .iter()
            .filter(|f| f.subset.is_within(available_columns))
            .cloned()
            .collect(),
    }
}
