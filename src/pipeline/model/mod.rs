//! Standardize → impute → regress pipeline
//!
//! The same pipeline, with the same imputation policy, is used for every
//! feature subset so their cross-validated scores are comparable.

pub mod imputer;
pub mod regression;
pub mod scaler;

pub use imputer::{KnnImputer, DEFAULT_NEIGHBORS};
pub use regression::LinearRegression;
pub use scaler::StandardScaler;

use faer::Mat;
use serde::Serialize;

use super::error::{EvalError, EvalResult};

/// Pipeline-wide settings shared by every subset evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Donors averaged by the KNN imputer
    pub n_neighbors: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            n_neighbors: DEFAULT_NEIGHBORS,
        }
    }
}

/// A fitted standardization, imputation and linear regression chain.
#[derive(Debug, Clone)]
pub struct RegressionPipeline {
    scaler: StandardScaler,
    imputer: KnnImputer,
    regression: LinearRegression,
}

impl RegressionPipeline {
    /// Fit on a feature matrix (NaN marks missing) and a complete target.
    ///
    /// Fails with a degenerate-fit error when the target has zero variance or
    /// every feature column is entirely missing.
    pub fn fit(x: &Mat<f64>, y: &[f64], config: &PipelineConfig) -> EvalResult<Self> {
        if y.is_empty() {
            return Err(EvalError::InsufficientRows {
                rows: 0,
                required: 1,
            });
        }

        let first = y[0];
        if y.iter().all(|&v| v == first) {
            return Err(EvalError::DegenerateFit(format!(
                "target has zero variance across {} training row(s)",
                y.len()
            )));
        }

        let all_missing = (0..x.ncols()).all(|j| (0..x.nrows()).all(|i| x[(i, j)].is_nan()));
        if all_missing {
            return Err(EvalError::DegenerateFit(
                "every feature column is entirely missing in the training rows".to_string(),
            ));
        }

        let scaler = StandardScaler::fit(x);
        let scaled = scaler.transform(x);
        let imputer = KnnImputer::fit(&scaled, config.n_neighbors);
        let filled = imputer.transform(&scaled);
        let regression = LinearRegression::fit(&filled, y);

        Ok(Self {
            scaler,
            imputer,
            regression,
        })
    }

    pub fn predict(&self, x: &Mat<f64>) -> Vec<f64> {
        let scaled = self.scaler.transform(x);
        let filled = self.imputer.transform(&scaled);
        self.regression.predict(&filled)
    }

    pub fn regression(&self) -> &LinearRegression {
        &self.regression
    }
}
