//! Error types for subset evaluation and prediction.
//!
//! Input errors (bad subset sizes, unknown columns, too few rows) abort the
//! operation that raised them. Degenerate-fit errors are numeric failures of a
//! single fold; ranking records them per subset and moves on.

use thiserror::Error;

/// Errors raised by the feature-subset evaluator and prediction projection.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Requested maximum subset size is outside `1..=candidates`.
    #[error("invalid maximum subset size {max_size}: must be between 1 and {candidates}")]
    InvalidSubsetSize { max_size: usize, candidates: usize },

    /// A candidate property name appears more than once.
    #[error("candidate property '{0}' is listed more than once")]
    DuplicateCandidate(String),

    /// Fold strategy parameters are unusable.
    #[error("invalid fold strategy: {0}")]
    InvalidFoldStrategy(String),

    /// One or more referenced columns do not exist in the table.
    #[error("column(s) not found in table: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A referenced column cannot be cast to a floating point value.
    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// The table has fewer usable rows than the operation requires.
    #[error("insufficient rows: {rows} usable row(s), {required} required")]
    InsufficientRows { rows: usize, required: usize },

    /// A fit or score could not be computed without fabricating a value.
    #[error("degenerate fit: {0}")]
    DegenerateFit(String),

    /// Underlying DataFrame error.
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

impl EvalError {
    /// True for per-subset numeric failures that ranking excludes instead of aborting.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, EvalError::DegenerateFit(_))
    }
}

pub type EvalResult<T> = std::result::Result<T, EvalError>;
