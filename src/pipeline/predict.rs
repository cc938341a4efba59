//! Projection of a fitted subset model onto another table

use polars::prelude::*;
use tracing::info;

use super::error::{EvalError, EvalResult};
use super::model::{PipelineConfig, RegressionPipeline};
use super::subsets::FeatureSubset;
use super::table::{feature_matrix, require_columns, target_rows};

/// Fit the pipeline on every train row with a target, then predict each row of `predict_df`.
///
/// Missing feature values in `predict_df` are imputed from the training rows.
pub fn fit_and_predict(
    train_df: &DataFrame,
    predict_df: &DataFrame,
    feature_subset: &FeatureSubset,
    target_column: &str,
    config: &PipelineConfig,
) -> EvalResult<Vec<f64>> {
    require_columns(predict_df, feature_subset.features())?;
    require_columns(train_df, feature_subset.features())?;
    require_columns(train_df, &[target_column])?;

    let target = target_rows(train_df, target_column)?;
    if target.rows.is_empty() {
        return Err(EvalError::InsufficientRows {
            rows: 0,
            required: 1,
        });
    }

    let x_train = feature_matrix(train_df, feature_subset.features(), Some(target.rows.as_slice()))?;
    let pipeline = RegressionPipeline::fit(&x_train, &target.values, config)?;

    let x_predict = feature_matrix(predict_df, feature_subset.features(), None)?;
    let predictions = pipeline.predict(&x_predict);

    info!(
        subset = %feature_subset,
        train_rows = target.rows.len(),
        predicted_rows = predictions.len(),
        "Projected subset model"
    );

    Ok(predictions)
}

/// Name of the prediction column for a target.
pub fn prediction_column_name(target_column: &str) -> String {
    format!("predicted_{}", target_column)
}

/// Assemble identifiers, observed target (when present) and predictions into one frame.
///
/// Identifier columns absent from `predict_df` are skipped.
pub fn prediction_frame<S: AsRef<str>>(
    predict_df: &DataFrame,
    predictions: &[f64],
    id_columns: &[S],
    target_column: &str,
) -> EvalResult<DataFrame> {
    if predictions.len() != predict_df.height() {
        return Err(EvalError::InsufficientRows {
            rows: predictions.len(),
            required: predict_df.height(),
        });
    }

    let mut columns: Vec<Column> = Vec::new();
    for id in id_columns {
        if let Ok(col) = predict_df.column(id.as_ref()) {
            columns.push(col.clone());
        }
    }
    if let Ok(col) = predict_df.column(target_column) {
        columns.push(col.cast(&DataType::Float64)?);
    }
    columns.push(Column::new(
        prediction_column_name(target_column).into(),
        predictions.to_vec(),
    ));

    Ok(DataFrame::new(columns)?)
}
