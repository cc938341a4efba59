//! Numeric views over an observation table
//!
//! Feature matrices use NaN for missing entries so the model stages can
//! work on plain `faer` matrices.

use faer::Mat;
use polars::prelude::*;

use super::error::{EvalError, EvalResult};

/// Fail with the full list of names absent from `df`.
pub fn require_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> EvalResult<()> {
    let present: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    let missing: Vec<String> = columns
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| !present.contains(c))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EvalError::MissingColumns(missing))
    }
}

/// Read a column as optional floats.
///
/// Numeric columns are cast to Float64. A column with no values at all is
/// accepted whatever dtype the reader inferred for it.
pub fn column_values(df: &DataFrame, name: &str) -> EvalResult<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| EvalError::MissingColumns(vec![name.to_string()]))?;

    if column.null_count() == column.len() {
        return Ok(vec![None; column.len()]);
    }

    if !column.dtype().is_primitive_numeric() {
        return Err(EvalError::NonNumericColumn(name.to_string()));
    }

    let float_col = column.cast(&DataType::Float64)?;
    let values = float_col.f64()?.iter().collect();
    Ok(values)
}

/// Build a rows × features matrix for the selected rows, NaN where missing.
pub fn feature_matrix<S: AsRef<str>>(
    df: &DataFrame,
    features: &[S],
    rows: Option<&[usize]>,
) -> EvalResult<Mat<f64>> {
    require_columns(df, features)?;

    let columns: Vec<Vec<Option<f64>>> = features
        .iter()
        .map(|f| column_values(df, f.as_ref()))
        .collect::<EvalResult<_>>()?;

    let all_rows: Vec<usize>;
    let rows = match rows {
        Some(r) => r,
        None => {
            all_rows = (0..df.height()).collect();
            &all_rows
        }
    };

    let mut x = Mat::<f64>::zeros(rows.len(), features.len());
    for (j, values) in columns.iter().enumerate() {
        for (i, &row) in rows.iter().enumerate() {
            x[(i, j)] = values[row].unwrap_or(f64::NAN);
        }
    }
    Ok(x)
}

/// Target values together with the indices of rows where the target is observed.
#[derive(Debug, Clone)]
pub struct TargetRows {
    pub rows: Vec<usize>,
    pub values: Vec<f64>,
}

/// Collect the rows with a finite target value.
pub fn target_rows(df: &DataFrame, target_column: &str) -> EvalResult<TargetRows> {
    let values = column_values(df, target_column)?;
    let (rows, values) = values
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|v| v.is_finite()).map(|v| (i, v)))
        .unzip();
    Ok(TargetRows { rows, values })
}
