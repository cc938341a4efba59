//! Dataset loader for CSV and Parquet files, plus the property label map

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::info;

fn scan_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    // 0 means full table scan
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load an observation table from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let df = scan_dataset(path, infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let (rows, cols) = df.shape();
    info!(path = %path.display(), rows, cols, "Loaded dataset");
    Ok(df)
}

/// Column names of a dataset, read from its schema only
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let schema = scan_dataset(path, 100)?
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    Ok(schema.iter_names().map(|s| s.to_string()).collect())
}

/// Property name → display label mapping.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: BTreeMap<String, String>,
}

impl LabelMap {
    pub fn new(labels: BTreeMap<String, String>) -> Self {
        Self { labels }
    }

    /// Display label for a property, or the property name itself when unmapped.
    pub fn label<'a>(&'a self, property: &'a str) -> &'a str {
        self.labels
            .get(property)
            .map(String::as_str)
            .unwrap_or(property)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Load a two-column key/value table (header row required) as a label map.
///
/// Rows with a missing key or label are skipped.
pub fn load_label_map(path: &Path) -> Result<LabelMap> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open label file: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse label file: {}", path.display()))?;

    if df.width() < 2 {
        anyhow::bail!(
            "Label file {} must have two columns (property, label), found {}",
            path.display(),
            df.width()
        );
    }

    let columns = df.get_columns();
    let keys = columns[0].cast(&DataType::String)?;
    let values = columns[1].cast(&DataType::String)?;

    let labels = keys
        .str()?
        .iter()
        .zip(values.str()?.iter())
        .filter_map(|(k, v)| Some((k?.trim().to_string(), v?.trim().to_string())))
        .collect();

    Ok(LabelMap::new(labels))
}

/// Numeric columns usable as canonical properties: everything except the
/// target and the excluded identifier columns, in table order.
pub fn candidate_properties<S: AsRef<str>>(
    df: &DataFrame,
    target_column: &str,
    exclude: &[S],
) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .filter(|name| name != target_column && !exclude.iter().any(|e| e.as_ref() == name))
        .collect()
}
