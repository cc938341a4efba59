//! Export of rankings and predictions

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{FoldStrategy, PipelineConfig, RankedResults, Scoring};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// gbscale version
    pub gbscale_version: String,
    /// Training table path
    pub input_file: String,
    /// Prediction table path (if used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predict_file: Option<String>,
    pub target_column: String,
    pub candidate_properties: Vec<String>,
    pub max_subset_size: usize,
    pub fold_strategy: FoldStrategy,
    pub scoring: Scoring,
    pub pipeline: PipelineConfig,
}

impl RunMetadata {
    /// Stamp the metadata with the current UTC time and crate version
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        input_file: &Path,
        predict_file: Option<&Path>,
        target_column: &str,
        candidate_properties: &[String],
        max_subset_size: usize,
        fold_strategy: &FoldStrategy,
        scoring: Scoring,
        pipeline: &PipelineConfig,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            gbscale_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
            predict_file: predict_file.map(|p| p.display().to_string()),
            target_column: target_column.to_string(),
            candidate_properties: candidate_properties.to_vec(),
            max_subset_size,
            fold_strategy: fold_strategy.clone(),
            scoring,
            pipeline: pipeline.clone(),
        }
    }
}

/// Complete ranking export with metadata
#[derive(Serialize)]
pub struct RankingExport<'a> {
    pub metadata: &'a RunMetadata,
    /// All ranked subsets, best first
    pub ranking: &'a RankedResults,
    /// Ranking restricted to the prediction table's columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_ranking: Option<&'a RankedResults>,
}

/// Write the ranking and run metadata as pretty JSON
pub fn export_ranking_json(
    output_path: &Path,
    metadata: &RunMetadata,
    ranking: &RankedResults,
    available_ranking: Option<&RankedResults>,
) -> Result<()> {
    let export = RankingExport {
        metadata,
        ranking,
        available_ranking,
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize ranking to JSON")?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write ranking file: {}", output_path.display()))?;

    Ok(())
}

/// Write the ranked rows as CSV (features joined with ';')
pub fn export_ranking_csv(output_path: &Path, ranking: &RankedResults) -> Result<()> {
    let mut df = ranking
        .to_dataframe()
        .context("Failed to build ranking table")?;
    save_dataframe_csv(&mut df, output_path)
}

/// Save a DataFrame as CSV
pub fn save_dataframe_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}
