//! Command-line argument definitions using clap

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{FoldStrategy, PipelineConfig, Scoring};

/// gbscale - Rank canonical-property subsets by cross-validated prediction of a
/// grain-boundary energy scaling coefficient
#[derive(Parser, Debug)]
#[command(name = "gbscale")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Training table path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Target (scaling coefficient) column name
    #[arg(short, long)]
    pub target: Option<String>,

    /// Second table to project the winning subset onto (CSV or Parquet).
    /// Rankings are also filtered to subsets whose properties it provides.
    #[arg(short, long)]
    pub predict: Option<PathBuf>,

    /// Candidate properties (comma-separated).
    /// Defaults to every numeric column except the target and identifier columns.
    #[arg(long, value_delimiter = ',')]
    pub candidates: Vec<String>,

    /// Identifier columns carried into prediction output and never used as features
    #[arg(long, value_delimiter = ',', default_value = "species,crystal_type,model")]
    pub id_columns: Vec<String>,

    /// Columns to drop before processing (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Two-column CSV mapping property names to display labels
    #[arg(long)]
    pub labels: Option<PathBuf>,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Number of ranked subsets shown in the terminal summary
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Directory for exported files. Defaults to the training table's directory.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence log output
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,
}

/// Subset search and cross-validation settings
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Largest feature subset size to enumerate
    #[arg(long, default_value = "3", value_parser = validate_positive)]
    pub max_size: usize,

    /// Number of cross-validation folds
    #[arg(long, default_value = "5", value_parser = validate_folds)]
    pub folds: usize,

    /// Number of repeated fold partitions
    #[arg(long, default_value = "10", value_parser = validate_positive)]
    pub repeats: usize,

    /// Seed for the fold partitions
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Use contiguous, unshuffled folds (ignores --repeats and --seed)
    #[arg(long, default_value = "false")]
    pub no_shuffle: bool,

    /// Neighbors averaged by the KNN imputer
    #[arg(long, default_value = "2", value_parser = validate_positive)]
    pub neighbors: usize,

    /// Validation metric: neg-rmse, neg-mse, neg-mae or r2
    #[arg(long, default_value = "neg-rmse", value_parser = parse_scoring)]
    pub scoring: Scoring,
}

impl SearchArgs {
    pub fn fold_strategy(&self) -> FoldStrategy {
        if self.no_shuffle {
            FoldStrategy::KFold {
                n_splits: self.folds,
            }
        } else {
            FoldStrategy::RepeatedKFold {
                n_splits: self.folds,
                n_repeats: self.repeats,
                seed: self.seed,
            }
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            n_neighbors: self.neighbors,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exploratory analysis: missing values and property correlations with the target
    Correlate {
        /// Table path (CSV or Parquet)
        input: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        /// Two-column CSV mapping property names to display labels
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Identifier columns excluded from the analysis
        #[arg(long, value_delimiter = ',', default_value = "species,crystal_type,model")]
        id_columns: Vec<String>,

        /// Report property pairs whose |r| exceeds this value
        #[arg(long, default_value = "0.9", value_parser = validate_correlation)]
        pair_threshold: f64,
    },
}

impl Cli {
    /// Directory for exported files, derived from the input when not given.
    pub fn output_dir(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(self.output_dir.clone().unwrap_or_else(|| {
            input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf()
        }))
    }

    /// Export path `<output_dir>/<input stem><suffix>`.
    pub fn export_path(&self, suffix: &str) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("gbscale");
        Some(self.output_dir()?.join(format!("{}{}", stem, suffix)))
    }
}

/// Validator for counts that must be at least 1
fn validate_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;
    if value < 1 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for the fold count
fn validate_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;
    if value < 2 {
        Err(format!("folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for correlation thresholds
fn validate_correlation(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!("threshold must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

fn parse_scoring(s: &str) -> Result<Scoring, String> {
    s.parse()
}
