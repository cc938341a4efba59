//! gbscale: Grain-Boundary Scaling CLI Tool
//!
//! Loads property tables, ranks feature subsets by cross-validated score,
//! and projects the best subset onto a second table.

mod cli;
mod pipeline;
mod report;
mod utils;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use polars::prelude::DataFrame;

use cli::{Cli, Commands};
use pipeline::{
    analyze_missing_values, candidate_properties, enumerate_subsets, filter_by_available_columns,
    find_correlated_pairs, fit_and_predict, load_dataset, load_label_map, prediction_frame,
    rank_subsets, rank_target_correlations, LabelMap,
};
use report::{
    display_missing_values, display_ranking, display_target_correlations, export_ranking_csv,
    export_ranking_json, labelled_features, save_dataframe_csv, RunMetadata,
};
use utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    setup_logging, RunSettings,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet)?;

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Correlate {
                input,
                target,
                labels,
                id_columns,
                pair_threshold,
            } => run_correlate(
                input,
                target,
                labels.as_deref(),
                id_columns,
                *pair_threshold,
                cli.infer_schema_length,
            ),
        };
    }

    let input = cli.input.clone().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let target = cli.target.clone().ok_or_else(|| {
        anyhow::anyhow!("Target column is required. Use -t/--target to specify.")
    })?;
    let output_dir = cli
        .output_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not derive an output directory"))?;

    let fold_strategy = cli.search.fold_strategy();
    let pipeline_config = cli.search.pipeline_config();
    let scoring = cli.search.scoring;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&RunSettings {
        input: &input,
        predict: cli.predict.as_deref(),
        target: &target,
        output_dir: &output_dir,
        max_size: cli.search.max_size,
        strategy: fold_strategy.to_string(),
        scoring: scoring.to_string(),
        neighbors: pipeline_config.n_neighbors,
    });

    // Step 1: Load tables
    print_step_header(1, "Load Tables");
    let step_start = Instant::now();

    let train_df = load_table(&input, &cli.drop_columns, cli.infer_schema_length)?;
    let predict_df = match &cli.predict {
        Some(path) => Some(load_table(path, &cli.drop_columns, cli.infer_schema_length)?),
        None => None,
    };
    let labels = load_labels(cli.labels.as_deref())?;

    let column_names: Vec<String> = train_df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    if !column_names.contains(&target) {
        anyhow::bail!(
            "Target column '{}' not found in dataset. Available columns: {:?}",
            target,
            column_names
        );
    }

    let candidates = if cli.candidates.is_empty() {
        candidate_properties(&train_df, &target, &cli.id_columns)
    } else {
        cli.candidates.clone()
    };
    if candidates.is_empty() {
        anyhow::bail!("No candidate properties found. Use --candidates to list them.");
    }
    print_count("candidate properties", candidates.len(), None);
    print_step_time(step_start.elapsed());

    // Step 2: Missing value report over the modeled columns
    print_step_header(2, "Missing Value Analysis");
    let step_start = Instant::now();
    let mut modeled = candidates.clone();
    modeled.push(target.clone());
    let missing = analyze_missing_values(&train_df.select(modeled.iter().map(String::as_str))?)?;
    display_missing_values(&missing, &labels);
    if missing.iter().all(|(_, r)| *r == 0.0) {
        print_info("No missing values in candidate properties or target");
    }
    print_step_time(step_start.elapsed());

    // Step 3: Enumerate subsets
    print_step_header(3, "Enumerate Feature Subsets");
    let subsets = enumerate_subsets(&candidates, cli.search.max_size)?;
    print_count(
        "feature subset(s)",
        subsets.len(),
        Some(&format!("(sizes 1..={})", cli.search.max_size)),
    );

    // Step 4: Rank by cross-validated score
    print_step_header(4, "Cross-Validated Ranking");
    let step_start = Instant::now();
    let ranking = rank_subsets(
        &train_df,
        &subsets,
        &target,
        &fold_strategy,
        scoring,
        &pipeline_config,
    )?;
    print_success(&format!("Ranked {} subset(s)", ranking.len()));
    display_ranking(&ranking, &labels, cli.top, "SUBSET RANKING");
    print_step_time(step_start.elapsed());

    // Step 5: Filter to the prediction table's columns and project
    let mut available_ranking = None;
    if let (Some(predict_df), Some(predict_path)) = (&predict_df, &cli.predict) {
        print_step_header(5, "Prediction Projection");
        let step_start = Instant::now();

        let available: Vec<String> = predict_df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let filtered = filter_by_available_columns(&ranking, &available);
        display_ranking(&filtered, &labels, cli.top, "RANKING (AVAILABLE PROPERTIES)");

        match filtered.best() {
            Some(best) => {
                let spinner = create_spinner("Fitting best available subset...");
                let predictions = fit_and_predict(
                    &train_df,
                    predict_df,
                    &best.subset,
                    &target,
                    &pipeline_config,
                )?;
                let mut frame =
                    prediction_frame(predict_df, &predictions, &cli.id_columns, &target)?;
                let path = cli
                    .export_path("_predictions.csv")
                    .unwrap_or_else(|| output_dir.join("predictions.csv"));
                save_dataframe_csv(&mut frame, &path)?;
                finish_with_success(
                    &spinner,
                    &format!(
                        "Predicted {} row(s) of {} with {}",
                        predictions.len(),
                        predict_path.display(),
                        labelled_features(best.subset.features(), &labels)
                    ),
                );
                print_info(&format!("Predictions saved to {}", path.display()));
            }
            None => {
                let spinner = create_spinner("Selecting subset...");
                finish_with_warning(
                    &spinner,
                    "No ranked subset uses only properties present in the prediction table",
                );
            }
        }

        available_ranking = Some(filtered);
        print_step_time(step_start.elapsed());
    }

    // Final step: Export
    print_step_header(if predict_df.is_some() { 6 } else { 5 }, "Save Results");
    let metadata = RunMetadata::new(
        &input,
        cli.predict.as_deref(),
        &target,
        &candidates,
        cli.search.max_size,
        &fold_strategy,
        scoring,
        &pipeline_config,
    );
    let json_path = cli
        .export_path("_ranking.json")
        .unwrap_or_else(|| output_dir.join("ranking.json"));
    let csv_path = cli
        .export_path("_ranking.csv")
        .unwrap_or_else(|| output_dir.join("ranking.csv"));
    export_ranking_json(&json_path, &metadata, &ranking, available_ranking.as_ref())?;
    export_ranking_csv(&csv_path, &ranking)?;
    print_success(&format!("Saved {}", json_path.display()));
    print_success(&format!("Saved {}", csv_path.display()));

    print_completion();
    Ok(())
}

/// Load a table and drop the requested columns
fn load_table(path: &Path, drop_columns: &[String], infer_schema_length: usize) -> Result<DataFrame> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));
    let mut df = load_dataset(path, infer_schema_length)?;
    if !drop_columns.is_empty() {
        df = df.drop_many(drop_columns.iter().map(String::as_str));
    }
    let (rows, cols) = df.shape();
    finish_with_success(
        &spinner,
        &format!("{} ({} rows × {} columns)", path.display(), rows, cols),
    );
    Ok(df)
}

fn load_labels(path: Option<&Path>) -> Result<LabelMap> {
    match path {
        Some(p) => {
            let labels = load_label_map(p)?;
            print_info(&format!("Loaded {} property label(s)", labels.len()));
            Ok(labels)
        }
        None => Ok(LabelMap::default()),
    }
}

/// Exploratory report: missing values, correlation with the target, correlated pairs
fn run_correlate(
    input: &Path,
    target: &str,
    labels: Option<&Path>,
    id_columns: &[String],
    pair_threshold: f64,
    infer_schema_length: usize,
) -> Result<()> {
    let df = load_table(input, &[], infer_schema_length)?;
    let labels = load_labels(labels)?;
    let candidates = candidate_properties(&df, target, id_columns);

    let missing = analyze_missing_values(&df)?;
    display_missing_values(&missing, &labels);

    let correlations = rank_target_correlations(&df, target, &candidates)
        .with_context(|| format!("Failed to correlate properties with '{}'", target))?;
    display_target_correlations(&correlations, &labels, target);

    let pairs = find_correlated_pairs(&df, &candidates, pair_threshold)?;
    if pairs.is_empty() {
        print_info(&format!("No property pairs with |r| > {:.2}", pair_threshold));
    } else {
        println!();
        print_count(
            "correlated property pair(s)",
            pairs.len(),
            Some(&format!("(|r| > {:.2})", pair_threshold)),
        );
        for pair in &pairs {
            println!(
                "        {} {} ↔ {} {}",
                style("•").dim(),
                labels.label(&pair.feature1),
                labels.label(&pair.feature2),
                style(format!("{:+.3}", pair.correlation)).yellow()
            );
        }
    }

    Ok(())
}
