//! Unit tests for table and label loading

use gbscale::pipeline::{candidate_properties, get_column_names, load_dataset, load_label_map};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("props.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "species,esf,gb_coeff").unwrap();
    writeln!(file, "Al,120.5,0.61").unwrap();
    writeln!(file, "Cu,40.2,0.33").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    assert_eq!(df.shape(), (2, 3));
    assert_eq!(df.get_column_names(), &["species", "esf", "gb_coeff"]);
}

#[test]
fn test_load_parquet_file() {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("props.parquet");

    let mut df = df! {
        "esf" => [1.0f64, 2.0, 3.0],
        "gb_coeff" => [0.4f64, 0.5, 0.6],
    }
    .unwrap();

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();

    let loaded = load_dataset(&parquet_path, 100).unwrap();

    assert_eq!(loaded.shape(), (3, 2));
    assert_eq!(loaded.get_column_names(), &["esf", "gb_coeff"]);
}

#[test]
fn test_csv_with_missing_values() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("gaps.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a0,esf,gb_coeff").unwrap();
    writeln!(file, "4.05,,0.5").unwrap();
    writeln!(file, ",120.0,").unwrap();
    writeln!(file, "3.61,45.0,0.3").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    let null_counts: Vec<usize> = df.get_columns().iter().map(|c| c.null_count()).collect();
    assert_eq!(null_counts, vec![1, 1, 1]);
}

#[test]
fn test_get_column_names_csv() {
    let mut df = common::create_observation_dataframe();
    let (_temp_dir, csv_path) = common::create_temp_csv(&mut df, "obs.csv");

    let columns = get_column_names(&csv_path).unwrap();

    assert_eq!(
        columns,
        vec!["species", "crystal_type", "model", "esf", "c44", "noise", "gb_coeff"]
    );
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("props.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let result = load_dataset(&bad_path, 100);

    assert!(result.is_err(), "Unsupported format should return error");
    let err_msg = result.unwrap_err().to_string();
    assert!(
        err_msg.contains("Unsupported"),
        "Error message should mention unsupported format: {}",
        err_msg
    );
}

#[test]
fn test_nonexistent_file() {
    let path = std::path::Path::new("/nonexistent/path/to/props.csv");
    assert!(load_dataset(path, 100).is_err());
}

#[test]
fn test_load_label_map() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("labels.csv");

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "property,label").unwrap();
    writeln!(file, "esf,Stacking fault energy").unwrap();
    writeln!(file, "c44, C44 elastic constant ").unwrap();
    writeln!(file, "a0,").unwrap();
    drop(file);

    let labels = load_label_map(&path).unwrap();

    assert_eq!(labels.len(), 2, "Row without a label is skipped");
    assert_eq!(labels.label("esf"), "Stacking fault energy");
    assert_eq!(labels.label("c44"), "C44 elastic constant");
    assert_eq!(labels.label("a0"), "a0", "Unmapped property falls back to its name");
}

#[test]
fn test_label_map_requires_two_columns() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("labels.csv");

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "property").unwrap();
    writeln!(file, "esf").unwrap();
    drop(file);

    assert!(load_label_map(&path).is_err());
}

#[test]
fn test_candidate_properties_skip_target_and_identifiers() {
    let df = common::create_observation_dataframe();

    let candidates = candidate_properties(&df, "gb_coeff", &["model"]);

    // String identifiers are never numeric candidates
    assert_eq!(candidates, vec!["esf", "c44", "noise"]);
}

#[test]
fn test_candidate_properties_honor_exclusions() {
    let df = common::create_observation_dataframe();

    let candidates = candidate_properties(&df, "gb_coeff", &["noise"]);

    assert_eq!(candidates, vec!["esf", "c44"]);
}
