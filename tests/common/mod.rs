//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

pub const ESF: [f64; 12] = [
    12.0, 35.5, 20.1, 58.3, 44.0, 71.2, 66.8, 90.4, 83.1, 105.7, 99.2, 120.5,
];
pub const C44: [f64; 12] = [
    40.1, 52.3, 38.7, 61.0, 75.4, 48.2, 80.9, 57.6, 92.3, 70.1, 88.8, 65.4,
];
pub const NOISE: [f64; 12] = [3.1, -1.2, 0.4, 2.2, -2.8, 1.7, -0.3, 2.9, -1.9, 0.8, -2.4, 1.1];

/// Scaling coefficient driven by `esf` and, weakly, `c44`, plus a small alternating wobble
pub fn scaling_coefficient(wobble: f64) -> Vec<f64> {
    (0..12)
        .map(|i| {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            0.2 + 0.01 * ESF[i] - 0.002 * C44[i] + wobble * sign
        })
        .collect()
}

/// Observation table of 12 material/potential samples
///
/// - `species`, `crystal_type`, `model`: identifiers
/// - `esf`: stacking-fault energy, the dominant driver of the target
/// - `c44`: elastic constant, a weak driver
/// - `noise`: unrelated property
/// - `gb_coeff`: scaling coefficient target
pub fn create_observation_dataframe() -> DataFrame {
    df! {
        "species" => ["Al", "Al", "Cu", "Cu", "Ni", "Ni", "Ag", "Ag", "Au", "Au", "Pt", "Pt"],
        "crystal_type" => ["fcc"; 12],
        "model" => ["eam_a", "eam_b", "eam_a", "eam_b", "eam_a", "eam_b",
                    "eam_a", "eam_b", "eam_a", "eam_b", "eam_a", "eam_b"],
        "esf" => ESF,
        "c44" => C44,
        "noise" => NOISE,
        "gb_coeff" => scaling_coefficient(0.001),
    }
    .unwrap()
}

/// Same samples with gaps in the properties
pub fn create_observation_dataframe_with_missing() -> DataFrame {
    let mut esf: Vec<Option<f64>> = ESF.iter().copied().map(Some).collect();
    let mut c44: Vec<Option<f64>> = C44.iter().copied().map(Some).collect();
    esf[3] = None;
    esf[8] = None;
    c44[5] = None;

    df! {
        "species" => ["Al", "Al", "Cu", "Cu", "Ni", "Ni", "Ag", "Ag", "Au", "Au", "Pt", "Pt"],
        "esf" => esf,
        "c44" => c44,
        "noise" => NOISE,
        "empty" => [None::<f64>; 12],
        "gb_coeff" => scaling_coefficient(0.001),
    }
    .unwrap()
}

/// Smaller, higher-fidelity table: no `noise` column, target for a subset of samples
pub fn create_prediction_dataframe() -> DataFrame {
    df! {
        "species" => ["Al", "Cu", "Ni", "Ag"],
        "crystal_type" => ["fcc"; 4],
        "model" => ["dft", "dft", "dft", "dft"],
        "esf" => [30.0f64, 45.0, 120.0, 16.0],
        "c44" => [Some(28.0f64), Some(75.0), None, Some(45.0)],
        "gb_coeff" => [Some(0.444f64), Some(0.5), None, None],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame, name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join(name);

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Write a CSV into an existing directory
pub fn write_csv_in(dir: &TempDir, df: &mut DataFrame, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// Assert two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} ± {}, got {}",
        expected,
        tol,
        actual
    );
}
