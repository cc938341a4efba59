//! Tests for cross-validated subset evaluation

use gbscale::pipeline::*;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn strategy() -> FoldStrategy {
    FoldStrategy::RepeatedKFold {
        n_splits: 4,
        n_repeats: 3,
        seed: 42,
    }
}

#[test]
fn test_evaluate_subset_is_deterministic() {
    let df = create_observation_dataframe();
    let subset = FeatureSubset::new(["esf", "c44"]);
    let config = PipelineConfig::default();

    let first = evaluate_subset(&df, &subset, "gb_coeff", &strategy(), Scoring::default(), &config)
        .unwrap();
    let second = evaluate_subset(&df, &subset, "gb_coeff", &strategy(), Scoring::default(), &config)
        .unwrap();

    assert_eq!(first, second, "Same seed and inputs must give identical scores");
}

#[test]
fn test_informative_property_scores_better() {
    let df = create_observation_dataframe();
    let config = PipelineConfig::default();

    let esf = evaluate_subset(
        &df,
        &FeatureSubset::new(["esf"]),
        "gb_coeff",
        &strategy(),
        Scoring::NegRootMeanSquaredError,
        &config,
    )
    .unwrap();
    let noise = evaluate_subset(
        &df,
        &FeatureSubset::new(["noise"]),
        "gb_coeff",
        &strategy(),
        Scoring::NegRootMeanSquaredError,
        &config,
    )
    .unwrap();

    assert!(esf <= 0.0 && noise <= 0.0, "Negated errors are never positive");
    assert!(esf > noise, "esf ({}) should beat noise ({})", esf, noise);
}

#[test]
fn test_cross_validate_reports_every_fold() {
    let df = create_observation_dataframe();
    let cv = cross_validate(
        &df,
        &FeatureSubset::new(["esf"]),
        "gb_coeff",
        &strategy(),
        Scoring::R2,
        &PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(cv.fold_scores.len(), 12);
    let mean = cv.fold_scores.iter().sum::<f64>() / 12.0;
    assert_close(cv.mean, mean, 1e-12);
    assert!(cv.std() >= 0.0);
}

#[test]
fn test_constant_target_is_degenerate() {
    let mut df = create_observation_dataframe();
    df.with_column(Column::new("gb_coeff".into(), vec![0.7f64; 12]))
        .unwrap();

    let result = evaluate_subset(
        &df,
        &FeatureSubset::new(["esf"]),
        "gb_coeff",
        &strategy(),
        Scoring::default(),
        &PipelineConfig::default(),
    );

    match result {
        Err(e) => {
            assert!(e.is_degenerate(), "Expected degenerate fit, got {}", e);
            assert!(e.to_string().contains("zero variance"));
        }
        Ok(score) => panic!("Constant target must not be scored, got {}", score),
    }
}

#[test]
fn test_entirely_missing_subset_is_degenerate() {
    let df = create_observation_dataframe_with_missing();

    let result = evaluate_subset(
        &df,
        &FeatureSubset::new(["empty"]),
        "gb_coeff",
        &strategy(),
        Scoring::default(),
        &PipelineConfig::default(),
    );

    assert!(matches!(result, Err(EvalError::DegenerateFit(_))));
}

#[test]
fn test_empty_column_is_retained_beside_observed_ones() {
    let df = create_observation_dataframe_with_missing();
    let config = PipelineConfig::default();

    let with_empty = evaluate_subset(
        &df,
        &FeatureSubset::new(["esf", "empty"]),
        "gb_coeff",
        &strategy(),
        Scoring::default(),
        &config,
    )
    .unwrap();
    let without = evaluate_subset(
        &df,
        &FeatureSubset::new(["esf"]),
        "gb_coeff",
        &strategy(),
        Scoring::default(),
        &config,
    )
    .unwrap();

    // The empty column is imputed as zeros and carries no weight
    assert_close(with_empty, without, 1e-9);
}

#[test]
fn test_missing_values_are_imputed() {
    let df = create_observation_dataframe_with_missing();

    let score = evaluate_subset(
        &df,
        &FeatureSubset::new(["esf", "c44"]),
        "gb_coeff",
        &strategy(),
        Scoring::default(),
        &PipelineConfig { n_neighbors: 3 },
    )
    .unwrap();

    assert!(score.is_finite());
}

#[test]
fn test_unknown_column_is_a_data_error() {
    let df = create_observation_dataframe();

    let result = evaluate_subset(
        &df,
        &FeatureSubset::new(["esf", "lattice_constant"]),
        "gb_coeff",
        &strategy(),
        Scoring::default(),
        &PipelineConfig::default(),
    );

    match result {
        Err(EvalError::MissingColumns(cols)) => assert_eq!(cols, vec!["lattice_constant"]),
        other => panic!("Expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn test_fewer_rows_than_folds() {
    let df = df! {
        "esf" => [1.0f64, 2.0, 3.0],
        "gb_coeff" => [0.1f64, 0.2, 0.4],
    }
    .unwrap();

    let result = evaluate_subset(
        &df,
        &FeatureSubset::new(["esf"]),
        "gb_coeff",
        &FoldStrategy::KFold { n_splits: 5 },
        Scoring::default(),
        &PipelineConfig::default(),
    );

    assert!(matches!(
        result,
        Err(EvalError::InsufficientRows {
            rows: 3,
            required: 5
        })
    ));
}

#[test]
fn test_rows_without_target_are_not_counted() {
    let df = df! {
        "esf" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "gb_coeff" => [Some(0.1f64), None, Some(0.4), None, None],
    }
    .unwrap();

    let result = evaluate_subset(
        &df,
        &FeatureSubset::new(["esf"]),
        "gb_coeff",
        &FoldStrategy::KFold { n_splits: 3 },
        Scoring::default(),
        &PipelineConfig::default(),
    );

    assert!(matches!(
        result,
        Err(EvalError::InsufficientRows {
            rows: 2,
            required: 3
        })
    ));
}

#[test]
fn test_non_numeric_feature_is_rejected() {
    let df = create_observation_dataframe();

    let result = evaluate_subset(
        &df,
        &FeatureSubset::new(["species"]),
        "gb_coeff",
        &strategy(),
        Scoring::default(),
        &PipelineConfig::default(),
    );

    assert!(matches!(result, Err(EvalError::NonNumericColumn(name)) if name == "species"));
}

#[test]
fn test_split_is_reproducible_and_seed_sensitive() {
    let a = strategy().split(12).unwrap();
    let b = strategy().split(12).unwrap();
    let other = FoldStrategy::RepeatedKFold {
        n_splits: 4,
        n_repeats: 3,
        seed: 7,
    }
    .split(12)
    .unwrap();

    fn validation(folds: &[Fold]) -> Vec<Vec<usize>> {
        folds.iter().map(|f| f.validation.clone()).collect()
    }
    assert_eq!(validation(&a), validation(&b));
    assert_ne!(validation(&a), validation(&other));
}
