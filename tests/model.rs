extern crate indelpred;

use std::io::Cursor;

use indelpred::errors::{Error, ErrorKind};
use indelpred::model::*;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn example_model() -> TrainedModel {
    TrainedModel::new(strings(&["A", "B"]), vec![1.0, -0.5]).unwrap()
}

fn example_matrix() -> FeatureMatrix {
    let mut matrix = FeatureMatrix::new(strings(&["B", "Extra", "A"])).unwrap();
    matrix.push_row("D3_L0C1", vec![0.0, 9.0, 1.0]).unwrap();
    matrix.push_row("I1_L0C2", vec![2.0, -9.0, 0.0]).unwrap();
    matrix.push_row("D1_L0C0", vec![0.0, 0.0, 0.0]).unwrap();
    matrix
}

#[test]
fn test_predict_log_linear() {
    let profile = predict(&example_matrix(), &example_model()).unwrap();

    assert_eq!(profile.len(), 3);
    assert!(approx_eq(profile.get("D3_L0C1").unwrap(), 1f64.exp()));
    assert!(approx_eq(profile.get("I1_L0C2").unwrap(), (-1f64).exp()));
    assert!(approx_eq(profile.get("D1_L0C0").unwrap(), 1.0));
    assert_eq!(profile.get("-"), None);
}

#[test]
fn test_predict_is_deterministic() {
    let (matrix, model) = (example_matrix(), example_model());
    let first = predict(&matrix, &model).unwrap();
    let second = predict(&matrix, &model).unwrap();

    for ((t1, w1), (t2, w2)) in first.iter().zip(second.iter()) {
        assert_eq!(t1, t2);
        assert_eq!(w1.to_bits(), w2.to_bits());
    }
}

#[test]
fn test_predict_missing_column() {
    let model = TrainedModel::new(strings(&["A", "X"]), vec![1.0, 1.0]).unwrap();

    match predict(&example_matrix(), &model) {
        Err(Error(ErrorKind::IncompatibleFeatureSet(missing), _)) => {
            assert_eq!(missing, strings(&["X"]))
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_predict_empty_matrix() {
    let matrix = FeatureMatrix::new(strings(&["A", "B"])).unwrap();
    let profile = predict(&matrix, &example_model()).unwrap();

    assert!(profile.is_empty());
}

#[test]
fn test_predict_empty_matrix_still_checks_columns() {
    let matrix = FeatureMatrix::new(strings(&["A"])).unwrap();

    assert!(predict(&matrix, &example_model()).is_err());
}

#[test]
fn test_predict_overflow() {
    let model = TrainedModel::new(strings(&["A"]), vec![1000.0]).unwrap();
    let mut matrix = FeatureMatrix::new(strings(&["A"])).unwrap();
    matrix.push_row("D1_L0C0", vec![1000.0]).unwrap();

    match predict(&matrix, &model) {
        Err(Error(ErrorKind::NonFiniteWeight(token, _), _)) => assert_eq!(token, "D1_L0C0"),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_predict_with_defaults() {
    let prediction =
        predict_with(&example_matrix(), &example_model(), &PredictOptions::default()).unwrap();
    let profile = &prediction.profile;

    assert_eq!(profile.get("-"), Some(1000.0));
    assert!(approx_eq(profile.total() - profile.null_weight(), 1000.0));

    let e = 1f64.exp();
    let total = e + 1.0 / e + 1.0;
    assert!(approx_eq(profile.get("D3_L0C1").unwrap(), 1000.0 * e / total));
    assert!(approx_eq(prediction.in_frame_percent, 100.0 * e / total));
}

fn extreme_matrix(low: f64, high: f64) -> FeatureMatrix {
    let mut matrix = FeatureMatrix::new(strings(&["A"])).unwrap();
    matrix.push_row("D1_L0C0", vec![low]).unwrap();
    matrix.push_row("D3_L0C0", vec![high]).unwrap();
    matrix
}

#[test]
fn test_predict_with_extreme_scores() {
    let model = TrainedModel::new(strings(&["A"]), vec![1.0]).unwrap();
    let e = 1f64.exp();

    // exp(-800) underflows and exp(710) overflows without rescaling first
    for &(low, high) in &[(-800.0, -799.0), (709.0, 710.0)] {
        let prediction =
            predict_with(&extreme_matrix(low, high), &model, &PredictOptions::default()).unwrap();
        let profile = &prediction.profile;

        assert_eq!(profile.get("-"), Some(1000.0));
        assert!(approx_eq(profile.total() - profile.null_weight(), 1000.0));

        let ratio = profile.get("D3_L0C0").unwrap() / profile.get("D1_L0C0").unwrap();
        assert!((ratio - e).abs() < 1e-9);
        assert!(prediction.in_frame_percent.is_finite());
        assert!(approx_eq(prediction.in_frame_percent, 100.0 * e / (e + 1.0)));
    }
}

#[test]
fn test_predict_with_raw_weights() {
    let options = PredictOptions {
        scale: None,
        null_weight: None,
    };
    let prediction = predict_with(&example_matrix(), &example_model(), &options).unwrap();

    assert_eq!(
        prediction.profile,
        predict(&example_matrix(), &example_model()).unwrap()
    );
}

#[test]
fn test_model_rejects_mismatched_lengths() {
    assert!(TrainedModel::new(strings(&["A", "B"]), vec![1.0]).is_err());
    assert!(TrainedModel::new(strings(&["A", "A"]), vec![1.0, 2.0]).is_err());
}

#[test]
fn test_parse_model() {
    let text = "### Train set: ['Oligo_1', 'Oligo_2']\n# Version: 2\nA\t0.25\nB\t-1.5e-1\n\n";
    let model = TrainedModel::parse(Cursor::new(text)).unwrap();

    assert_eq!(model.columns(), &strings(&["A", "B"])[..]);
    assert_eq!(model.theta(), &[0.25, -0.15][..]);
    assert_eq!(model.coefficient("B"), Some(-0.15));
    assert_eq!(model.coefficient("C"), None);
    assert_eq!(model.metadata()[0].0, "Train set");
    assert_eq!(model.metadata()[0].1, "['Oligo_1', 'Oligo_2']");
    assert_eq!(model.metadata()[1], ("Version".to_string(), "2".to_string()));
}

#[test]
fn test_parse_model_rejects_expressions() {
    assert!(TrainedModel::parse(Cursor::new("A\t1+1\n")).is_err());
    assert!(TrainedModel::parse(Cursor::new("A\tnan\n")).is_err());
    assert!(TrainedModel::parse(Cursor::new("A\t1\t2\n")).is_err());
}

#[test]
fn test_parse_features() {
    let text = "X\tIndel\tY\n1\tD1_L0C0\t2\n3.5\tI1_L0C0\t-4\n";
    let matrix = FeatureMatrix::parse(Cursor::new(text)).unwrap();

    assert_eq!(matrix.columns(), &strings(&["X", "Y"])[..]);
    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix.rows()[1].0, "I1_L0C0");
    assert_eq!(matrix.rows()[1].1, vec![3.5, -4.0]);
}

#[test]
fn test_parse_features_errors() {
    assert!(FeatureMatrix::parse(Cursor::new("")).is_err());
    assert!(FeatureMatrix::parse(Cursor::new("X\tY\n1\t2\n")).is_err());
    assert!(FeatureMatrix::parse(Cursor::new("Indel\tX\nD1_L0C0\n")).is_err());
    assert!(FeatureMatrix::parse(Cursor::new("Indel\tX\nD1_L0C0\tabc\n")).is_err());
    assert!(FeatureMatrix::parse(Cursor::new("Indel\tX\nD_L0C0\t1\n")).is_err());
    assert!(FeatureMatrix::parse(Cursor::new("Indel\tX\nD1_L0C0\t1\nD1_L0C0\t2\n")).is_err());
}

#[test]
fn test_parse_features_many_rows() {
    let mut text = String::from("Indel\tX\n");
    for size in 1..2000 {
        text.push_str(&format!("D{}_L0C0\t{}\n", size, size));
    }

    let matrix = FeatureMatrix::parse(Cursor::new(text.clone())).unwrap();
    assert_eq!(matrix.len(), 1999);

    text.push_str("D1000_L0C0\t0\n");
    match FeatureMatrix::parse(Cursor::new(text)) {
        Err(Error(ErrorKind::MalformedTable(msg), _)) => assert!(msg.contains("D1000_L0C0")),
        other => panic!("unexpected result {:?}", other),
    }
}
