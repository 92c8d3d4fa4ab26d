//! Integration tests for the decision-boundary renderer using stub classifiers.

use std::cell::Cell;

use anyhow::{bail, Result};
use ndarray::{array, Array1, Array2};

use terrain_classifiers::boundary::{compute_decision_surface, partition_test_points};
use terrain_classifiers::config::{GridSpec, RenderConfig};
use terrain_classifiers::error::BoundaryError;
use terrain_classifiers::models::classifier_trait::Classifier;
use terrain_classifiers::report::plots::save_decision_boundary;

// ---------------------------------------------------------------------------
// Stub classifiers
// ---------------------------------------------------------------------------

struct Constant(usize);

impl Classifier for Constant {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        Ok(Array1::from_elem(x.nrows(), self.0))
    }
}

struct Threshold;

impl Classifier for Threshold {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        Ok(x.column(0).mapv(|v| if v >= 0.5 { 1 } else { 0 }))
    }
}

/// Counts `predict` calls and the number of rows it saw.
#[derive(Default)]
struct Counting {
    calls: Cell<usize>,
    rows: Cell<usize>,
}

impl Classifier for Counting {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        self.calls.set(self.calls.get() + 1);
        self.rows.set(x.nrows());
        Ok(Array1::zeros(x.nrows()))
    }
}

struct Unfitted;

impl Classifier for Unfitted {
    fn predict(&self, _x: &Array2<f64>) -> Result<Array1<usize>> {
        bail!("model has not been fitted")
    }
}

struct ShortBatch;

impl Classifier for ShortBatch {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        Ok(Array1::zeros(x.nrows() - 1))
    }
}

fn test_set() -> (Array2<f64>, Array1<usize>) {
    (
        array![[0.1, 0.9], [0.8, 0.2], [0.4, 0.4], [0.9, 0.7], [0.3, 0.6]],
        array![0, 1, 0, 1, 0],
    )
}

// ---------------------------------------------------------------------------
// Grid properties
// ---------------------------------------------------------------------------

#[test]
fn default_grid_has_ten_thousand_points() {
    let surface = compute_decision_surface(&Constant(0), &GridSpec::default()).unwrap();
    assert_eq!(surface.x_ticks.len(), 100);
    assert_eq!(surface.y_ticks.len(), 100);
    assert_eq!(surface.shape(), (100, 100));
    assert_eq!(surface.predictions.len(), 10_000);
}

#[test]
fn grid_is_classified_in_one_batch() {
    let clf = Counting::default();
    compute_decision_surface(&clf, &GridSpec::default()).unwrap();
    assert_eq!(clf.calls.get(), 1);
    assert_eq!(clf.rows.get(), 10_000);
}

#[test]
fn constant_classifier_gives_uniform_region() {
    for label in [0, 1] {
        let surface = compute_decision_surface(&Constant(label), &GridSpec::default()).unwrap();
        assert!(surface.predictions.iter().all(|&l| l == label));
        let mut expected = [0, 0];
        expected[label] = 10_000;
        assert_eq!(surface.class_counts(), expected);
    }
}

#[test]
fn threshold_boundary_falls_at_half() {
    let surface = compute_decision_surface(&Threshold, &GridSpec::default()).unwrap();
    for row in surface.predictions.outer_iter() {
        let first_one = row.iter().position(|&l| l == 1).unwrap();
        let boundary_x = surface.x_ticks[first_one];
        assert!(
            (boundary_x - 0.5).abs() <= 0.01 + 1e-12,
            "boundary at x = {}",
            boundary_x
        );
        // Everything right of the boundary is class 1
        assert!(row.iter().skip(first_one).all(|&l| l == 1));
        assert!(row.iter().take(first_one).all(|&l| l == 0));
    }
}

#[test]
fn rendering_is_idempotent() {
    let grid = GridSpec::default();
    let first = compute_decision_surface(&Threshold, &grid).unwrap();
    let second = compute_decision_surface(&Threshold, &grid).unwrap();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Scatter overlay
// ---------------------------------------------------------------------------

#[test]
fn overlay_partitions_test_set_exactly() {
    let (x, y) = test_set();
    let overlay = partition_test_points(&x, &y).unwrap();
    assert_eq!(overlay.len(), x.nrows());
    assert_eq!(overlay.class_0, vec![(0.1, 0.9), (0.4, 0.4), (0.3, 0.6)]);
    assert_eq!(overlay.class_1, vec![(0.8, 0.2), (0.9, 0.7)]);
}

#[test]
fn empty_test_set_gives_empty_overlay() {
    let overlay = partition_test_points(&Array2::zeros((0, 2)), &Array1::zeros(0)).unwrap();
    assert!(overlay.is_empty());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn mismatched_lengths_fail_before_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig {
        output: dir.path().join("out.png"),
        ..RenderConfig::default()
    };
    let clf = Counting::default();
    let (x, _) = test_set();
    let err = save_decision_boundary(&clf, &x, &array![0, 1], &config).unwrap_err();
    assert!(matches!(
        err,
        BoundaryError::LengthMismatch {
            features: 5,
            labels: 2
        }
    ));
    assert_eq!(clf.calls.get(), 0);
}

#[test]
fn classifier_failure_is_a_prediction_error() {
    let err = compute_decision_surface(&Unfitted, &GridSpec::default()).unwrap_err();
    assert!(matches!(err, BoundaryError::Prediction(_)));
    assert!(err.to_string().contains("not been fitted"));

    let err = compute_decision_surface(&ShortBatch, &GridSpec::default()).unwrap_err();
    assert!(matches!(err, BoundaryError::Prediction(_)));
}

#[test]
fn unwritable_destination_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig {
        width: 120,
        height: 90,
        output: dir.path().join("missing").join("out.png"),
        ..RenderConfig::default()
    };
    let (x, y) = test_set();
    let err = save_decision_boundary(&Threshold, &x, &y, &config).unwrap_err();
    assert!(matches!(err, BoundaryError::Write { .. }), "got {:?}", err);
}

// ---------------------------------------------------------------------------
// Image output
// ---------------------------------------------------------------------------

#[test]
fn writes_png_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig {
        width: 160,
        height: 120,
        output: dir.path().join("test.png"),
        ..RenderConfig::default()
    };
    let (x, y) = test_set();
    let surface = save_decision_boundary(&Threshold, &x, &y, &config).unwrap();
    assert_eq!(surface.shape(), (100, 100));

    let bytes = std::fs::read(&config.output).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn empty_test_set_still_renders_background() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig {
        width: 160,
        height: 120,
        output: dir.path().join("empty.png"),
        ..RenderConfig::default()
    };
    save_decision_boundary(&Constant(1), &Array2::zeros((0, 2)), &Array1::zeros(0), &config)
        .unwrap();
    assert!(config.output.exists());
}
