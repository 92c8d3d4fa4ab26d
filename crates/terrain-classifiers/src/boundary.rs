//! Decision-region grids and test-point overlays.
//!
//! Everything here is backend independent: [`compute_decision_surface`]
//! queries a classifier once over a regular grid and reshapes the answer,
//! and [`partition_test_points`] splits a labelled test set by class. The
//! drawing code in `report::plots` only consumes these two values.
use ndarray::{Array1, Array2};

use crate::config::GridSpec;
use crate::error::BoundaryError;
use crate::models::classifier_trait::Classifier;

/// Predicted class for every cell of a query grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSurface {
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    pub step: f64,
    /// Shape `(y_ticks.len(), x_ticks.len())`: rows follow y, columns follow x.
    pub predictions: Array2<usize>,
}

impl DecisionSurface {
    pub fn shape(&self) -> (usize, usize) {
        self.predictions.dim()
    }

    /// Number of cells predicted as class 0 and class 1.
    pub fn class_counts(&self) -> [usize; 2] {
        let ones = self.predictions.iter().filter(|&&l| l == 1).count();
        [self.predictions.len() - ones, ones]
    }

    /// `(x0, y0, x1, y1, label)` for each cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (f64, f64, f64, f64, usize)> + '_ {
        self.predictions
            .indexed_iter()
            .map(move |((row, col), &label)| {
                let x0 = self.x_ticks[col];
                let y0 = self.y_ticks[row];
                (x0, y0, x0 + self.step, y0 + self.step, label)
            })
    }

    /// Grid as nested rows, the layout plotly heatmaps expect.
    pub fn rows(&self) -> Vec<Vec<usize>> {
        self.predictions
            .outer_iter()
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Test points split by their true label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterOverlay {
    pub class_0: Vec<(f64, f64)>,
    pub class_1: Vec<(f64, f64)>,
}

impl ScatterOverlay {
    pub fn len(&self) -> usize {
        self.class_0.len() + self.class_1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Upper bound on ticks along one axis.
pub const MAX_AXIS_TICKS: usize = 100_000;
/// Upper bound on the number of points in one query batch.
pub const MAX_GRID_POINTS: usize = 4_000_000;

/// Evenly spaced ticks in `[min, max)`, matching `numpy.arange`.
///
/// Fails with [`BoundaryError::InvalidGrid`] when the step would produce more
/// than [`MAX_AXIS_TICKS`] ticks.
pub fn axis_ticks(min: f64, max: f64, step: f64) -> Result<Vec<f64>, BoundaryError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(BoundaryError::InvalidGrid(format!(
            "step must be positive, got {}",
            step
        )));
    }
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(BoundaryError::InvalidGrid(format!(
            "empty range [{}, {})",
            min, max
        )));
    }
    let count = ((max - min) / step).ceil();
    if !(count.is_finite() && count <= MAX_AXIS_TICKS as f64) {
        return Err(BoundaryError::InvalidGrid(format!(
            "step {} over [{}, {}) gives more than {} ticks",
            step, min, max, MAX_AXIS_TICKS
        )));
    }
    let n = count as usize;
    Ok((0..n).map(|i| min + i as f64 * step).collect())
}

/// Ticks along both axes plus the `(nx * ny, 2)` query batch.
///
/// Rows of the batch run over x fastest, so reshaping the predictions to
/// `(ny, nx)` puts each label back on its cell.
pub fn grid_points(grid: &GridSpec) -> Result<(Vec<f64>, Vec<f64>, Array2<f64>), BoundaryError> {
    let x_ticks = axis_ticks(grid.x_min, grid.x_max, grid.step)?;
    let y_ticks = axis_ticks(grid.y_min, grid.y_max, grid.step)?;
    let n_points = x_ticks
        .len()
        .checked_mul(y_ticks.len())
        .filter(|&n| n <= MAX_GRID_POINTS)
        .ok_or_else(|| {
            BoundaryError::InvalidGrid(format!(
                "{} x {} grid exceeds {} points",
                x_ticks.len(),
                y_ticks.len(),
                MAX_GRID_POINTS
            ))
        })?;

    let mut batch = Vec::with_capacity(n_points * 2);
    for &y in &y_ticks {
        for &x in &x_ticks {
            batch.push(x);
            batch.push(y);
        }
    }
    let points = Array2::from_shape_vec((n_points, 2), batch)
        .map_err(|e| BoundaryError::InvalidGrid(e.to_string()))?;
    Ok((x_ticks, y_ticks, points))
}

/// Classify every grid point with a single batched `predict` call.
pub fn compute_decision_surface<C: Classifier + ?Sized>(
    clf: &C,
    grid: &GridSpec,
) -> Result<DecisionSurface, BoundaryError> {
    let (x_ticks, y_ticks, points) = grid_points(grid)?;
    log::debug!(
        "Querying classifier on a {} x {} grid ({} points)",
        x_ticks.len(),
        y_ticks.len(),
        points.nrows()
    );

    let labels = clf.predict(&points).map_err(BoundaryError::Prediction)?;
    if labels.len() != points.nrows() {
        return Err(BoundaryError::Prediction(anyhow::anyhow!(
            "classifier returned {} labels for {} grid points",
            labels.len(),
            points.nrows()
        )));
    }
    if let Some(label) = labels.iter().find(|&&l| l > 1) {
        return Err(BoundaryError::Prediction(anyhow::anyhow!(
            "classifier returned non-binary label {}",
            label
        )));
    }

    let predictions = labels
        .into_shape((y_ticks.len(), x_ticks.len()))
        .map_err(|e| BoundaryError::Prediction(e.into()))?;

    Ok(DecisionSurface {
        x_ticks,
        y_ticks,
        step: grid.step,
        predictions,
    })
}

/// Split parallel test features/labels into per-class point lists.
///
/// Lengths are checked before anything else. An empty test set yields an
/// empty overlay.
pub fn partition_test_points(
    features: &Array2<f64>,
    labels: &Array1<usize>,
) -> Result<ScatterOverlay, BoundaryError> {
    if features.nrows() != labels.len() {
        return Err(BoundaryError::LengthMismatch {
            features: features.nrows(),
            labels: labels.len(),
        });
    }
    if labels.is_empty() {
        return Ok(ScatterOverlay::default());
    }
    if features.ncols() != 2 {
        return Err(BoundaryError::FeatureDimension(features.ncols()));
    }

    let mut overlay = ScatterOverlay::default();
    for (index, (row, &label)) in features.outer_iter().zip(labels.iter()).enumerate() {
        let point = (row[0], row[1]);
        match label {
            0 => overlay.class_0.push(point),
            1 => overlay.class_1.push(point),
            _ => return Err(BoundaryError::UnknownLabel { index, label }),
        }
    }
    Ok(overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use ndarray::array;

    struct FirstFeatureThreshold;

    impl Classifier for FirstFeatureThreshold {
        fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
            Ok(x.column(0).mapv(|v| (v >= 0.5) as usize))
        }
    }

    #[test]
    fn test_axis_ticks_match_arange() {
        let ticks = axis_ticks(0.0, 1.0, 0.01).unwrap();
        assert_eq!(ticks.len(), 100);
        assert_eq!(ticks[0], 0.0);
        assert!((ticks[99] - 0.99).abs() < 1e-12);

        assert_eq!(axis_ticks(0.0, 0.3, 0.1).unwrap().len(), 3);
    }

    #[test]
    fn test_axis_ticks_reject_bad_input() {
        assert!(matches!(
            axis_ticks(0.0, 1.0, 0.0),
            Err(BoundaryError::InvalidGrid(_))
        ));
        assert!(matches!(
            axis_ticks(1.0, 1.0, 0.1),
            Err(BoundaryError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_tiny_step_is_rejected_not_allocated() {
        assert!(matches!(
            axis_ticks(0.0, 1.0, 1e-20),
            Err(BoundaryError::InvalidGrid(_))
        ));
        assert!(matches!(
            axis_ticks(-1e308, 1e308, 1.0),
            Err(BoundaryError::InvalidGrid(_))
        ));
        assert_eq!(axis_ticks(0.0, 1.0, 1e-5).unwrap().len(), MAX_AXIS_TICKS);

        let tiny = GridSpec {
            step: 1e-20,
            ..GridSpec::default()
        };
        assert!(matches!(grid_points(&tiny), Err(BoundaryError::InvalidGrid(_))));

        // Each axis is within bounds but the product is not
        let dense = GridSpec {
            step: 1e-4,
            ..GridSpec::default()
        };
        assert!(matches!(grid_points(&dense), Err(BoundaryError::InvalidGrid(_))));
    }

    #[test]
    fn test_grid_points_run_over_x_first() {
        let grid = GridSpec {
            x_min: 0.0,
            x_max: 0.3,
            y_min: 0.0,
            y_max: 0.2,
            step: 0.1,
        };
        let (xs, ys, points) = grid_points(&grid).unwrap();
        assert_eq!((xs.len(), ys.len()), (3, 2));
        assert_eq!(points.nrows(), 6);
        assert!((points[(1, 0)] - 0.1).abs() < 1e-12);
        assert_eq!(points[(1, 1)], 0.0);
        assert_eq!(points[(3, 0)], 0.0);
        assert!((points[(3, 1)] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_cells_cover_each_grid_point() {
        let surface = compute_decision_surface(&FirstFeatureThreshold, &GridSpec::default()).unwrap();
        let cells: Vec<_> = surface.cells().collect();
        assert_eq!(cells.len(), 10_000);
        let (x0, y0, x1, y1, label) = cells[150];
        assert!((x0 - 0.5).abs() < 1e-12);
        assert!((y0 - 0.01).abs() < 1e-12);
        assert!((x1 - x0 - 0.01).abs() < 1e-12);
        assert!((y1 - y0 - 0.01).abs() < 1e-12);
        assert_eq!(label, 1);
    }

    #[test]
    fn test_partition_rejects_unknown_label() {
        let err = partition_test_points(&array![[0.1, 0.2], [0.3, 0.4]], &array![0, 2]).unwrap_err();
        assert!(matches!(err, BoundaryError::UnknownLabel { index: 1, label: 2 }));
    }

    #[test]
    fn test_partition_rejects_wrong_dimension() {
        let err = partition_test_points(&array![[0.1, 0.2, 0.3]], &array![0]).unwrap_err();
        assert!(matches!(err, BoundaryError::FeatureDimension(3)));
    }
}
