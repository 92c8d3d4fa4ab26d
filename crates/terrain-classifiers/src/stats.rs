use anyhow::{bail, Result};
use ndarray::Array1;

/// Fraction of predictions equal to the true labels.
///
/// # Arguments
///
/// * `predictions` - Predicted labels.
/// * `truth` - True labels, parallel to `predictions`.
///
/// # Returns
///
/// A value in `[0, 1]`. Empty or mismatched inputs are errors.
pub fn accuracy(predictions: &Array1<usize>, truth: &Array1<usize>) -> Result<f64> {
    if predictions.len() != truth.len() {
        bail!(
            "Predictions and labels must have equal lengths ({} vs {})",
            predictions.len(),
            truth.len()
        );
    }
    if truth.is_empty() {
        bail!("Cannot compute accuracy of an empty set");
    }
    let correct = predictions
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    Ok(correct as f64 / truth.len() as f64)
}
