use anyhow::Result;
use ndarray::{Array1, Array2};

/// Anything that can assign a class label to a batch of feature rows.
///
/// Labels use the crate convention: `0` or `1` for binary problems. This is
/// the only capability the decision-boundary renderer needs, so tests can
/// plot stub predictors without training a model.
pub trait Classifier {
    /// Predict one label per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>>;
}

/// A classifier that can be trained from labelled data.
pub trait ClassifierModel: Classifier {
    /// Fit the model, replacing any previously learned state.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        (**self).predict(x)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        (**self).predict(x)
    }
}
