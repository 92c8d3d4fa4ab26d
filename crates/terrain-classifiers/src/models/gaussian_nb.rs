use anyhow::{anyhow, bail, Context, Result};
use linfa::prelude::*;
use linfa_bayes::GaussianNb;
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::{Classifier, ClassifierModel};

/// Gaussian Naive Bayes classifier backed by `linfa-bayes`.
///
/// Supports a full `fit` as well as incremental `partial_fit` batches; the
/// running mean/variance updates are delegated to linfa.
pub struct GaussianNBClassifier {
    model: Option<GaussianNb<f64, usize>>,
    var_smoothing: f64,
}

impl GaussianNBClassifier {
    pub fn new(params: ModelConfig) -> Result<Self> {
        match params.model_type {
            ModelType::GaussianNB { var_smoothing } => Ok(Self::with_var_smoothing(var_smoothing)),
            other => bail!("Expected ModelType::GaussianNB params, got {:?}", other),
        }
    }

    pub fn with_var_smoothing(var_smoothing: f64) -> Self {
        GaussianNBClassifier {
            model: None,
            var_smoothing,
        }
    }

    pub fn var_smoothing(&self) -> f64 {
        self.var_smoothing
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Update the model with one more batch of samples.
    ///
    /// The first call on an unfitted model behaves like `fit`. On error the
    /// previously learned state is kept.
    pub fn partial_fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        check_inputs(x, y)?;
        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let params = GaussianNb::<f64, usize>::params()
            .var_smoothing(self.var_smoothing)
            .check()
            .context("Invalid Gaussian NB parameters")?;

        let fitted = params
            .fit_with(self.model.clone(), &dataset)
            .context("Gaussian NB partial fit failed")?;
        self.model = fitted.into();

        if self.model.is_none() {
            bail!("Gaussian NB partial fit did not produce a model");
        }
        log::debug!(
            "Gaussian NB updated with {} samples (var_smoothing = {:e})",
            x.nrows(),
            self.var_smoothing
        );
        Ok(())
    }
}

fn check_inputs(x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
    if x.nrows() != y.len() {
        bail!(
            "Features and labels must have equal length ({} rows, {} labels)",
            x.nrows(),
            y.len()
        );
    }
    if x.nrows() == 0 {
        bail!("Training data cannot be empty");
    }
    Ok(())
}

impl Classifier for GaussianNBClassifier {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("Gaussian NB model has not been fitted"))?;
        let predictions: Array1<usize> = model.predict(x);
        Ok(predictions)
    }
}

impl ClassifierModel for GaussianNBClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        check_inputs(x, y)?;
        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let params = GaussianNb::<f64, usize>::params()
            .var_smoothing(self.var_smoothing)
            .check()
            .context("Invalid Gaussian NB parameters")?;

        let model = params.fit(&dataset).context("Gaussian NB fit failed")?;
        self.model = Some(model);
        log::info!("Fitted Gaussian NB on {} samples", x.nrows());
        Ok(())
    }

    fn name(&self) -> &str {
        "gaussian_nb"
    }
}
