use anyhow::{anyhow, bail, Context, Result};
use linfa::prelude::*;
use linfa_svm::{Svm, SvmParams};
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::{Classifier, ClassifierModel};

/// Kernel choices understood by [`SVMClassifier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    Linear,
    /// `exp(-gamma * |x - y|^2)`; `None` picks gamma from the training data.
    Rbf { gamma: Option<f64> },
    Polynomial { constant: f64, degree: f64 },
}

impl Kernel {
    pub fn from_config(model_type: &ModelType) -> Result<Self> {
        match model_type {
            ModelType::SVM {
                kernel,
                gamma,
                polynomial_kernel_constant,
                polynomial_kernel_degree,
                ..
            } => match kernel.to_lowercase().as_str() {
                "linear" => Ok(Kernel::Linear),
                "rbf" | "gauss" => Ok(Kernel::Rbf { gamma: *gamma }),
                "poly" => Ok(Kernel::Polynomial {
                    constant: *polynomial_kernel_constant,
                    degree: *polynomial_kernel_degree,
                }),
                _ => bail!(
                    "Unsupported kernel type: {}. Valid options are: linear, rbf, poly",
                    kernel
                ),
            },
            other => bail!("Expected ModelType::SVM params, got {:?}", other),
        }
    }
}

/// `1 / (n_features * var(X))`, falling back to 1 for constant data.
pub fn scale_gamma(x: &Array2<f64>) -> f64 {
    let n = x.len() as f64;
    if n == 0.0 {
        return 1.0;
    }
    let mean = x.sum() / n;
    let var = x.mapv(|v| (v - mean) * (v - mean)).sum() / n;
    if var > 0.0 {
        1.0 / (x.ncols() as f64 * var)
    } else {
        1.0
    }
}

/// Binary support vector classifier backed by `linfa-svm`.
pub struct SVMClassifier {
    model: Option<Svm<f64, bool>>,
    kernel: Kernel,
    eps: f64,
    c: (f64, f64),
}

impl SVMClassifier {
    pub fn new(params: ModelConfig) -> Result<Self> {
        let kernel = Kernel::from_config(&params.model_type)?;
        match params.model_type {
            ModelType::SVM { eps, c, .. } => {
                if c.0 <= 0.0 || c.1 <= 0.0 {
                    bail!("Regularization weights must be strictly positive, got {:?}", c);
                }
                Ok(SVMClassifier {
                    model: None,
                    kernel,
                    eps,
                    c,
                })
            }
            other => bail!("Expected ModelType::SVM params, got {:?}", other),
        }
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}

impl Classifier for SVMClassifier {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("SVM model has not been fitted"))?;
        let predictions: Array1<bool> = model.predict(x);
        Ok(predictions.mapv(|p| p as usize))
    }
}

impl ClassifierModel for SVMClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        if x.nrows() != y.len() {
            bail!(
                "Features and labels must have equal length ({} rows, {} labels)",
                x.nrows(),
                y.len()
            );
        }
        if let Some(label) = y.iter().find(|&&l| l > 1) {
            bail!("SVM expects binary labels 0/1, found {}", label);
        }
        if !y.iter().any(|&l| l == 0) || !y.iter().any(|&l| l == 1) {
            bail!("SVM training data must contain both classes");
        }

        // Positive class is label 1
        let targets = y.mapv(|l| l == 1);
        let dataset = Dataset::new(x.to_owned(), targets);

        let (c_pos, c_neg) = self.c;
        let mut params: SvmParams<f64, bool> = Svm::<f64, bool>::params()
            .eps(self.eps)
            .pos_neg_weights(c_pos, c_neg);

        params = match self.kernel {
            Kernel::Linear => params.linear_kernel(),
            Kernel::Rbf { gamma } => {
                let gamma = gamma.unwrap_or_else(|| scale_gamma(x));
                if gamma <= 0.0 {
                    bail!("RBF gamma must be strictly positive, got {}", gamma);
                }
                log::debug!("SVM rbf kernel with gamma = {}", gamma);
                params.gaussian_kernel(1.0 / gamma)
            }
            Kernel::Polynomial { constant, degree } => params.polynomial_kernel(constant, degree),
        };

        let model = <SvmParams<f64, bool> as Fit<_, _, _>>::fit(&params, &dataset)
            .context("SVM fit failed")?;
        self.model = Some(model);
        log::info!("Fitted SVM ({:?} kernel) on {} samples", self.kernel, x.nrows());
        Ok(())
    }

    fn name(&self) -> &str {
        "svm"
    }
}
