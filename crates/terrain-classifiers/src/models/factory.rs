use anyhow::Result;

use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::ClassifierModel;

/// Build a boxed classifier model from a `ModelConfig`.
///
/// Hyper-parameters are validated here, so an unsupported kernel fails before
/// any data is loaded.
pub fn build_model(params: &ModelConfig) -> Result<Box<dyn ClassifierModel>> {
    match params.model_type {
        ModelType::GaussianNB { .. } => Ok(Box::new(
            crate::models::gaussian_nb::GaussianNBClassifier::new(params.clone())?,
        )),
        ModelType::SVM { .. } => Ok(Box::new(crate::models::svm::SVMClassifier::new(
            params.clone(),
        )?)),
    }
}
