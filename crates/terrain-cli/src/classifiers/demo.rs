//! Toy examples: fit on a handful of hard-coded points and classify one
//! new sample.
use anyhow::Result;
use ndarray::{array, Array1, Array2};

use terrain_classifiers::config::{ModelConfig, ModelType};
use terrain_classifiers::data_handling::LabelEncoder;
use terrain_classifiers::models::classifier_trait::{Classifier, ClassifierModel};
use terrain_classifiers::models::factory::build_model;
use terrain_classifiers::models::gaussian_nb::GaussianNBClassifier;

use crate::util::format_labels;

/// Raw labels in these examples are `1` and `2`; they are mapped to `0/1`
/// before fitting and back again for printing.
fn toy_problem(model_type: &ModelType) -> (Array2<f64>, Vec<i64>) {
    match model_type {
        ModelType::GaussianNB { .. } => (
            array![
                [-1.0, -1.0],
                [-2.0, -1.0],
                [-3.0, -2.0],
                [1.0, 1.0],
                [2.0, 1.0],
                [3.0, 2.0]
            ],
            vec![1, 1, 1, 2, 2, 2],
        ),
        ModelType::SVM { .. } => (
            array![[-1.0, -1.0], [-2.0, -1.0], [1.0, 1.0], [2.0, 1.0]],
            vec![1, 1, 2, 2],
        ),
    }
}

fn query() -> Array2<f64> {
    array![[-0.8, -1.0]]
}

/// Model actually used by the demo for `model_type`.
///
/// The SVM demo is always an RBF classifier with data-scaled gamma; only the
/// regularization settings are taken from `model_type`.
pub fn demo_model_type(model_type: &ModelType) -> ModelType {
    match model_type {
        ModelType::GaussianNB { .. } => model_type.clone(),
        ModelType::SVM {
            eps,
            c,
            polynomial_kernel_constant,
            polynomial_kernel_degree,
            ..
        } => ModelType::SVM {
            eps: *eps,
            c: *c,
            kernel: "rbf".to_string(),
            gamma: None,
            polynomial_kernel_constant: *polynomial_kernel_constant,
            polynomial_kernel_degree: *polynomial_kernel_degree,
        },
    }
}

/// Short description of the demo model, e.g. `svm (rbf kernel)`.
pub fn describe_demo(model_type: &ModelType) -> String {
    match demo_model_type(model_type) {
        ModelType::SVM { kernel, .. } => format!("svm ({} kernel)", kernel),
        other => other.name().to_string(),
    }
}

/// Run the toy example for `model_type` and return the lines to print.
///
/// Gaussian NB is fitted twice, once in one go and once through
/// `partial_fit`, so both results can be compared.
pub fn run_demo(model_type: &ModelType) -> Result<Vec<String>> {
    let (x, raw_y) = toy_problem(model_type);
    let encoder = LabelEncoder::fit(&raw_y)?;
    let y: Array1<usize> = encoder.encode(&raw_y)?;

    let mut model = build_model(&ModelConfig::new(demo_model_type(model_type)))?;
    model.fit(&x, &y)?;
    let full = encoder.decode(&model.predict(&query())?)?;

    let mut lines = Vec::new();
    match model_type {
        ModelType::GaussianNB { var_smoothing } => {
            lines.push(format!("Full fit:  {}", format_labels(&full)));

            let mut incremental = GaussianNBClassifier::with_var_smoothing(*var_smoothing);
            incremental.partial_fit(&x, &y)?;
            let partial = encoder.decode(&incremental.predict(&query())?)?;
            lines.push(format!("Partial fit:  {}", format_labels(&partial)));
        }
        ModelType::SVM { .. } => {
            lines.push(format!("Fit result:  {}", format_labels(&full)));
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_nb_demo_predicts_first_class() {
        let lines = run_demo(&ModelType::default()).unwrap();
        assert_eq!(lines, vec!["Full fit:  [1]", "Partial fit:  [1]"]);
    }

    #[test]
    fn test_svm_demo_predicts_first_class() {
        for name in ["svm", "svm-rbf", "svm-poly"] {
            let lines = run_demo(&name.parse().unwrap()).unwrap();
            assert_eq!(lines, vec!["Fit result:  [1]"], "model {}", name);
        }
    }

    #[test]
    fn test_svm_demo_always_uses_scaled_rbf() {
        let linear: ModelType = "svm".parse().unwrap();
        match demo_model_type(&linear) {
            ModelType::SVM { kernel, gamma, .. } => {
                assert_eq!(kernel, "rbf");
                assert_eq!(gamma, None);
            }
            other => panic!("expected SVM, got {:?}", other),
        }
        assert_eq!(describe_demo(&linear), "svm (rbf kernel)");
        assert_eq!(describe_demo(&ModelType::default()), "gaussian_nb");
    }
}
