use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    GaussianNB {
        /// Portion of the largest feature variance added to all variances.
        var_smoothing: f64,
    },
    SVM {
        eps: f64,
        c: (f64, f64),
        kernel: String,
        /// RBF coefficient. `None` uses `1 / (n_features * var(X))`.
        gamma: Option<f64>,
        polynomial_kernel_constant: f64,
        polynomial_kernel_degree: f64,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::GaussianNB {
            var_smoothing: 1e-9,
        }
    }
}

impl ModelType {
    fn svm(kernel: &str) -> Self {
        ModelType::SVM {
            eps: 1e-3,
            c: (1.0, 1.0),
            kernel: kernel.to_string(),
            gamma: None,
            polynomial_kernel_constant: 0.0,
            polynomial_kernel_degree: 3.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelType::GaussianNB { .. } => "gaussian_nb",
            ModelType::SVM { .. } => "svm",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gnb" | "gaussian_nb" | "gaussiannb" => Ok(ModelType::default()),
            "svm" | "svm-linear" => Ok(ModelType::svm("linear")),
            "svm-rbf" | "svc" => Ok(ModelType::svm("rbf")),
            "svm-poly" => Ok(ModelType::svm("poly")),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: gnb, svm, svm-rbf, svm-poly",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self { model_type }
    }
}

/// Regular query grid over a rectangular 2-D domain.
///
/// Ticks follow half-open `arange` semantics: `ceil((max - min) / step)`
/// values starting at `min`, so the default grid is 100 x 100 over `[0, 1)`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridSpec {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub step: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
            step: 0.01,
        }
    }
}

/// Appearance and destination of a rendered decision boundary.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct RenderConfig {
    pub grid: GridSpec,
    pub width: u32,
    pub height: u32,
    /// Legend names for class 0 and class 1.
    pub class_names: (String, String),
    pub x_label: String,
    pub y_label: String,
    pub title: Option<String>,
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            width: 800,
            height: 600,
            class_names: ("fast".to_string(), "slow".to_string()),
            x_label: "bumpiness".to_string(),
            y_label: "grade".to_string(),
            title: None,
            output: PathBuf::from("test.png"),
        }
    }
}
