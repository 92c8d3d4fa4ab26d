use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Failures raised while computing or drawing a decision boundary.
#[derive(Debug)]
pub enum BoundaryError {
    /// Feature rows and labels are not parallel arrays.
    LengthMismatch { features: usize, labels: usize },
    /// Feature matrix does not have exactly two columns.
    FeatureDimension(usize),
    /// A test label outside the canonical `{0, 1}` encoding.
    UnknownLabel { index: usize, label: usize },
    InvalidGrid(String),
    /// The classifier failed or returned an unusable batch.
    Prediction(anyhow::Error),
    /// The plotting backend failed while drawing.
    Render(String),
    /// The image could not be written to its destination.
    Write { path: PathBuf, message: String },
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoundaryError::LengthMismatch { features, labels } => write!(
                f,
                "Features and labels must have equal length ({} feature rows, {} labels)",
                features, labels
            ),
            BoundaryError::FeatureDimension(cols) => {
                write!(f, "Decision boundaries need 2 features, got {}", cols)
            }
            BoundaryError::UnknownLabel { index, label } => write!(
                f,
                "Label {} at index {} is not a binary class label (expected 0 or 1)",
                label, index
            ),
            BoundaryError::InvalidGrid(msg) => write!(f, "Invalid grid: {}", msg),
            BoundaryError::Prediction(e) => write!(f, "Grid prediction failed: {:#}", e),
            BoundaryError::Render(msg) => write!(f, "Failed to draw decision boundary: {}", msg),
            BoundaryError::Write { path, message } => {
                write!(f, "Failed to write {}: {}", path.display(), message)
            }
        }
    }
}

impl Error for BoundaryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BoundaryError::Prediction(e) => Some(&**e),
            _ => None,
        }
    }
}
