pub mod gaussian_nb;
pub mod svm;

pub mod classifier_trait;
pub mod factory;
