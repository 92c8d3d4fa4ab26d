//! terrain-classifiers: toy binary classifiers and decision-boundary plots.
//!
//! This crate provides thin model wrappers (Gaussian Naive Bayes and SVM on
//! top of linfa), a small 2-D dataset type with an explicit label encoding,
//! CSV loading, and a decision-boundary renderer that queries a fitted
//! classifier over a regular grid and draws the predicted regions together
//! with the labelled test points.
//!
//! The renderer only depends on the one-method [`models::classifier_trait::Classifier`]
//! trait, so any predictor (including test stubs) can be plotted.
pub mod boundary;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;
pub mod report;
pub mod stats;
