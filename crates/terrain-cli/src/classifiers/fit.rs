//! Fit a classifier from a JSON config and draw its decision boundary.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use terrain_classifiers::boundary::{partition_test_points, DecisionSurface};
use terrain_classifiers::config::{ModelConfig, RenderConfig};
use terrain_classifiers::data_handling::{train_test_split, LabelEncoder, TerrainData};
use terrain_classifiers::io::{
    read_terrain_csv_with_config, read_terrain_csv_with_encoder, CsvReaderConfig, LoadedData,
};
use terrain_classifiers::models::classifier_trait::{Classifier, ClassifierModel};
use terrain_classifiers::models::factory::build_model;
use terrain_classifiers::report::plots::{plot_decision_boundary, save_decision_boundary};
use terrain_classifiers::report::report::{write_report, FitSummary};
use terrain_classifiers::stats::accuracy;

use crate::util::validate_data_file;

/// Parameters for one fit-and-plot run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub model: ModelConfig,
    pub train_data: String,
    /// Separate test file. When absent, `test_fraction` of the training file
    /// is held out instead.
    pub test_data: Option<String>,
    pub test_fraction: f64,
    pub seed: u64,
    pub csv: CsvReaderConfig,
    pub render: RenderConfig,
    /// Optional HTML report destination.
    pub report: Option<PathBuf>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            train_data: String::new(),
            test_data: None,
            test_fraction: 0.25,
            seed: 42,
            csv: CsvReaderConfig::default(),
            render: RenderConfig::default(),
            report: None,
        }
    }
}

/// Outcome of [`run_fit`].
#[derive(Debug)]
pub struct FitResult {
    pub model_name: String,
    pub n_train: usize,
    pub n_test: usize,
    pub accuracy: Option<f64>,
    pub surface: DecisionSurface,
}

/// Load a fit configuration from a JSON file.
pub fn load_fit_config<P: AsRef<Path>>(path: P) -> Result<FitConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: FitConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

fn read_data(path: &str, csv: &CsvReaderConfig, encoder: Option<&LabelEncoder>) -> Result<LoadedData> {
    let path = Path::new(path);
    validate_data_file(path)?;

    let mut csv = csv.clone();
    let is_tsv = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_tsv && csv.delimiter == ',' {
        csv.delimiter = '\t';
    }
    match encoder {
        Some(encoder) => read_terrain_csv_with_encoder(path, &csv, encoder),
        None => read_terrain_csv_with_config(path, &csv),
    }
}

fn load_train_test(config: &FitConfig) -> Result<(TerrainData, TerrainData)> {
    let train = read_data(&config.train_data, &config.csv, None)?;

    match &config.test_data {
        Some(test_path) => {
            // The test file is encoded with the training file's mapping
            let test = read_data(test_path, &config.csv, Some(&train.encoder))
                .with_context(|| format!("Failed to load test data: {}", test_path))?;
            Ok((train.data, test.data))
        }
        None => train_test_split(&train.data, config.test_fraction, config.seed),
    }
}

/// Fit the configured model, score it on the test set and render the
/// decision boundary (and report, when configured).
pub fn run_fit(config: &FitConfig) -> Result<FitResult> {
    let mut model: Box<dyn ClassifierModel> = build_model(&config.model)?;
    let (train, test) = load_train_test(config)?;
    log::info!(
        "[Terrain::Classifiers] Fitting {} on {} samples ({} held out)",
        model.name(),
        train.len(),
        test.len()
    );

    model
        .fit(&train.x, &train.y)
        .with_context(|| format!("Failed to fit {}", model.name()))?;

    let accuracy = if test.is_empty() {
        None
    } else {
        let predictions = model.predict(&test.x)?;
        Some(accuracy(&predictions, &test.y)?)
    };
    if let Some(acc) = accuracy {
        log::info!("[Terrain::Classifiers] Test accuracy: {:.4}", acc);
    }

    let surface = save_decision_boundary(model.as_ref(), &test.x, &test.y, &config.render)?;

    if let Some(report_path) = &config.report {
        let overlay = partition_test_points(&test.x, &test.y)?;
        let plot = plot_decision_boundary(&surface, &overlay, &config.render);
        let summary = FitSummary {
            model_name: model.name().to_string(),
            n_train: train.len(),
            n_test: test.len(),
            accuracy,
        };
        write_report(report_path, &summary, &plot)?;
    }

    Ok(FitResult {
        model_name: model.name().to_string(),
        n_train: train.len(),
        n_test: test.len(),
        accuracy,
        surface,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_training_data() {
        let config = FitConfig::default();
        assert!(config.train_data.is_empty());
        assert!(run_fit(&config).is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FitConfig =
            serde_json::from_str(r#"{"train_data": "terrain.csv", "seed": 7}"#).unwrap();
        assert_eq!(config.train_data, "terrain.csv");
        assert_eq!(config.seed, 7);
        assert_eq!(config.test_fraction, 0.25);
        assert_eq!(config.render.output, PathBuf::from("test.png"));
    }

    #[test]
    fn test_test_file_uses_training_label_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let train = dir.path().join("train.csv");
        let test = dir.path().join("test.csv");
        std::fs::write(&train, "bumpiness,grade,label\n0.8,0.9,2\n0.7,0.8,2\n0.9,0.7,2\n").unwrap();
        std::fs::write(&test, "bumpiness,grade,label\n0.1,0.2,1\n0.8,0.8,2\n0.7,0.9,2\n").unwrap();

        let config = FitConfig {
            train_data: train.to_string_lossy().into_owned(),
            test_data: Some(test.to_string_lossy().into_owned()),
            ..FitConfig::default()
        };
        let err = load_train_test(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown label 1"));

        std::fs::write(&test, "bumpiness,grade,label\n0.8,0.8,2\n0.7,0.9,2\n").unwrap();
        let (train_data, test_data) = load_train_test(&config).unwrap();
        assert_eq!(train_data.y.to_vec(), vec![0, 0, 0]);
        assert_eq!(test_data.y.to_vec(), vec![0, 0]);
    }
}
