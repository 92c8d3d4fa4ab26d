//! Delimited text reader for 2-D labelled datasets.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::data_handling::{LabelEncoder, TerrainData};

/// Configuration for reading labelled feature files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvReaderConfig {
    /// Feature columns to load, in order.
    pub feature_columns: Vec<String>,
    /// Column holding the raw class labels.
    pub label_column: String,
    pub delimiter: char,
    /// Explicit `(class 0, class 1)` raw values. When `None`, the sorted
    /// distinct labels found in the file are used.
    pub label_pair: Option<(i64, i64)>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            feature_columns: vec!["bumpiness".to_string(), "grade".to_string()],
            label_column: "label".to_string(),
            delimiter: ',',
            label_pair: None,
        }
    }
}

/// Parsed dataset with the encoder used to map its raw labels.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub data: TerrainData,
    pub encoder: LabelEncoder,
}

/// Read a comma separated file with `bumpiness,grade,label` columns.
pub fn read_terrain_csv<P: AsRef<Path>>(path: P) -> Result<LoadedData> {
    read_terrain_csv_with_config(path, &CsvReaderConfig::default())
}

/// Read a delimited file using a custom configuration.
///
/// The label mapping comes from `config.label_pair` when set, otherwise from
/// the sorted distinct labels found in the file.
pub fn read_terrain_csv_with_config<P: AsRef<Path>>(
    path: P,
    config: &CsvReaderConfig,
) -> Result<LoadedData> {
    let (x, raw_labels) = read_records(&path, config)?;
    let encoder = match config.label_pair {
        Some((negative, positive)) => LabelEncoder::from_pair(negative, positive)?,
        None => LabelEncoder::fit(&raw_labels)
            .with_context(|| format!("Failed to encode labels in {}", path.as_ref().display()))?,
    };
    build_loaded(path, x, &raw_labels, encoder)
}

/// Read a delimited file whose labels must follow an existing mapping.
///
/// Used for test files, which share the encoder fitted on the training file
/// even when that file holds a single class. Labels the encoder does not
/// know are an error.
pub fn read_terrain_csv_with_encoder<P: AsRef<Path>>(
    path: P,
    config: &CsvReaderConfig,
    encoder: &LabelEncoder,
) -> Result<LoadedData> {
    let (x, raw_labels) = read_records(&path, config)?;
    build_loaded(path, x, &raw_labels, encoder.clone())
}

fn build_loaded<P: AsRef<Path>>(
    path: P,
    x: Array2<f64>,
    raw_labels: &[i64],
    encoder: LabelEncoder,
) -> Result<LoadedData> {
    let y: Array1<usize> = encoder
        .encode(raw_labels)
        .with_context(|| format!("Failed to encode labels in {}", path.as_ref().display()))?;
    let data = TerrainData::new(x, y)?;

    log::debug!(
        "Loaded {} samples with {} features from {}",
        data.len(),
        data.x.ncols(),
        path.as_ref().display()
    );
    Ok(LoadedData { data, encoder })
}

fn read_records<P: AsRef<Path>>(path: P, config: &CsvReaderConfig) -> Result<(Array2<f64>, Vec<i64>)> {
    if !config.delimiter.is_ascii() {
        return Err(anyhow!("Delimiter must be an ASCII character, got {:?}", config.delimiter));
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .with_context(|| format!("Failed to open data file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}'", config.label_column))?;

    let feature_indices = config
        .feature_columns
        .iter()
        .map(|name| {
            find_column(&headers, name).ok_or_else(|| anyhow!("Missing feature column '{}'", name))
        })
        .collect::<Result<Vec<usize>>>()?;
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns configured"));
    }

    let mut features = Vec::new();
    let mut raw_labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let label = parse_label(
            record
                .get(label_idx)
                .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?,
        )
        .with_context(|| format!("Invalid label at row {}", row_idx + 1))?;
        raw_labels.push(label);

        for (&idx, name) in feature_indices.iter().zip(&config.feature_columns) {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing '{}' value at row {}", name, row_idx + 1))?
                .parse::<f64>()
                .with_context(|| format!("Invalid '{}' value at row {}", name, row_idx + 1))?;
            features.push(value);
        }
    }

    let x = Array2::from_shape_vec((raw_labels.len(), feature_indices.len()), features)?;
    Ok((x, raw_labels))
}

/// Labels are integers, but files written by numpy often carry `1.0`.
fn parse_label(value: &str) -> Result<i64> {
    if let Ok(v) = value.parse::<i64>() {
        return Ok(v);
    }
    let v = value.parse::<f64>()?;
    if v.fract() != 0.0 || !v.is_finite() {
        return Err(anyhow!("Label '{}' is not an integer", value));
    }
    Ok(v as i64)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}
