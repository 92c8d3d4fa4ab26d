//! Data structures and helpers for labelled 2-D datasets.
//!
//! Labels inside the crate always use the canonical binary encoding `0`/`1`.
//! Inputs using other encodings (e.g. `1`/`2`) go through [`LabelEncoder`]
//! first so the mapping is explicit and reversible.
use anyhow::{bail, Result};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Feature matrix plus parallel canonical labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainData {
    pub x: Array2<f64>,
    pub y: Array1<usize>,
}

impl TerrainData {
    pub fn new(x: Array2<f64>, y: Array1<usize>) -> Result<Self> {
        if x.nrows() != y.len() {
            bail!(
                "Features and labels must have equal length ({} rows, {} labels)",
                x.nrows(),
                y.len()
            );
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn select(&self, indices: &[usize]) -> TerrainData {
        TerrainData {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }
}

/// Maps raw two-valued labels onto the canonical `0`/`1` encoding.
///
/// Distinct raw values are sorted, so `{1, 2}` becomes `1 -> 0, 2 -> 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<i64>,
}

impl LabelEncoder {
    pub fn fit(raw: &[i64]) -> Result<Self> {
        let mut classes = raw.to_vec();
        classes.sort_unstable();
        classes.dedup();
        match classes.len() {
            0 => bail!("Cannot fit a label encoder on an empty label set"),
            1 | 2 => Ok(Self { classes }),
            n => bail!(
                "Expected at most 2 distinct labels for binary classification, found {}: {:?}",
                n,
                classes
            ),
        }
    }

    /// Build an encoder from an explicit `(class 0, class 1)` pair.
    pub fn from_pair(negative: i64, positive: i64) -> Result<Self> {
        if negative == positive {
            bail!("Label pair must be two distinct values, got {} twice", negative);
        }
        Ok(Self {
            classes: vec![negative, positive],
        })
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn encode(&self, raw: &[i64]) -> Result<Array1<usize>> {
        raw.iter()
            .enumerate()
            .map(|(i, value)| match self.classes.iter().position(|c| c == value) {
                Some(idx) => Ok(idx),
                None => bail!(
                    "Unknown label {} at index {} (known labels: {:?})",
                    value,
                    i,
                    self.classes
                ),
            })
            .collect()
    }

    pub fn decode(&self, encoded: &Array1<usize>) -> Result<Vec<i64>> {
        encoded
            .iter()
            .map(|&idx| match self.classes.get(idx) {
                Some(value) => Ok(*value),
                None => bail!("Encoded label {} is out of range", idx),
            })
            .collect()
    }
}

/// Shuffle with a fixed seed and split off `test_fraction` of the samples.
///
/// Returns `(train, test)`. Both parts are non-empty.
pub fn train_test_split(
    data: &TerrainData,
    test_fraction: f64,
    seed: u64,
) -> Result<(TerrainData, TerrainData)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        bail!("test_fraction must be in (0, 1), got {}", test_fraction);
    }
    let n = data.len();
    if n < 2 {
        bail!("Need at least 2 samples to split, got {}", n);
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1);
    let (test_idx, train_idx) = indices.split_at(n_test);

    log::debug!(
        "Split {} samples into {} train / {} test (seed {})",
        n,
        train_idx.len(),
        test_idx.len(),
        seed
    );
    Ok((data.select(train_idx), data.select(test_idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        assert!(TerrainData::new(array![[0.1, 0.2], [0.3, 0.4]], array![1]).is_err());
    }

    #[test]
    fn test_select_keeps_rows_parallel() {
        let data = TerrainData::new(
            array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]],
            array![1, 0, 1],
        )
        .unwrap();
        let picked = data.select(&[2, 1]);
        assert_eq!(picked.x, array![[0.5, 0.6], [0.3, 0.4]]);
        assert_eq!(picked.y.to_vec(), vec![1, 0]);
    }

    #[test]
    fn test_encoder_sorts_classes() {
        let encoder = LabelEncoder::fit(&[2, 1, 2, 1]).unwrap();
        assert_eq!(encoder.classes(), &[1, 2]);
        assert_eq!(encoder.encode(&[1, 2, 2]).unwrap().to_vec(), vec![0, 1, 1]);
        assert_eq!(encoder.decode(&array![1, 0]).unwrap(), vec![2, 1]);
    }

    #[test]
    fn test_encoder_rejects_third_class() {
        assert!(LabelEncoder::fit(&[0, 1, 2]).is_err());
        let encoder = LabelEncoder::fit(&[0, 1]).unwrap();
        assert!(encoder.encode(&[0, 3]).is_err());
        assert!(encoder.decode(&array![2]).is_err());
    }
}
