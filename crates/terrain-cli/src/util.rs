use std::path::Path;

use anyhow::{bail, Result};

/// Check that `path` names an existing `.csv` or `.tsv` file.
pub fn validate_data_file(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    if !matches!(ext.as_deref(), Some("csv") | Some("tsv")) {
        bail!("Data file must have a .csv or .tsv extension: {}", path.display());
    }
    if !path.is_file() {
        bail!("Data file does not exist: {}", path.display());
    }
    Ok(())
}

/// Render labels as `[a, b, c]` for console output.
pub fn format_labels(labels: &[i64]) -> String {
    let inner = labels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", inner)
}
