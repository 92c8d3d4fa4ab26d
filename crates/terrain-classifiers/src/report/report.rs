use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// Summary of one fit shown at the top of the report.
#[derive(Debug, Clone)]
pub struct FitSummary {
    pub model_name: String,
    pub n_train: usize,
    pub n_test: usize,
    /// Test-set accuracy, when a labelled test set was available.
    pub accuracy: Option<f64>,
}

/// Render a standalone HTML page containing the summary and the figure.
pub fn render_report(summary: &FitSummary, plot: &Plot) -> String {
    let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let page: Markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Decision boundary: " (summary.model_name) }
                script src=(PLOTLY_CDN) {}
            }
            body {
                h1 { "Decision boundary" }
                table {
                    tr { th { "Model" } td { (summary.model_name) } }
                    tr { th { "Training samples" } td { (summary.n_train) } }
                    tr { th { "Test samples" } td { (summary.n_test) } }
                    @if let Some(acc) = summary.accuracy {
                        tr { th { "Accuracy" } td { (format!("{:.4}", acc)) } }
                    }
                }
                (PreEscaped(plot.to_inline_html(Some("decision-boundary"))))
                p { small { "Generated " (generated) } }
            }
        }
    };
    page.into_string()
}

/// Write the HTML report to `path`.
pub fn write_report<P: AsRef<Path>>(path: P, summary: &FitSummary, plot: &Plot) -> Result<()> {
    let html = render_report(summary, plot);
    std::fs::write(&path, html)
        .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))?;
    log::info!("Wrote report to {}", path.as_ref().display());
    Ok(())
}
