//! Reporting and plotting helpers.
//!
//! `plots` draws decision boundaries, either onto a plotters drawing area
//! (bitmap output) or as an interactive `plotly::Plot`. `report` wraps the
//! interactive figure and fit summary into a standalone HTML page.
pub mod plots;
pub mod report;
