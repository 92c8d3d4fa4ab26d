use plotly::common::{ColorScale, ColorScalePalette, Marker, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{HeatMap, Plot, Scatter};
use plotters::coord::Shift;
use plotters::prelude::*;

use ndarray::{Array1, Array2};

use crate::boundary::{compute_decision_surface, partition_test_points, DecisionSurface, ScatterOverlay};
use crate::config::RenderConfig;
use crate::error::BoundaryError;
use crate::models::classifier_trait::Classifier;

/// Region fill for class 0 / class 1 cells.
const REGION_COLORS: [RGBColor; 2] = [RGBColor(158, 202, 225), RGBColor(252, 174, 145)];
/// Scatter colour for class 0 / class 1 test points.
const POINT_COLORS: [RGBColor; 2] = [BLUE, RED];
const POINT_SIZE: i32 = 3;

/// Compute the decision surface for `clf` and draw it, with the test points,
/// onto `area`.
///
/// The test set is validated before the classifier is queried. Axis titles
/// and the legend need a system font; if text cannot be drawn they are
/// skipped with a warning and the regions and points are kept. The caller
/// owns `area` and decides when to `present` it.
pub fn draw_decision_boundary<DB, C>(
    area: &DrawingArea<DB, Shift>,
    clf: &C,
    features: &Array2<f64>,
    labels: &Array1<usize>,
    config: &RenderConfig,
) -> Result<DecisionSurface, BoundaryError>
where
    DB: DrawingBackend,
    C: Classifier + ?Sized,
{
    let overlay = partition_test_points(features, labels)?;
    let surface = compute_decision_surface(clf, &config.grid)?;
    draw_surface(area, &surface, &overlay, config)?;
    Ok(surface)
}

/// Draw an already computed surface and overlay onto `area`.
pub fn draw_surface<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    surface: &DecisionSurface,
    overlay: &ScatterOverlay,
    config: &RenderConfig,
) -> Result<(), BoundaryError> {
    let grid = &config.grid;
    area.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(grid.x_min..grid.x_max, grid.y_min..grid.y_max)
        .map_err(render_error)?;

    chart
        .draw_series(surface.cells().map(|(x0, y0, x1, y1, label)| {
            Rectangle::new([(x0, y0), (x1, y1)], REGION_COLORS[label.min(1)].filled())
        }))
        .map_err(render_error)?;

    let (name_0, name_1) = &config.class_names;
    for (points, color, name) in [
        (&overlay.class_0, POINT_COLORS[0], name_0),
        (&overlay.class_1, POINT_COLORS[1], name_1),
    ] {
        chart
            .draw_series(
                points
                    .iter()
                    .map(move |&(x, y)| Circle::new((x, y), POINT_SIZE, color.filled())),
            )
            .map_err(render_error)?
            .label(name.as_str())
            .legend(move |(x, y)| Circle::new((x, y), POINT_SIZE, color.filled()));
    }

    let mesh = chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(config.x_label.as_str())
        .y_desc(config.y_label.as_str())
        .draw();
    let annotations = mesh.and_then(|_| {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
    });
    if let Err(e) = annotations {
        log::warn!("Skipping axis titles and legend: {}", e);
    }

    if let Some(title) = &config.title {
        let style = ("sans-serif", 20).into_font().color(&BLACK);
        if let Err(e) = area.draw(&Text::new(title.as_str(), (10, 2), style)) {
            log::warn!("Skipping title: {}", e);
        }
    }
    Ok(())
}

/// Render the decision boundary to `config.output` as a bitmap image.
///
/// The image format follows the file extension (`.png` by default). Failing
/// to save is reported as [`BoundaryError::Write`], separate from prediction
/// and drawing failures.
pub fn save_decision_boundary<C: Classifier + ?Sized>(
    clf: &C,
    features: &Array2<f64>,
    labels: &Array1<usize>,
    config: &RenderConfig,
) -> Result<DecisionSurface, BoundaryError> {
    let root = BitMapBackend::new(&config.output, (config.width, config.height)).into_drawing_area();
    let surface = draw_decision_boundary(&root, clf, features, labels, config)?;
    root.present().map_err(|e| BoundaryError::Write {
        path: config.output.clone(),
        message: e.to_string(),
    })?;
    log::info!(
        "Wrote decision boundary ({} x {} grid) to {}",
        surface.x_ticks.len(),
        surface.y_ticks.len(),
        config.output.display()
    );
    Ok(surface)
}

fn render_error<E: std::fmt::Display>(e: E) -> BoundaryError {
    BoundaryError::Render(e.to_string())
}

/// Interactive version of the decision boundary: a heatmap of predicted
/// classes with the test points on top.
pub fn plot_decision_boundary(
    surface: &DecisionSurface,
    overlay: &ScatterOverlay,
    config: &RenderConfig,
) -> Plot {
    let heatmap = HeatMap::new(surface.x_ticks.clone(), surface.y_ticks.clone(), surface.rows())
        .color_scale(ColorScale::Palette(ColorScalePalette::Jet))
        .show_scale(false);

    let mut plot = Plot::new();
    plot.add_trace(heatmap);

    let (name_0, name_1) = &config.class_names;
    for (points, color, name) in [
        (&overlay.class_0, "blue", name_0),
        (&overlay.class_1, "red", name_1),
    ] {
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        let trace = Scatter::new(xs, ys)
            .mode(Mode::Markers)
            .name(name.as_str())
            .marker(Marker::new().color(color).size(6));
        plot.add_trace(trace);
    }

    let grid = &config.grid;
    let title = config
        .title
        .clone()
        .unwrap_or_else(|| "Decision boundary".to_string());
    let layout = Layout::new()
        .title(title.as_str())
        .x_axis(Axis::new().title(config.x_label.as_str()).range(vec![grid.x_min, grid.x_max]))
        .y_axis(Axis::new().title(config.y_label.as_str()).range(vec![grid.y_min, grid.y_max]));
    plot.set_layout(layout);

    plot
}
