use std::ops::Range;

pub use plotters;
pub use plotters::style::RGBColor;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::utils::linspace;

/// How many samples are taken to draw a function
const FN_SAMPLES: usize = 400;

/// One chart of a (possibly multi-chart) plot
pub struct Panel<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    /// `(x, y, color, radius)`
    pub points: &'a [(f64, f64, RGBColor, f64)],
    pub vertical_lines: &'a [(f64, RGBColor)],
    pub horizontal_lines: &'a [(f64, RGBColor)],
    pub fns: &'a [(&'a dyn Fn(f64) -> f64, RGBColor)],
}

/// Draw `panels` side by side into an SVG file
pub fn draw_panels_svg(
    file_name: &str,
    size: (u32, u32),
    panels: &[Panel<'_>],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(file_name, size).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((1, panels.len().max(1)));
    for (area, panel) in areas.iter().zip(panels) {
        draw_panel(area, panel)?;
    }

    // To avoid the IO failure being ignored silently, we manually call the present function
    root.present()?;

    Ok(())
}

fn draw_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    panel: &Panel<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Range {
        start: x_min,
        end: x_max,
    } = panel.x_range;
    let Range {
        start: y_min,
        end: y_max,
    } = panel.y_range;

    let mut ctx = ChartBuilder::on(area)
        .caption(panel.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(panel.x_desc)
        .y_desc(panel.y_desc)
        .draw()?;

    for &(x, color) in panel.vertical_lines {
        ctx.draw_series(LineSeries::new([(x, y_min), (x, y_max)], color))?;
    }
    for &(y, color) in panel.horizontal_lines {
        ctx.draw_series(LineSeries::new([(x_min, y), (x_max, y)], color))?;
    }
    for &(function, color) in panel.fns {
        let points = linspace(x_min..x_max, FN_SAMPLES)
            .map(|x| (x, function(x)))
            .filter(|(_, y)| y.is_finite());
        ctx.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
    }
    ctx.draw_series(
        panel
            .points
            .iter()
            .map(|&(x, y, color, size)| Circle::new((x, y), size, color.filled())),
    )?;

    Ok(())
}
