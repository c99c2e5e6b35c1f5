//! History tables, JSON dumps and SVG plots

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use yansi::Paint;

use common::constants::{ARROW_SYM, NABLA_SYM};
use common::plot::{draw_panels_svg, Panel, RGBColor};
use common::term_plot::sparkline;
use common::utils::padded_range;

use crate::controller::{HistoryEntry, OptimizerState};
use crate::dataset::{Dataset, Point};
use crate::metrics::{mse, Solution};

const POINT_COLOR: RGBColor = RGBColor(0, 0, 0);
const MODEL_COLOR: RGBColor = RGBColor(30, 100, 220);
const OPTIMUM_COLOR: RGBColor = RGBColor(20, 160, 60);
const CURRENT_COLOR: RGBColor = RGBColor(220, 40, 40);
const HISTORY_COLOR: RGBColor = RGBColor(150, 150, 150);

pub fn print_history(out: &mut impl Write, history: &[HistoryEntry]) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        Paint::new(format!(
            "{:>5}  {:>12}  {:>12}  {:>12}",
            "iter", "b", "mse", NABLA_SYM
        ))
        .bold()
    )?;
    for entry in history {
        writeln!(
            out,
            "{:>5}  {:>12.6}  {:>12.6}  {:>12.6}",
            entry.iteration, entry.b, entry.mse, entry.gradient
        )?;
    }
    if history.len() > 1 {
        let mses: Vec<f64> = history.iter().map(|e| e.mse).collect();
        writeln!(out, "{:>5}  {}", "mse", Paint::cyan(sparkline(&mses)))?;
    }
    Ok(())
}

/// One line: where `b` is, where it should be
pub fn print_summary(out: &mut impl Write, dataset: &Dataset, b: f64) -> io::Result<()> {
    let solution = Solution::of(dataset);
    writeln!(
        out,
        "b = {}  mse = {}  {ARROW_SYM}  optimum b = {:.6}  mse = {:.6}",
        Paint::yellow(format!("{b:.6}")),
        Paint::cyan(format!("{:.6}", mse(dataset, b))),
        solution.b,
        solution.mse,
    )?;
    if solution.is_reached_by(b) {
        writeln!(out, "{}", Paint::green("optimum reached"))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct HistoryDump<'a> {
    dataset: Option<&'a str>,
    points: &'a [Point],
    optimal_b: f64,
    current_b: f64,
    history: &'a [HistoryEntry],
}

pub fn history_json(dataset: &Dataset, state: &OptimizerState) -> Result<String> {
    serde_json::to_string_pretty(&dump(dataset, state)).context("could not serialize history")
}

pub fn write_history_json(
    path: impl AsRef<Path>,
    dataset: &Dataset,
    state: &OptimizerState,
) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("could not open {}", path.display()))?;
    let writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &dump(dataset, state))
        .context("could not serialize history")?;
    Ok(())
}

fn dump<'a>(dataset: &'a Dataset, state: &'a OptimizerState) -> HistoryDump<'a> {
    HistoryDump {
        dataset: dataset.name(),
        points: dataset.points(),
        optimal_b: Solution::of(dataset).b,
        current_b: state.current_b(),
        history: state.history(),
    }
}

/// Two charts: the data with the model line, and the MSE curve with the current `b`, the
/// optimum and the visited points marked.
pub fn draw_plot_svg(
    path: impl AsRef<Path>,
    dataset: &Dataset,
    state: &OptimizerState,
) -> Result<()> {
    let path = path.as_ref();
    let file_name = path
        .to_str()
        .with_context(|| format!("{} is not valid unicode", path.display()))?;

    let b = state.current_b();
    let solution = Solution::of(dataset);

    let data_points: Vec<_> = dataset
        .iter()
        .map(|p| (p.x, p.y, POINT_COLOR, 4.0))
        .collect();
    let data_x = padded_range(dataset.xs(), 0.1);
    let data_y = padded_range(dataset.ys().chain([b]), 0.1);

    let b_range = padded_range(
        dataset
            .ys()
            .chain([b, solution.b])
            .chain(state.history().iter().map(|e| e.b)),
        0.15,
    );
    let mse_fn = |x: f64| mse(dataset, x);
    let mse_y = padded_range([b_range.start, b_range.end, solution.b].map(mse_fn), 0.05);

    let mut mse_points: Vec<_> = state
        .history()
        .iter()
        .map(|e| (e.b, e.mse, HISTORY_COLOR, 3.0))
        .collect();
    mse_points.push((solution.b, solution.mse, OPTIMUM_COLOR, 5.0));
    mse_points.push((b, mse(dataset, b), CURRENT_COLOR, 5.0));

    let model = |_: f64| b;
    let title = format!("Data and model y = {b:.3}");

    draw_panels_svg(
        file_name,
        (1400, 600),
        &[
            Panel {
                title: &title,
                x_desc: "x",
                y_desc: "y",
                x_range: data_x,
                y_range: data_y,
                points: &data_points,
                vertical_lines: &[],
                horizontal_lines: &[(solution.b, OPTIMUM_COLOR)],
                fns: &[(&model, MODEL_COLOR)],
            },
            Panel {
                title: "MSE(b)",
                x_desc: "b",
                y_desc: "MSE",
                x_range: b_range,
                y_range: 0.0_f64.min(mse_y.start)..mse_y.end,
                points: &mse_points,
                vertical_lines: &[(solution.b, OPTIMUM_COLOR)],
                horizontal_lines: &[],
                fns: &[(&mse_fn, MODEL_COLOR)],
            },
        ],
    )
    .map_err(|e| anyhow::anyhow!("could not draw {}: {e}", path.display()))?;

    eprintln!("Plot has been saved to {}", path.display());
    Ok(())
}
