//! Tiny unicode plots for the terminal

use std::ops::Range;

use crate::constants::{MARKER_SYM, OPTIMUM_SYM};
use crate::utils::{linspace, min_max};

/// Draw `f` sampled over `range` as a single line of `width` block characters.
///
/// The column closest to `marker` is replaced with a dot, and the column closest to
/// `optimum` with a star. The dot wins when both land in the same column.
pub fn curve_line<F>(
    f: F,
    range: Range<f64>,
    width: usize,
    marker: Option<f64>,
    optimum: Option<f64>,
) -> String
where
    F: Fn(f64) -> f64,
{
    if width == 0 {
        return String::new();
    }

    let values: Vec<f64> = linspace(range.clone(), width).map(f).collect();
    let mut line: Vec<char> = draw_line(&normalize(&values)).chars().collect();

    if let Some(col) = optimum.and_then(|x| column(x, &range, width)) {
        line[col] = OPTIMUM_SYM;
    }
    if let Some(col) = marker.and_then(|x| column(x, &range, width)) {
        line[col] = MARKER_SYM;
    }

    line.into_iter().collect()
}

/// Draw `values` as a sparkline, scaled between their minimum and maximum
pub fn sparkline(values: &[f64]) -> String {
    draw_line(&normalize(values))
}

fn normalize(values: &[f64]) -> Vec<f64> {
    let (min, max) = min_max(values.iter().copied().filter(|x| x.is_finite()));
    let span = max - min;
    values
        .iter()
        .map(|&x| {
            if !x.is_finite() {
                1.0
            } else if span > 0.0 {
                (x - min) / span
            } else {
                0.0
            }
        })
        .collect()
}

/// The column that `x` falls into, `None` if `x` is outside of `range`
fn column(x: f64, range: &Range<f64>, width: usize) -> Option<usize> {
    if !(range.start..=range.end).contains(&x) {
        return None;
    }
    let span = range.end - range.start;
    if span <= 0.0 || width == 1 {
        return Some(0);
    }
    let rel = (x - range.start) / span;
    Some(((rel * (width - 1) as f64).round() as usize).min(width - 1))
}

fn draw_line(values: &[f64]) -> String {
    values
        .iter()
        .map(|x| match (x * 8.).round().clamp(0., 8.) as u8 {
            0 => '\u{2581}',
            1 => '\u{2582}',
            2 => '\u{2583}',
            3 => '\u{2584}',
            4 => '\u{2585}',
            5 => '\u{2586}',
            6 => '\u{2587}',
            _ => '\u{2588}',
        })
        .collect()
}
