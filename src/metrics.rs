//! Mean squared error of the intercept-only model `y = b`.
//!
//! The slice functions trust their input: for an empty slice they return NaN instead of
//! panicking. [`Dataset`] never is empty, so the dataset wrappers are always defined.

use crate::approx_eq::ApproxEq;
use crate::dataset::{Dataset, Point};

/// `(1/n) * sum((y_i - b)^2)`
pub fn mse(dataset: &Dataset, b: f64) -> f64 {
    mse_of(dataset, b)
}

/// `-(2/n) * sum(y_i - b)`
pub fn mse_derivative(dataset: &Dataset, b: f64) -> f64 {
    mse_derivative_of(dataset, b)
}

/// The mean of `y`, the only root of [`mse_derivative`]
pub fn optimal_b(dataset: &Dataset) -> f64 {
    mean_y(dataset)
}

pub fn mse_of(points: &[Point], b: f64) -> f64 {
    let n = points.len() as f64;
    points
        .iter()
        .map(|p| {
            let residual = p.y - b;
            residual * residual
        })
        .sum::<f64>()
        / n
}

pub fn mse_derivative_of(points: &[Point], b: f64) -> f64 {
    let n = points.len() as f64;
    -(2.0 / n) * points.iter().map(|p| p.y - b).sum::<f64>()
}

pub fn mean_y(points: &[Point]) -> f64 {
    points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64
}

/// The answer to reveal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub b: f64,
    pub mse: f64,
}

impl Solution {
    pub fn of(dataset: &Dataset) -> Self {
        let b = optimal_b(dataset);
        Self {
            b,
            mse: mse(dataset, b),
        }
    }

    /// Whether `b` is the optimum, up to rounding
    pub fn is_reached_by(&self, b: f64) -> bool {
        self.b.approx_eq(b)
    }
}
