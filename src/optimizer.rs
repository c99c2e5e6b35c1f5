//! One step of gradient descent

use crate::dataset::Dataset;
use crate::metrics::{mse, mse_derivative};

/// The result of a single update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub new_b: f64,
    /// Gradient at the `b` the step started from
    pub gradient: f64,
    /// MSE at the `b` the step started from
    pub mse: f64,
}

/// `new_b = b - learning_rate * MSE'(b)`.
///
/// The learning rate is used as is. Large rates overshoot or diverge, and there is no
/// stopping criterion: a step is taken even if the gradient already is zero.
pub fn step(dataset: &Dataset, b: f64, learning_rate: f64) -> Step {
    let gradient = mse_derivative(dataset, b);
    Step {
        new_b: b - learning_rate * gradient,
        gradient,
        mse: mse(dataset, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Point;
    use assert_approx_eq::assert_approx_eq;

    fn pair() -> Dataset {
        Dataset::new(vec![Point::new(2.0, 2.5), Point::new(7.0, 6.5)]).unwrap()
    }

    #[test]
    fn single_step() {
        let s = step(&pair(), 0.0, 0.1);
        assert_eq!(s.gradient, -9.0);
        assert_approx_eq!(s.new_b, 0.9);
        // ((2.5)^2 + (6.5)^2) / 2
        assert_eq!(s.mse, 24.25);
    }

    #[test]
    fn step_at_optimum_stays() {
        let s = step(&pair(), 4.5, 0.5);
        assert_eq!(s.gradient, 0.0);
        assert_eq!(s.new_b, 4.5);
    }

    #[test]
    fn large_rate_overshoots() {
        let d = pair();
        // lr = 1.0 jumps to the other side of the optimum: b' - 4.5 = -(b - 4.5)
        let s = step(&d, 0.0, 1.0);
        assert_eq!(s.new_b, 9.0);

        // lr > 1.0 diverges
        let mut b = 0.0;
        let mut distances = Vec::new();
        for _ in 0..5 {
            b = step(&d, b, 1.5).new_b;
            distances.push((b - 4.5_f64).abs());
        }
        assert!(distances.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn rate_is_not_clamped() {
        let s = step(&pair(), 0.0, -2.0);
        assert_eq!(s.new_b, -18.0);
    }
}
