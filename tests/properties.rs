use proptest::prelude::*;

use descent::animator::{AnimationParams, Animation};
use descent::dataset::{Dataset, Point};
use descent::metrics::{mse, mse_derivative, optimal_b};
use descent::optimizer::step;

fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 1..30).prop_map(|points| {
        Dataset::new(points.into_iter().map(|(x, y)| Point::new(x, y)).collect()).unwrap()
    })
}

proptest! {
    #[test]
    fn mse_is_non_negative(d in dataset(), b in -1000.0..1000.0f64) {
        prop_assert!(mse(&d, b) >= 0.0);
    }

    #[test]
    fn mse_is_zero_on_flat_data(y in -100.0..100.0f64, n in 1usize..20) {
        let d = Dataset::new((0..n).map(|i| Point::new(i as f64, y)).collect()).unwrap();
        prop_assert_eq!(mse(&d, y), 0.0);
    }

    #[test]
    fn derivative_vanishes_at_optimum(d in dataset()) {
        prop_assert!(mse_derivative(&d, optimal_b(&d)).abs() < 1e-9);
    }

    #[test]
    fn optimum_is_minimal(d in dataset(), b in -1000.0..1000.0f64) {
        let best = optimal_b(&d);
        prop_assert!(mse(&d, best) <= mse(&d, b) + 1e-9);
    }

    #[test]
    fn optimum_is_strictly_minimal(d in dataset(), b in -1000.0..1000.0f64) {
        let best = optimal_b(&d);
        prop_assume!((b - best).abs() > 1e-3);
        prop_assert!(mse(&d, b) > mse(&d, best));
    }

    #[test]
    fn mse_is_positive_off_the_data(d in dataset(), i in any::<prop::sample::Index>()) {
        // b sits on one of the points, so only the other points can make the error zero
        let b = d[i.index(d.len())].y;
        if d.ys().any(|y| y != b) {
            prop_assert!(mse(&d, b) > 0.0);
        } else {
            prop_assert_eq!(mse(&d, b), 0.0);
        }
    }

    #[test]
    fn derivative_points_to_optimum(d in dataset(), b in -1000.0..1000.0f64) {
        let best = optimal_b(&d);
        let g = mse_derivative(&d, b);
        if b < best - 1e-6 {
            prop_assert!(g < 0.0);
        } else if b > best + 1e-6 {
            prop_assert!(g > 0.0);
        }
    }

    #[test]
    fn step_follows_the_gradient(d in dataset(), b in -100.0..100.0f64, lr in 0.001..1.0f64) {
        let s = step(&d, b, lr);
        prop_assert_eq!(s.gradient, mse_derivative(&d, b));
        prop_assert_eq!(s.new_b, b - lr * s.gradient);
        prop_assert_eq!(s.mse, mse(&d, b));
    }

    #[test]
    fn small_steps_never_increase_mse(d in dataset(), b in -100.0..100.0f64, lr in 0.001..0.5f64) {
        let s = step(&d, b, lr);
        prop_assert!(mse(&d, s.new_b) <= s.mse * (1.0 + 1e-12) + 1e-9);
    }

    #[test]
    fn animation_ends_at_target(
        from in -100.0..100.0f64,
        to in -100.0..100.0f64,
        steps in 1u32..60,
    ) {
        let params = AnimationParams::new(400.0, steps).unwrap();
        let values: Vec<f64> = Animation::new(from, to, params).map(|t| t.b).collect();

        prop_assert_eq!(values.len(), steps as usize);
        prop_assert_eq!(*values.last().unwrap(), to);
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        for w in values.windows(2) {
            if from <= to {
                prop_assert!(w[0] <= w[1]);
            } else {
                prop_assert!(w[0] >= w[1]);
            }
        }
        prop_assert!(values.iter().all(|v| (lo - 1e-9..=hi + 1e-9).contains(v)));
    }
}
