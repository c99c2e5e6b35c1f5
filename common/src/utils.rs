use std::ops::Range;

/// Minimum and maximum of `values`. Returns `(inf, -inf)` for an empty iterator.
pub fn min_max(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = -f64::INFINITY;
    for x in values {
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }
    (min, max)
}

/// The smallest range covering `values`, widened by `padding` (a fraction of its width) on
/// both sides. Degenerate ranges are widened to at least `1.0`.
pub fn padded_range(values: impl IntoIterator<Item = f64>, padding: f64) -> Range<f64> {
    let (mut min, mut max) = min_max(values);
    if !min.is_finite() || !max.is_finite() {
        return -1.0..1.0;
    }
    if max - min < 1.0 {
        let mid = (min + max) * 0.5;
        min = mid - 0.5;
        max = mid + 0.5;
    }
    let pad = (max - min) * padding;
    (min - pad)..(max + pad)
}

/// `n` evenly spaced samples covering `range` (both ends included).
pub fn linspace(range: Range<f64>, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        (range.end - range.start) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |i| range.start + step * i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_widens_degenerate() {
        let r = padded_range([2.0, 2.0], 0.0);
        assert_eq!(r, 1.5..2.5);

        let r = padded_range([0.0, 10.0], 0.1);
        assert_eq!(r, -1.0..11.0);
    }

    #[test]
    fn padded_range_of_nothing() {
        assert_eq!(padded_range([], 0.1), -1.0..1.0);
    }

    #[test]
    fn linspace_includes_ends() {
        let v: Vec<_> = linspace(0.0..1.0, 5).collect();
        assert_eq!(v, [0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0..4.0, 1).collect::<Vec<_>>(), [3.0]);
    }
}
