use criterion::{black_box, criterion_group, criterion_main, Criterion};
use descent::dataset::{Dataset, Point};
use descent::metrics::{mse, mse_derivative};
use descent::optimizer::step;

fn dataset(n: usize) -> Dataset {
    Dataset::new(
        (0..n)
            .map(|i| Point::new(i as f64, (i as f64 * 0.37).sin() * 5.0))
            .collect(),
    )
    .unwrap()
}

fn metrics(c: &mut Criterion) {
    let d = dataset(1000);
    c.bench_function("mse", |b| b.iter(|| mse(black_box(&d), black_box(1.5))));
    c.bench_function("mse_derivative", |b| {
        b.iter(|| mse_derivative(black_box(&d), black_box(1.5)))
    });
}

fn run(c: &mut Criterion) {
    let d = dataset(12);
    c.bench_function("15 steps", |b| {
        b.iter(|| {
            let mut x = black_box(-7.0);
            for _ in 0..15 {
                x = step(&d, x, black_box(0.2)).new_b;
            }
            x
        })
    });
}

criterion_group!(benches, metrics, run);
criterion_main!(benches);
