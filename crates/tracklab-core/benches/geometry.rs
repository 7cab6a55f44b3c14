//! Benchmarks for quadrilateral geometry.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;

use tracklab_core::geometry::{
    inscribed_quadrilateral_area_from_coordinates, pairwise_distance, QuadIndices,
};
use tracklab_core::{Marker, MarkerGroup};

fn create_pupil_coordinates(n_frames: usize) -> (Array2<f64>, Array2<f64>) {
    let x = Array2::from_shape_fn((4, n_frames), |(m, t)| {
        let wobble = (t as f64 * 0.01).sin() * 0.1;
        [0.0, 0.0, -1.0, 1.0][m] + wobble
    });
    let y = Array2::from_shape_fn((4, n_frames), |(m, t)| {
        let wobble = (t as f64 * 0.013).cos() * 0.1;
        [1.0, -1.0, 0.0, 0.0][m] + wobble
    });
    (x, y)
}

fn benchmark_quad_area(c: &mut Criterion) {
    let (x_short, y_short) = create_pupil_coordinates(1_000);
    let (x_long, y_long) = create_pupil_coordinates(100_000);

    c.bench_function("quad_area_1k_frames", |b| {
        b.iter(|| {
            inscribed_quadrilateral_area_from_coordinates(
                black_box(x_short.view()),
                black_box(y_short.view()),
                QuadIndices::default(),
            )
        })
    });

    c.bench_function("quad_area_100k_frames", |b| {
        b.iter(|| {
            inscribed_quadrilateral_area_from_coordinates(
                black_box(x_long.view()),
                black_box(y_long.view()),
                QuadIndices::default(),
            )
        })
    });
}

fn benchmark_pairwise(c: &mut Criterion) {
    let (x, y) = create_pupil_coordinates(100_000);
    let x_pair = x.slice(ndarray::s![0..2, ..]);
    let y_pair = y.slice(ndarray::s![0..2, ..]);

    c.bench_function("pairwise_distance_100k_frames", |b| {
        b.iter(|| pairwise_distance(black_box(x_pair), black_box(y_pair)))
    });
}

fn benchmark_group_export(c: &mut Criterion) {
    let (x, y) = create_pupil_coordinates(100_000);
    let members: Vec<Marker> = (0..4)
        .map(|m| {
            Marker::new(
                format!("pupil_{}", m),
                x.row(m).to_owned(),
                y.row(m).to_owned(),
                ndarray::Array1::from_elem(x.ncols(), 0.99),
            )
            .expect("equal-length series")
        })
        .collect();
    let group = MarkerGroup::new(members).expect("equal frame counts");

    c.bench_function("group_to_arrays_100k_frames", |b| {
        b.iter(|| black_box(&group).to_arrays())
    });
}

criterion_group!(
    benches,
    benchmark_quad_area,
    benchmark_pairwise,
    benchmark_group_export
);
criterion_main!(benches);
