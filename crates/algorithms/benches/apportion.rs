//! Benchmarks for the reapportionment engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use areal_algorithms::apportion::{apportion_by_area, ApportionParams};
use areal_algorithms::rounding::round_preserve_sum;
use areal_core::{Zone, ZoneLayer, CRS};
use geo::{Geometry, LineString, Polygon};

fn cell(x: f64, y: f64, side: f64) -> Geometry<f64> {
    Geometry::Polygon(Polygon::new(
        LineString::from(vec![
            (x, y),
            (x + side, y),
            (x + side, y + side),
            (x, y + side),
            (x, y),
        ]),
        vec![],
    ))
}

/// n x n grid of unit squares with a varied population surface
fn grid_layer(n: usize, origin: f64, column: &str) -> ZoneLayer {
    let mut layer = ZoneLayer::new(CRS::from_epsg(26915), vec![column.to_string()]);
    for row in 0..n {
        for col in 0..n {
            let pop = ((row * 7 + col * 13) % 100) as f64 + 1.0;
            layer.push(
                Zone::new(
                    format!("z-{row}-{col}"),
                    cell(origin + col as f64, origin + row as f64, 1.0),
                )
                .with_value(column, pop),
            );
        }
    }
    layer
}

fn bench_apportion(c: &mut Criterion) {
    let mut group = c.benchmark_group("apportion_by_area");

    for n in [8usize, 16, 24].iter() {
        // Target grid offset by half a cell: every interior source splits
        // four ways
        let sources = grid_layer(*n, 0.0, "pop");
        let targets = grid_layer(*n + 1, -0.5, "other");

        let params = ApportionParams {
            columns: vec!["pop".into()],
            round_preserve_sum: Some(0),
            ..Default::default()
        };

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| apportion_by_area(black_box(&targets), black_box(&sources), &params).unwrap())
        });
    }

    group.finish();
}

fn bench_round_preserve_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_preserve_sum");

    for size in [1_000usize, 10_000, 100_000].iter() {
        let values: Vec<f64> = (0..*size).map(|i| (i % 977) as f64 / 7.0).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| round_preserve_sum(black_box(&values), 0))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apportion, bench_round_preserve_sum);
criterion_main!(benches);
