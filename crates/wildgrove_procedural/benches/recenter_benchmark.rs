//! Benchmark for window recentering.
//!
//! TARGET: a one-chunk step of the default 11x11 window inside one 60 FPS frame (16.6ms)
//!
//! Run with: cargo bench --package wildgrove_procedural --bench recenter_benchmark

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use wildgrove_core::{PixelPos, WorldConfig};
use wildgrove_procedural::World;

fn benchmark_one_chunk_step(c: &mut Criterion) {
    let mut world = World::new(WorldConfig::default(), PixelPos::new(0.0, 0.0)).expect("default config");
    let step = f64::from(world.units().chunk_width_in_pixels());

    c.bench_function("recenter_one_chunk_east", |b| {
        let mut x = 0.0_f64;
        b.iter(|| {
            x += step;
            black_box(world.recenter(PixelPos::new(x, 0.0)).expect("recenter"))
        });
    });
}

fn benchmark_full_replacement(c: &mut Criterion) {
    c.bench_function("recenter_far_jump", |b| {
        b.iter_batched(
            || World::new(WorldConfig::default(), PixelPos::new(0.0, 0.0)).expect("default config"),
            |mut world| black_box(world.recenter(PixelPos::new(1.0e6, -1.0e6)).expect("recenter")),
            BatchSize::LargeInput,
        );
    });
}

fn benchmark_area_query(c: &mut Criterion) {
    let world = World::new(WorldConfig::default(), PixelPos::new(0.0, 0.0)).expect("default config");
    let area = wildgrove_core::PixelRect::around(PixelPos::new(0.0, 0.0), 600.0);

    c.bench_function("grass_tiles_in_600px_radius", |b| {
        b.iter(|| {
            world.for_each_object_in_area(wildgrove_core::ObjectType::GrassTile, black_box(area), |handle, _| {
                black_box(handle);
            })
        });
    });
}

criterion_group!(
    benches,
    benchmark_one_chunk_step,
    benchmark_full_replacement,
    benchmark_area_query
);
criterion_main!(benches);
