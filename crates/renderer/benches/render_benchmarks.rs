//! Benchmarks for the renderer crate - upscaling strategies and encoding.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks
//! Or a single group: cargo bench --package renderer -- upscale

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use renderer::{
    normalize, png, spline, upscale, BilateralParams, FrameRenderer, Interpolation, Palette,
    RenderParams,
};
use test_utils::{hot_spot_grid, noisy_grid};

/// Typical display resolutions.
const TARGETS: &[(&str, u32, u32)] = &[("480p", 640, 480), ("1080p", 1920, 1080)];

fn bench_upscale_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("upscale");
    group.sample_size(20);

    let raw = hot_spot_grid(21.0, 34.0, 12.0, 9.0, 6.0);
    let intensity = normalize(&raw, raw.bounds());
    let palette = Palette::by_name("jet").expect("jet palette");

    for &(target, width, height) in TARGETS {
        group.throughput(Throughput::Elements((width * height) as u64));
        for interp in Interpolation::ALL {
            group.bench_with_input(
                BenchmarkId::new(interp.key(), target),
                &interp,
                |b, &interp| {
                    b.iter(|| upscale(black_box(&intensity), &palette, interp, width, height))
                },
            );
        }
    }

    group.finish();
}

fn bench_spline_zoom(c: &mut Criterion) {
    let mut group = c.benchmark_group("spline_zoom");

    let raw = noisy_grid(24.0, 3.0, 42);
    let intensity = normalize(&raw, raw.bounds());

    for zoom in [10.0f32, 25.0] {
        group.bench_with_input(BenchmarkId::from_parameter(zoom), &zoom, |b, &zoom| {
            b.iter(|| spline::spline_zoom(black_box(intensity.as_slice()), 32, 24, zoom))
        });
    }

    group.finish();
}

fn bench_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_frame");
    group.sample_size(10);

    let renderer = FrameRenderer::new(&["jet"], 640, 480, BilateralParams::default())
        .expect("renderer");
    let raw = hot_spot_grid(21.0, 34.0, 20.0, 12.0, 5.0);

    for filter_enabled in [false, true] {
        let params = RenderParams {
            palette_index: 0,
            interpolation: Interpolation::Hybrid,
            filter_enabled,
        };
        let name = if filter_enabled { "hybrid_filtered" } else { "hybrid" };
        group.bench_function(name, |b| {
            b.iter(|| renderer.render(black_box(&raw), raw.bounds(), &params))
        });
    }

    group.finish();
}

fn bench_png_encoding(c: &mut Criterion) {
    let renderer = FrameRenderer::new(&["inferno"], 640, 480, BilateralParams::default())
        .expect("renderer");
    let raw = hot_spot_grid(21.0, 34.0, 20.0, 12.0, 5.0);
    let params = RenderParams {
        palette_index: 0,
        interpolation: Interpolation::Bicubic,
        filter_enabled: false,
    };
    let image = renderer.render(&raw, raw.bounds(), &params);

    c.bench_function("png_encode_480p", |b| {
        b.iter(|| png::encode_rgb(black_box(&image)))
    });
}

criterion_group!(
    benches,
    bench_upscale_strategies,
    bench_spline_zoom,
    bench_full_frame,
    bench_png_encoding,
);
criterion_main!(benches);
