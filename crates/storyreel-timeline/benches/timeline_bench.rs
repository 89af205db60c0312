//! Benchmarks for storyreel-timeline pointer hit-testing and placement.
//!
//! Run with: cargo bench -p storyreel-timeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use storyreel_timeline::{
    nearest_free_start, ClipId, ClipMedia, InteractionEngine, MediaRef, PointerPos, Timeline,
    TimelineGeometry,
};

fn long_timeline(clips: usize) -> Timeline {
    let media = (0..clips).map(|i| ClipMedia::image(MediaRef::new(format!("media-{i}"))));
    Timeline::from_media(media, 5.0, 3).expect("valid layout")
}

fn bench_hit_test(c: &mut Criterion) {
    let timeline = long_timeline(500);
    let geometry = TimelineGeometry::default();
    let engine = InteractionEngine::default();

    c.bench_function("hit_test_body_500_clips", |bencher| {
        let pos = PointerPos::new(geometry.time_to_x(1234.5), 20.0);
        bencher.iter(|| engine.hit_test(black_box(&timeline), &geometry, black_box(pos)));
    });

    c.bench_function("hit_test_background_500_clips", |bencher| {
        let pos = PointerPos::new(100.0, 200.0);
        bencher.iter(|| engine.hit_test(black_box(&timeline), &geometry, black_box(pos)));
    });
}

fn bench_placement(c: &mut Criterion) {
    let timeline = long_timeline(500);
    let exclude = ClipId::sequential(250);

    c.bench_function("nearest_free_start_500_clips", |bencher| {
        bencher.iter(|| {
            nearest_free_start(
                black_box(&timeline),
                0,
                black_box(1243.0),
                5.0,
                Some(&exclude),
            )
        });
    });
}

fn bench_ticks(c: &mut Criterion) {
    let geometry = TimelineGeometry::default();

    c.bench_function("ruler_ticks_1hr", |bencher| {
        bencher.iter(|| geometry.ticks(black_box(3600.0)).count());
    });
}

criterion_group!(benches, bench_hit_test, bench_placement, bench_ticks);
criterion_main!(benches);
