use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use scoped_duration::{DurationStore, ScopedTimer};
use std::hint::black_box;

fn benchmark_scoped_timer(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoped_timer");

    group.bench_function("closure_sink", |b| {
        let mut last = 0.0;
        b.iter(|| {
            let _timer = ScopedTimer::new(|secs: f64| last = secs);
        });
        black_box(last);
    });

    group.bench_function("tag_recorder", |b| {
        let store = DurationStore::new();
        b.iter(|| {
            let _timer = store.timer(black_box("bench"));
        });
    });

    group.finish();
}

fn benchmark_store_mean(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_mean");

    for samples in [10usize, 1_000, 100_000] {
        let store = DurationStore::new();
        for i in 0..samples {
            store.record("mean", i as f64).expect("fresh store is never poisoned");
        }
        group.bench_with_input(BenchmarkId::from_parameter(samples), &store, |b, s| {
            b.iter(|| black_box(s.mean("mean").expect("tag has samples")));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_scoped_timer, benchmark_store_mean);
criterion_main!(benches);
