//! Benchmark comparing direct iteration with iteration through `AnyView`
//!
//! Measures the cost of dispatching every step through the operation table,
//! for inline, heap and borrowed sources.

use any_view::{caps, AnyView};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

const SIZES: [usize; 3] = [1_000, 100_000, 1_000_000];

type Forward<'a> = AnyView<'a, u64, caps![forward | move_only]>;
type Random<'a> = AnyView<'a, u64, caps![random_access | sized | common | borrowed]>;

fn generate(count: usize) -> Vec<u64> {
    (0..count as u64).map(|i| i.wrapping_mul(2_654_435_761)).collect()
}

/// Benchmark: sum every item
fn bench_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        let data = generate(size);

        group.bench_with_input(BenchmarkId::new("slice", size), &data, |b, data| {
            b.iter(|| black_box(data).iter().fold(0u64, |acc, v| acc.wrapping_add(*v)))
        });

        group.bench_with_input(BenchmarkId::new("any_view/owned", size), &data, |b, data| {
            let view: Forward = AnyView::new(data.clone());
            b.iter(|| black_box(&view).iter().fold(0u64, |acc, v| acc.wrapping_add(v)))
        });

        group.bench_with_input(BenchmarkId::new("any_view/borrowed", size), &data, |b, data| {
            let view: Random = AnyView::new(data);
            b.iter(|| black_box(&view).iter().fold(0u64, |acc, v| acc.wrapping_add(v)))
        });

        group.bench_with_input(BenchmarkId::new("any_view/range", size), &size, |b, &size| {
            let view: Forward = AnyView::new(0..size as u64);
            b.iter(|| black_box(&view).iter().fold(0u64, |acc, v| acc.wrapping_add(v)))
        });
    }

    group.finish();
}

/// Benchmark: strided random access
fn bench_strided(c: &mut Criterion) {
    let mut group = c.benchmark_group("strided");

    for size in SIZES {
        group.throughput(Throughput::Elements((size / 7) as u64));
        let data = generate(size);

        group.bench_with_input(BenchmarkId::new("slice", size), &data, |b, data| {
            b.iter(|| {
                let data = black_box(data);
                let mut sum = 0u64;
                let mut i = 0;
                while i < data.len() {
                    sum = sum.wrapping_add(data[i]);
                    i += 7;
                }
                sum
            })
        });

        group.bench_with_input(BenchmarkId::new("any_view", size), &data, |b, data| {
            let view: Random = AnyView::new(data);
            b.iter(|| {
                let view = black_box(&view);
                let end = view.end();
                let mut it = view.begin();
                let mut sum = 0u64;
                while it < end {
                    sum = sum.wrapping_add(it.get());
                    it += 7;
                }
                sum
            })
        });
    }

    group.finish();
}

/// Benchmark: construction and drop
fn bench_construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct");
    let data = generate(64);

    group.bench_function("inline", |b| {
        b.iter(|| {
            let view: Forward = AnyView::new(black_box(0u64..64));
            black_box(view)
        })
    });

    group.bench_function("heap", |b| {
        b.iter(|| {
            let view: Forward = AnyView::new(black_box([7u64; 8]));
            black_box(view)
        })
    });

    group.bench_function("borrowed", |b| {
        b.iter(|| {
            let view: Random = AnyView::new(black_box(&data));
            black_box(view)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sum, bench_strided, bench_construct);
criterion_main!(benches);
