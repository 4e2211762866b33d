use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lazyseq::Sequence;

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for size in [1_000i64, 100_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("filter_select_sum", size), &size, |b, &size| {
            b.iter(|| {
                let mut seq = Sequence::range(0, size)
                    .unwrap()
                    .filter(|v| v % 3 == 0)
                    .select(|v| v * 2);
                black_box(seq.sum(0).unwrap())
            });
        });

        // Baseline: the same computation with std iterators
        group.bench_with_input(BenchmarkId::new("std_iter", size), &size, |b, &size| {
            b.iter(|| black_box((0..size).filter(|v| v % 3 == 0).map(|v| v * 2).sum::<i64>()));
        });
    }

    group.finish();
}

fn bench_take_short_circuits(c: &mut Criterion) {
    c.bench_function("take_10_of_infinite", |b| {
        b.iter(|| {
            let mut seq = Sequence::from_iter(0u64..).select(|v| v + 1).take(10).unwrap();
            black_box(seq.to_vec().unwrap())
        });
    });
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");
    let values: Vec<u32> = (0..10_000).map(|i| i % 1_000).collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("to_dictionary", |b| {
        b.iter(|| black_box(Sequence::from_slice(&values).to_dictionary().unwrap().len()));
    });

    group.bench_function("to_lookup", |b| {
        b.iter(|| black_box(Sequence::from_slice(&values).to_lookup(|v| v % 10).unwrap().len()));
    });

    group.bench_function("distinct", |b| {
        b.iter(|| black_box(Sequence::from_slice(&values).distinct().count().unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_take_short_circuits, bench_materialize);
criterion_main!(benches);
