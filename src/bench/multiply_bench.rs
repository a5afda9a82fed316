//! Criterion benchmark of the i-k-j kernel, independent of the CSV harness.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use matbench::matrix::random::operands;
use matbench::multiply;

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply_ikj");
    group.sample_size(10);

    for size in [64, 128, 256, 512] {
        let (a, b) = operands(size, 123);
        group.throughput(Throughput::Elements((2 * size * size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, _| {
            bencher.iter(|| black_box(multiply(black_box(&a), black_box(&b))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_multiply);
criterion_main!(benches);
