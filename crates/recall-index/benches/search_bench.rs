use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use recall_index::PartitionIndex;
use test_fixtures::{seeded_entries, seeded_vector};

const DIMS: usize = 768;

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_search");
    for &count in &[1_000usize, 10_000] {
        let partition = PartitionIndex::new("bench", DIMS, None).unwrap();
        partition.load().unwrap();
        partition
            .add_batch(seeded_entries("kb", count, DIMS))
            .unwrap();
        let query = seeded_vector("query", DIMS);

        group.bench_with_input(BenchmarkId::new("top10", count), &count, |b, _| {
            b.iter(|| partition.search(black_box(&query), 10, None).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
