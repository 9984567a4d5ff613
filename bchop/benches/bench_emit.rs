//! Emission benchmarks: rendering a prebuilt tree, and evaluating it
//! directly for comparison.

mod bench_vocab;

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use bchop::{build_top, emit, CodeWriter};

use bench_vocab::{sizes, table};

fn bench_emit_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit/tree");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(4));

    for (name, n) in sizes() {
        let table = table(n);
        let tree = build_top(table.tree_keys());
        group.bench_with_input(BenchmarkId::from_parameter(name), &(table, tree), |b, (table, tree)| {
            b.iter(|| {
                let mut w = CodeWriter::with_capacity(n * 128);
                emit(tree, &mut w, table);
                w.into_string()
            });
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit/classify");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(4));

    for (name, n) in sizes() {
        let table = table(n);
        let tree = build_top(table.tree_keys());
        let probes: Vec<String> = table
            .keys()
            .map(|k| format!("{}s", k))
            .chain(table.keys().map(str::to_owned))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(name), &probes, |b, probes| {
            b.iter(|| probes.iter().filter(|p| tree.classify(p).is_some()).count());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_emit_tree, bench_classify);
criterion_main!(benches);
