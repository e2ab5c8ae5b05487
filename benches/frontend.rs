use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fpp::config::KindRegistry;
use fpp::definition::DefinitionCollection;

const BENCH_INPUT: &str = "resource/test.fpp";

fn load_bench(name: &str) -> String { std::fs::read_to_string(name).expect("Unknown bench path") }

/// `copies` namespaces, each declaring one of every kind
fn synthetic(copies: usize) -> String {
    (0..copies)
        .map(|i| {
            format!(
                "namespace Bench{} {{\n    enum Color = Red | Green | Blue deriving (Equals);\n    int Age;\n    guid Id;\n    string Name;\n    data Person = {{ Id $id, Name $name, ?Age $age = null, string[] $tags = [] }} deriving (ToArray);\n}}\n",
                i
            )
        })
        .collect()
}

pub fn parse_benchmark(c: &mut Criterion) {
    let registry = KindRegistry::default();
    let fixture = load_bench(BENCH_INPUT);
    c.bench_function("parse_fixture", |b| b.iter(|| black_box(fpp::parse(&fixture, &registry).unwrap())));

    let mut group = c.benchmark_group("parse_synthetic");
    for copies in [10, 100, 1000] {
        let src = synthetic(copies);
        group.bench_with_input(BenchmarkId::from_parameter(copies), &src, |b, src| {
            b.iter(|| black_box(fpp::parse(src, &registry).unwrap()))
        });
    }
    group.finish();
}

pub fn lowering_benchmark(c: &mut Criterion) {
    let registry = KindRegistry::default();
    let namespaces = fpp::parse(&synthetic(100), &registry).unwrap();
    c.bench_function("lower_100", |b| {
        b.iter(|| black_box(DefinitionCollection::from_namespaces(&namespaces).unwrap().len()))
    });
}

criterion_group!(benches, parse_benchmark, lowering_benchmark);
criterion_main!(benches);
