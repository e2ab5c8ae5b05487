use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fpp::config::Configuration;
use fpp::definition::DefinitionCollection;

const BENCH_INPUT: &str = "resource/test.fpp";

fn load_bench(name: &str) -> String { std::fs::read_to_string(name).expect("Unknown bench path") }

pub fn build_benchmark(c: &mut Criterion) {
    let config = Configuration::default();
    let bench = load_bench(BENCH_INPUT);
    let namespaces = fpp::parse(&bench, &config.registry).unwrap();
    let collection = DefinitionCollection::from_namespaces(&namespaces).unwrap();

    c.bench_function("build_fixture", |b| {
        b.iter(|| black_box(fpp::build_all(&collection, &config).descriptors.len()))
    });
    c.bench_function("compile_fixture", |b| {
        b.iter(|| black_box(fpp::compile(&bench, &config).unwrap().descriptors.len()))
    });
    c.bench_function("serialize_fixture", |b| {
        let descriptors = fpp::build_all(&collection, &config).descriptors;
        b.iter(|| black_box(serde_json::to_string(&descriptors).unwrap()))
    });
}

criterion_group!(benches, build_benchmark);
criterion_main!(benches);
