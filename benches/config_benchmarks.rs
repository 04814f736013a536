//! Criterion benchmarks for labelled_config

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use labelled_config::prelude::*;

const CONFIG: &str = "\
[DEFAULT]
root = /srv

[values]
string = some text
integer = 42
float = 0.25
bool = yes

[path]
data = %(root)s/data
home = ~/project
";

fn quiet_reader() -> ConfigReader {
    ConfigReader::builder(ConfigSource::reader("bench", CONFIG.as_bytes()))
        .verbose(false)
        .interpolation(true)
        .build()
        .expect("bench config parses")
}

// ============================================================================
// ConfigReader Benchmarks
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_parse");
    group.throughput(Throughput::Bytes(CONFIG.len() as u64));

    group.bench_function("reader_build", |b| {
        b.iter(|| black_box(quiet_reader()));
    });

    group.finish();
}

fn bench_get_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_value");
    group.throughput(Throughput::Elements(1));
    let reader = quiet_reader();

    group.bench_function("text", |b| {
        b.iter(|| reader.get_string(black_box("values"), black_box("string")));
    });

    group.bench_function("digit", |b| {
        b.iter(|| reader.get_digit(black_box("values"), black_box("float")));
    });

    group.bench_function("boolean", |b| {
        b.iter(|| reader.get_bool(black_box("values"), black_box("bool")));
    });

    group.bench_function("interpolated_path", |b| {
        b.iter(|| reader.get_path(black_box("path"), black_box("data")));
    });

    group.finish();
}

// ============================================================================
// Logging Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let registry = LogRegistry::new();
    let (_buffer, stream) = shared_writer(std::io::sink());
    let logger = registry
        .builder("bench")
        .stream(stream)
        .build()
        .expect("default formats are valid");

    group.bench_function("accepted", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("below_threshold", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_get_value, bench_logging);
criterion_main!(benches);
