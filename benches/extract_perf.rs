//! Criterion benchmarks for extraction and validation.
//!
//! Performance targets:
//! - Extraction of a 1000-line script: < 5ms
//! - Full validation of a 1000-line script: < 20ms
//! - Option normalization: < 1us

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use q2lsp::document::DocumentSnapshot;
use q2lsp::extract::extract;
use q2lsp::lint::ValidationEngine;
use q2lsp::options::normalize;
use q2lsp::signatures::{SignatureRepository, hierarchy};

const BLOCK: &str = "qiime demux summarize \\
  --i-data demux.qza \\
  --p-something 3 \\
  --o-visualization demux.qzv
echo 'step done' && qiime feature-table filter-samples --i-table t.qza --p-min-frequncy 5
# comment line
";

fn script(blocks: usize) -> String {
    BLOCK.repeat(blocks)
}

fn repository() -> SignatureRepository {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/hierarchy.json");
    let catalog = hierarchy::load_file(&path).expect("fixture hierarchy");
    let mut repository = SignatureRepository::new();
    repository.load_catalog(catalog);
    repository
}

fn extraction_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for blocks in [10usize, 170] {
        let text = script(blocks);
        let snapshot = DocumentSnapshot::new("file:///bench.sh", 1, text.clone());
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("lines_{}", text.lines().count()), |b| {
            b.iter(|| extract(black_box(&snapshot)).count());
        });
    }

    group.finish();
}

fn validation_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let engine = ValidationEngine::with_defaults();
    let repository = repository();

    for blocks in [10usize, 170] {
        let snapshot = DocumentSnapshot::new("file:///bench.sh", 1, script(blocks));
        group.bench_function(format!("blocks_{blocks}"), |b| {
            b.iter(|| engine.validate_document(black_box(&snapshot), &repository));
        });
    }

    group.finish();
}

fn normalize_benchmarks(c: &mut Criterion) {
    c.bench_function("normalize_option", |b| {
        b.iter(|| normalize(black_box("--P-Min_Frequency=10")));
    });
}

criterion_group!(
    benches,
    extraction_benchmarks,
    validation_benchmarks,
    normalize_benchmarks
);
criterion_main!(benches);
