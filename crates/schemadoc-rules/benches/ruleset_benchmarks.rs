//! Benchmarks for rule-set application
//!
//! Measures compiling the rule set and applying it to documents of
//! increasing size. The document is the old-shape design document padded
//! with filler sections that no rule matches, so match counts stay fixed
//! while the scanned text grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use schemadoc_engine::DocumentRewriter;
use schemadoc_rules::migration_rules;

const DESIGN_DOC: &str = include_str!("../tests/fixtures/design_doc.md");

/// Pad the fixture with inert sections to reach roughly `factor` times its size
fn generate_document(factor: usize) -> String {
    let mut doc = String::with_capacity(DESIGN_DOC.len() * (factor + 1));
    doc.push_str(DESIGN_DOC);

    for i in 0..factor {
        doc.push_str(&format!(
            "\n## Appendix {i}\n\nOperational notes for release {i}: no schema content here,\njust prose the rewriter has to scan past.\n"
        ));
    }

    doc
}

fn bench_compile(c: &mut Criterion) {
    let rules = migration_rules();

    c.bench_function("compile_rule_set", |b| {
        b.iter(|| DocumentRewriter::new(black_box(&rules)).unwrap())
    });
}

fn bench_apply(c: &mut Criterion) {
    let rules = migration_rules();
    let rewriter = DocumentRewriter::new(&rules).unwrap();

    let mut group = c.benchmark_group("apply_rule_set");
    for factor in [0, 10, 100] {
        let doc = generate_document(factor);
        group.bench_with_input(BenchmarkId::from_parameter(factor), &doc, |b, doc| {
            b.iter(|| rewriter.apply(black_box(doc)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compile, bench_apply);
criterion_main!(benches);
