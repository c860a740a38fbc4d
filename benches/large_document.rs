//! Performance benchmarks for large documents.
//!
//! Run with: cargo bench --bench large_document
//!
//! Covers the line pass on both alignment paths (DP and Myers), move
//! detection over many scattered hunks, and batch throughput.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use linediff::config::AppConfig;
use linediff::diff::{DiffEngine, EngineLimits};
use linediff::pipeline::respond_batch;
use std::hint::black_box;

/// A source-like document with `count` lines.
fn generate_document(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 5 {
            0 => format!("fn item_{i}() {{"),
            1 => format!("    let value = compute({i});"),
            2 => format!("    log(\"item {i}\", value);"),
            3 => "}".to_string(),
            _ => String::new(),
        })
        .collect()
}

/// Two related documents: every `stride`-th line edited, plus one block of
/// twenty lines moved from the top to the bottom.
fn generate_pair(count: usize, stride: usize) -> (String, String) {
    let original = generate_document(count);
    let mut modified: Vec<String> = original
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i % stride == stride - 1 {
                format!("{line} // edited")
            } else {
                line.clone()
            }
        })
        .collect();
    let block: Vec<String> = modified.drain(..20.min(count)).collect();
    modified.extend(block);

    (original.join("\n") + "\n", modified.join("\n") + "\n")
}

fn bench_diff_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_scaling");

    for size in [500, 1_000, 5_000, 10_000] {
        let (old, new) = generate_pair(size, 50);
        let dp = DiffEngine::new().with_limits(EngineLimits::thorough());
        let myers = DiffEngine::new().with_limits(EngineLimits::fast());

        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| black_box(dp.compute(black_box(&old), black_box(&new))));
        });
        group.bench_with_input(BenchmarkId::new("myers", size), &size, |b, _| {
            b.iter(|| black_box(myers.compute(black_box(&old), black_box(&new))));
        });
    }

    group.finish();
}

fn bench_moves(c: &mut Criterion) {
    let (old, new) = generate_pair(2_000, 25);
    let engine = DiffEngine::new().compute_moves(true);

    c.bench_function("moves_2000_lines", |b| {
        b.iter(|| black_box(engine.compute(black_box(&old), black_box(&new))));
    });
}

fn bench_batch(c: &mut Criterion) {
    let requests: String = (0..64)
        .map(|i| {
            let (old, new) = generate_pair(200 + i, 10);
            serde_json::json!({"original": old, "modified": new}).to_string() + "\n"
        })
        .collect();
    let config = AppConfig::default();

    c.bench_function("batch_64_requests", |b| {
        b.iter(|| black_box(respond_batch(black_box(&requests), &config)));
    });
}

criterion_group!(benches, bench_diff_scaling, bench_moves, bench_batch);

criterion_main!(benches);
