// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Pipeline benchmarks over a synthetic release history

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use relgraph::prelude::*;
use relgraph::render::{to_svg, SvgStyle};

/// `releases` main-line versions, each with two hotfixes
fn history(releases: usize) -> Vec<VersionEntry> {
    let mut entries = Vec::with_capacity(releases * 3);
    for minor in 0..releases {
        let base = format!("v1.{minor}.0");
        entries.push(VersionEntry::from_tag(&base));
        for sequence in 1..=2 {
            entries.push(VersionEntry::from_tag(&format!("{base}-hotfix.{sequence}")));
        }
    }
    entries
}

fn bench_pipeline(c: &mut Criterion) {
    let builder = GraphBuilder::default();
    let parser = HotfixParser::default();
    let mut group = c.benchmark_group("pipeline");

    for releases in [10, 100] {
        let entries = history(releases);
        group.throughput(Throughput::Elements(entries.len() as u64));

        group.bench_with_input(BenchmarkId::new("parse", entries.len()), &entries, |b, entries| {
            b.iter(|| {
                for entry in entries {
                    black_box(parser.parse(&entry.version));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("build", entries.len()), &entries, |b, entries| {
            b.iter(|| black_box(builder.build(entries)));
        });
        group.bench_with_input(BenchmarkId::new("svg", entries.len()), &entries, |b, entries| {
            let graph = builder.build(entries);
            b.iter(|| black_box(to_svg(&graph, &SvgStyle::default())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
