//! Parser throughput benchmarks
//!
//! Run with: cargo bench -p docai-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docai_core::{from_json, to_json, tokenize, Parser};

/// Representative contract-style document
const SAMPLE: &str = r#"<head>Master Services Agreement</head>
This agreement is entered into by the parties listed below.
<dict sep=":">
Provider: Acme Corporation
Client: Globex Industries
Effective date: 2024-01-01
Term: 24 months
</dict>
<list kind=".">
1. Definitions
Terms used in this agreement have the meanings given here.
2. Services
2.1. Consulting
2.2. Implementation
2.3. Support
3. Fees
3.1. Monthly retainer
3.2. Expenses
<dict sep="=">
Currency = EUR
Payment terms = 30 days
</dict>
4. Termination
</list>
<block>
<head>Service Levels</head>
<list kind="*">
• Availability
o 99.9% monthly uptime
o Scheduled maintenance excluded
• Response times
o Critical: 1 hour
o Normal: 1 business day
</list>
</block>
<block>
<head>Signatures</head>
Signed on behalf of both parties.
</block>
"#;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(SAMPLE.len() as u64));

    group.bench_function("tokenize", |b| {
        b.iter(|| black_box(tokenize(black_box(SAMPLE)).len()))
    });

    group.bench_function("parse", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            let doc = parser.parse(black_box(SAMPLE));
            black_box(doc.body.len())
        })
    });

    group.finish();
}

fn bench_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("json");
    let doc = Parser::new().parse(SAMPLE);
    let json = to_json(&doc).unwrap();

    group.bench_function("encode", |b| {
        b.iter(|| black_box(to_json(black_box(&doc)).unwrap().len()))
    });

    group.throughput(Throughput::Bytes(json.len() as u64));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(from_json(black_box(&json)).unwrap().body.len()))
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for size in [1, 5, 10, 20].iter() {
        let content: String = SAMPLE.repeat(*size);
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_with_input(BenchmarkId::new("parse", size), &content, |b, content| {
            b.iter(|| {
                let mut parser = Parser::new();
                let doc = parser.parse(black_box(content));
                black_box(doc.body.len())
            })
        });
    }

    group.finish();
}

fn bench_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("nesting");

    for depth in [8usize, 64, 512].iter() {
        let content = format!(
            "{}text\n{}",
            "<block>\n".repeat(*depth),
            "</block>\n".repeat(*depth)
        );

        group.bench_with_input(BenchmarkId::new("blocks", depth), &content, |b, content| {
            b.iter(|| {
                let mut parser = Parser::new();
                black_box(parser.parse_with_recovery(black_box(content)).errors.len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_json, bench_scaling, bench_nesting);
criterion_main!(benches);
