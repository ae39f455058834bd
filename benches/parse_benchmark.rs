//! Benchmarks for mdtree parsing and serialization performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic Markdown mixing every supported construct.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic Markdown document with the given number of sections.
fn create_test_markdown(sections: usize) -> String {
    let mut content = String::new();

    for i in 0..sections {
        content.push_str(&format!("## Section {}\n\n", i + 1));
        content.push_str(
            "Some **bold** and *italic* text with `code` and a [link](https://example.com).\n\n",
        );
        content.push_str("- first item\n  - nested item\n- second ~~item~~\n\n");
        content.push_str("> quoted line\n\n");
        content.push_str("```rust\nfn main() {\n    println!(\"| not a table |\");\n}\n```\n\n");
        content.push_str("| Name | Value |\n| --- | --- |\n| a | 1 |\n| b | **2** |\n\n");
        content.push_str("![diagram](https://example.com/d.png)\n\n---\n\n");
    }

    content
}

/// Benchmark markup detection.
fn bench_detection(c: &mut Criterion) {
    let markdown = create_test_markdown(1);
    let plain = "Just a plain sentence without any markup at all, repeated. ".repeat(20);

    c.bench_function("detect_markdown", |b| {
        b.iter(|| mdtree::is_likely_markup(black_box(&markdown)));
    });

    c.bench_function("detect_plain_text", |b| {
        b.iter(|| mdtree::is_likely_markup(black_box(&plain)));
    });
}

/// Benchmark parsing at various sizes.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("markdown_parsing");

    for sections in [1, 10, 100].iter() {
        let markdown = create_test_markdown(*sections);

        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| mdtree::parse(black_box(&markdown)));
        });
    }

    group.finish();
}

/// Benchmark serialization back to Markdown and HTML.
fn bench_serialization(c: &mut Criterion) {
    let doc = mdtree::parse(&create_test_markdown(10));

    c.bench_function("serialize_markdown", |b| {
        b.iter(|| mdtree::serialize(black_box(&doc)));
    });

    c.bench_function("render_html", |b| {
        b.iter(|| mdtree::to_html(black_box(&doc)));
    });
}

criterion_group!(benches, bench_detection, bench_parsing, bench_serialization);
criterion_main!(benches);
