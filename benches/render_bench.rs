// benches/render_bench.rs
//! Benchmarks for rich-text rendering and document post-processing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use notion2pandoc::formatting::rich_text::{render_markdown, render_run_sequence};
use notion2pandoc::formatting::transformers::code::render_code_block;
use notion2pandoc::types::{Annotations, RichTextItem};
use notion2pandoc::{BlockCommon, CodeBlock, Grammar, PostProcessor};

/// Alternating plain, bold, italic-code and linked runs.
fn sample_runs(count: usize) -> Vec<RichTextItem> {
    (0..count)
        .map(|i| {
            let run = RichTextItem::plain_text(&format!("run {} with {{braces}} & <tags> ", i));
            match i % 4 {
                0 => run,
                1 => run.bold(),
                2 => run.with_annotations(Annotations {
                    italic: true,
                    code: true,
                    ..Annotations::default()
                }),
                _ => run.with_href("/0123456789abcdef0123456789abcdef"),
            }
        })
        .collect()
}

fn sample_document(sections: usize) -> String {
    (0..sections)
        .map(|i| {
            format!(
                "## Section {i}\n\nGenerated: build {i}\n\n\n\n16 May 202514 September 2025\n\n\
                 > 💡 Remember step {i} & keep 100% focus\n\n```\n💡 not a callout\n```\n"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_rich_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("rich_text");
    for size in [10, 100, 1000] {
        let runs = sample_runs(size);
        group.bench_with_input(BenchmarkId::new("html", size), &runs, |b, runs| {
            b.iter(|| render_run_sequence(black_box(runs), Grammar::Html))
        });
        group.bench_with_input(BenchmarkId::new("latex", size), &runs, |b, runs| {
            b.iter(|| render_run_sequence(black_box(runs), Grammar::Latex))
        });
        group.bench_with_input(BenchmarkId::new("markdown", size), &runs, |b, runs| {
            b.iter(|| render_markdown(black_box(runs)))
        });
    }
    group.finish();
}

fn bench_diagram(c: &mut Criterion) {
    let art = "┌────────┐     ┌────────┐\n│ client │ ──> │ server │\n└────────┘     └────────┘\n".repeat(20);
    let block = CodeBlock {
        common: BlockCommon::default(),
        language: "plain text".to_string(),
        rich_text: vec![RichTextItem::plain_text(&art)],
        caption: Vec::new(),
    };
    c.bench_function("diagram_dual_render", |b| {
        b.iter(|| render_code_block(black_box(&block)))
    });
}

fn bench_post_process(c: &mut Criterion) {
    let processor = PostProcessor::standard().with_emoji_labels();
    let mut group = c.benchmark_group("post_process");
    for sections in [10, 100] {
        let document = sample_document(sections);
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &document,
            |b, document| b.iter(|| processor.apply(black_box(document))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_rich_text, bench_diagram, bench_post_process);
criterion_main!(benches);
