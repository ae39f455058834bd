//! Integration tests for the conversion coordinator.

#![cfg(feature = "async")]

use std::sync::Arc;
use std::time::Duration;

use mdtree::coordinator::Phase;
use mdtree::{
    apply_incrementally, parse, ConversionCoordinator, CoordinatorOptions, Document, Error,
    MarkdownParser, MemorySurface, ParseOptions, Progress, RequestOutcome,
};

fn coordinator(options: CoordinatorOptions) -> ConversionCoordinator<MemorySurface> {
    ConversionCoordinator::new(Arc::new(MemorySurface::new()), options)
}

#[tokio::test]
async fn test_default_parser_applies() {
    let coord = coordinator(CoordinatorOptions::default());
    assert_eq!(coord.submit("# Title").await, RequestOutcome::Applied);
    assert_eq!(coord.surface().document(), parse("# Title"));
    assert_eq!(coord.phase(), Phase::Applied { seq: 1 });
}

#[tokio::test]
async fn test_same_input_is_unchanged() {
    let coord = coordinator(CoordinatorOptions::default());
    assert_eq!(coord.submit("**a**").await, RequestOutcome::Applied);
    assert_eq!(coord.submit("**a**").await, RequestOutcome::Unchanged);
    assert_eq!(coord.surface().replacement_count(), 1);
}

#[tokio::test]
async fn test_slow_request_superseded_by_newer() {
    let coord = coordinator(CoordinatorOptions::default()).with_parser(
        |input: String, options: ParseOptions| async move {
            if input.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok::<_, Error>(MarkdownParser::new(options).parse(&input))
        },
    );

    let (slow, fast) = tokio::join!(coord.submit("slow **A**"), coord.submit("fast **B**"));

    assert_eq!(slow, RequestOutcome::Superseded);
    assert_eq!(fast, RequestOutcome::Applied);
    assert_eq!(coord.surface().document(), parse("fast **B**"));
    assert_eq!(coord.last_applied().as_deref(), Some("fast **B**"));
}

#[tokio::test]
async fn test_large_input_stays_literal() {
    let options = CoordinatorOptions::new().with_large_input_threshold(10);
    let coord = coordinator(options);
    let input = "# a heading that is long";

    assert_eq!(coord.submit(input).await, RequestOutcome::LiteralFallback);
    assert_eq!(coord.surface().document(), Document::literal(input));
}

#[tokio::test]
async fn test_failed_parse_restores_text() {
    let coord = coordinator(CoordinatorOptions::default()).with_parser(
        |_input: String, _options: ParseOptions| async move {
            Err::<Document, _>(Error::Pipeline("parser unavailable".into()))
        },
    );

    assert_eq!(coord.submit("**x**").await, RequestOutcome::Restored);
    assert_eq!(coord.surface().document(), Document::literal("**x**"));
    assert_eq!(coord.surface().restore_count(), 1);
    assert_eq!(coord.phase(), Phase::Restored { seq: 1 });
}

#[tokio::test]
async fn test_apply_incrementally_matches_full_parse() {
    let markdown = "# T\n\npara one\n\n- a\n  - b\n\n```\ncode\n\nmore\n```\n\n| x | y |\n| --- | --- |\n| 1 | 2 |\n\nend";
    let surface = MemorySurface::new();
    let options = CoordinatorOptions::new().with_chunk_lines(2);
    let mut updates: Vec<Progress> = Vec::new();

    apply_incrementally(markdown, &surface, &options, |progress| updates.push(progress))
        .await
        .unwrap();

    assert_eq!(surface.document(), parse(markdown));
    assert!(updates.len() > 1);
    assert!(updates.last().is_some_and(|p| p.is_complete()));
    assert!(updates.windows(2).all(|w| w[0].processed <= w[1].processed));
}

#[tokio::test]
async fn test_apply_incrementally_large_input() {
    let markdown = "**bold** text";
    let surface = MemorySurface::new();
    let options = CoordinatorOptions::new().with_large_input_threshold(4);
    let mut last = None;

    apply_incrementally(markdown, &surface, &options, |progress| last = Some(progress))
        .await
        .unwrap();

    assert_eq!(surface.document(), Document::literal(markdown));
    assert!(last.is_some_and(|p| p.is_complete()));
}
