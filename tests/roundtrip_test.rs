//! Integration tests for Markdown parsing and serialization.

use mdtree::{parse, serialize, Document, DocumentNode, Mark, ParseOptions};

/// Canonical Markdown that serializes back byte-for-byte.
const CANONICAL: &str = r#"# Title

Some **bold** and *italic* with `code`, ~~gone~~ and [link](https://example.com).

- one
  - nested
- two

1. first
2. second

> quote

```rust
let x = 1;
```

| a | b |
| --- | --- |
| 1 | **2** |

---

![img](https://example.com/i.png)"#;

fn collect_marks(doc: &Document) -> Vec<Mark> {
    let mut marks = Vec::new();
    doc.walk(&mut |node| marks.extend(node.marks().iter().cloned()));
    marks
}

#[test]
fn test_plain_text_roundtrip() {
    let inputs = [
        "Hello world",
        "  padded text  ",
        "Numbers 1, 2 and 3: all plain.",
        "Unicode: café, 日本語, emoji 🎉",
        "Single * star and a lone ` tick",
    ];
    for input in inputs {
        assert_eq!(serialize(&parse(input)).trim(), input.trim(), "input {:?}", input);
    }
}

#[test]
fn test_canonical_document_roundtrip() {
    let doc = parse(CANONICAL);
    assert_eq!(serialize(&doc), CANONICAL);
}

#[test]
fn test_canonical_document_shape() {
    let doc = parse(CANONICAL);
    let kinds: Vec<&str> = doc.content.iter().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "heading",
            "paragraph",
            "bulletList",
            "orderedList",
            "blockquote",
            "codeBlock",
            "table",
            "horizontalRule",
            "paragraph",
        ]
    );
}

#[test]
fn test_heading() {
    let doc = parse("# Title");
    assert_eq!(
        doc.content,
        vec![DocumentNode::heading(1, vec![DocumentNode::text("Title")])]
    );
    assert_eq!(serialize(&doc), "# Title");
}

#[test]
fn test_bold_and_italic() {
    let doc = parse("**Bold** and *Italic*");
    assert_eq!(
        doc.content,
        vec![DocumentNode::paragraph(vec![
            DocumentNode::marked_text("Bold", vec![Mark::Bold]),
            DocumentNode::text(" and "),
            DocumentNode::marked_text("Italic", vec![Mark::Italic]),
        ])]
    );
}

#[test]
fn test_nested_bullets() {
    let doc = parse("- item1\n  - child1");
    let DocumentNode::BulletList { content } = &doc.content[0] else {
        panic!("expected bullet list, got {:?}", doc.content[0]);
    };
    assert_eq!(content.len(), 1);

    let item = content[0].children();
    assert_eq!(item.len(), 2);
    assert_eq!(item[0].kind(), "paragraph");
    assert_eq!(item[1].kind(), "bulletList");
}

#[test]
fn test_tab_indented_nesting() {
    let doc = parse("- a\n\t- b\n\t\t- c");
    assert_eq!(serialize(&doc), "- a\n  - b\n    - c");
}

#[test]
fn test_unsafe_link_degrades() {
    let doc = parse("[bad](javascript:alert(1))");
    assert!(collect_marks(&doc).iter().all(|m| !m.is_link()));

    let text = doc.plain_text();
    assert!(text.contains("bad"));
    assert!(text.contains("javascript:alert(1)"));
}

#[test]
fn test_unsafe_image_keeps_original_syntax() {
    let doc = parse("![x](vbscript:run)");
    assert_eq!(
        doc.content,
        vec![DocumentNode::paragraph(vec![DocumentNode::text("![x](vbscript:run)")])]
    );
}

#[test]
fn test_table_without_separator_stays_literal() {
    let doc = parse("a|b\nc|d");
    let mut has_table = false;
    doc.walk(&mut |node| has_table |= node.kind() == "table");
    assert!(!has_table);
    assert_eq!(doc.plain_text(), "a|b c|d");
}

#[test]
fn test_code_fence_content_not_interpreted() {
    let doc = parse("```\n**not bold**\n```");
    assert_eq!(
        doc.content,
        vec![DocumentNode::CodeBlock {
            language: String::new(),
            content: vec![DocumentNode::text("**not bold**")],
        }]
    );
    assert!(collect_marks(&doc).is_empty());
}

#[test]
fn test_unterminated_fence_consumes_rest() {
    let doc = parse("intro\n\n```python\nprint(1)\n\n# not a heading");
    assert_eq!(doc.block_count(), 2);
    assert_eq!(
        doc.content[1],
        DocumentNode::code_block("python", "print(1)\n\n# not a heading")
    );
}

#[test]
fn test_parse_is_deterministic() {
    let first = serialize(&parse(CANONICAL));
    let second = serialize(&parse(CANONICAL));
    assert_eq!(first, second);
    assert!(!first.contains('\u{E000}'));
}

#[test]
fn test_serialize_is_stable_after_one_pass() {
    let messy = "#  Title  \n\n* a\n+ b\n\nline one\nline two\n\n***\n\n|x|y|\n|:-|-:|\n|1|2|";
    let once = serialize(&parse(messy));
    let twice = serialize(&parse(&once));
    assert_eq!(once, twice);
}

#[test]
fn test_image_prefix_option() {
    let options = ParseOptions::new().with_image_prefix("/assets/");
    let doc = mdtree::parse_with_options("![a](./a.png) ![b](https://x.y/b.png)", options);
    assert_eq!(
        serialize(&doc),
        "![a](/assets/a.png) ![b](https://x.y/b.png)"
    );
}

#[test]
fn test_chained_link_options_keep_both_settings() {
    let options = ParseOptions::new()
        .with_allowed_schemes(["https"])
        .with_image_prefix("/img/");
    let doc = mdtree::parse_with_options("[m](mailto:a@b.c) ![a](a.png)", options);

    assert!(collect_marks(&doc).iter().all(|m| !m.is_link()));
    assert!(doc.plain_text().contains("mailto:a@b.c"));

    let mut srcs = Vec::new();
    doc.walk(&mut |node| {
        if let DocumentNode::Image { src, .. } = node {
            srcs.push(src.clone());
        }
    });
    assert_eq!(srcs, vec!["/img/a.png".to_string()]);
}

/// Visible text of each text leaf with its marks, order-insensitive.
fn leaves(doc: &Document) -> Vec<(String, Vec<String>)> {
    let mut out = Vec::new();
    doc.walk(&mut |node| {
        if let DocumentNode::Text { value, marks } = node {
            let mut names: Vec<String> = marks.iter().map(|m| m.name().to_string()).collect();
            names.sort();
            out.push((value.clone(), names));
        }
    });
    out
}

#[test]
fn test_touching_emphasis_survives_reparse() {
    let cases = [
        vec![
            DocumentNode::marked_text("a", vec![Mark::Italic]),
            DocumentNode::marked_text("b", vec![Mark::Bold]),
        ],
        vec![
            DocumentNode::marked_text("a", vec![Mark::Bold]),
            DocumentNode::marked_text("b", vec![Mark::Bold, Mark::Italic]),
        ],
        vec![
            DocumentNode::marked_text("a", vec![Mark::Bold, Mark::Italic]),
            DocumentNode::marked_text("b", vec![Mark::Bold]),
        ],
        vec![
            DocumentNode::text("x "),
            DocumentNode::marked_text("y", vec![Mark::Italic, Mark::Bold]),
            DocumentNode::text(" z"),
        ],
    ];

    for runs in cases {
        let doc = Document::with_content(vec![DocumentNode::paragraph(runs)]);
        let markdown = serialize(&doc);
        let reparsed = parse(&markdown);
        assert_eq!(leaves(&reparsed), leaves(&doc), "markdown {:?}", markdown);
    }
}

#[test]
fn test_underscores_need_word_boundaries() {
    let doc = parse("call my_helper_fn now");
    assert_eq!(doc.plain_text(), "call my_helper_fn now");
    assert!(collect_marks(&doc).is_empty());

    let doc = parse("call __init__ now");
    assert_eq!(collect_marks(&doc), vec![Mark::Bold]);
}

#[test]
fn test_table_cell_pipes_roundtrip() {
    let input = "| expr | meaning |\n| --- | --- |\n| a\\|b | either |";
    let doc = parse(input);

    let mut cells = Vec::new();
    doc.walk(&mut |node| {
        if matches!(node, DocumentNode::TableCell { .. }) {
            cells.push(node.plain_text());
        }
    });
    assert!(cells.contains(&"a|b".to_string()), "cells {:?}", cells);
    assert_eq!(serialize(&doc), input);
}
