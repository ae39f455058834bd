//! Inline span parsing.
//!
//! Turns one logical line of text into `text` and `image` leaves. Each
//! inline construct is recognized by its own substitution pass; a match is
//! swapped for a placeholder token so later passes cannot reinterpret the
//! characters it consumed. Passes run in a fixed order:
//!
//! 1. code spans
//! 2. images
//! 3. links
//! 4. strikethrough
//! 5. bold, `**` then `__`
//! 6. italic, `*` then `_`
//!
//! Underscore delimiters only count when neither outer neighbour is a word
//! character, so `snake_case_names` stay literal.
//!
//! The substituted text is then walked left to right, emitting literal runs
//! and the typed node for each token. Bold, italic and strikethrough
//! re-parse their inner text recursively, which is how nested combinations
//! such as bold inside italic are produced.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::token::{new_token, TOKEN_PATTERN};
use super::ParseOptions;
use crate::model::{DocumentNode, Mark};

/// Link or image target: one level of balanced parentheses, optional title.
const TARGET: &str = r#"\(((?:[^()\s]|\([^()\s]*\))*)(?:\s+"([^"]*)")?\)"#;

static CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"!\[([^\]]*)\]{}", TARGET)).unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"\[([^\]]+)\]{}", TARGET)).unwrap());
static STRIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static UNDERSCORE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(\S(?:.*?\S)?)__").unwrap());
static UNDERSCORE_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([^_\s](?:[^_]*[^_\s])?)_").unwrap());

/// Parse a single line of inline Markdown.
///
/// # Example
///
/// ```
/// use mdtree::parser::{parse_inline, ParseOptions};
/// use mdtree::{DocumentNode, Mark};
///
/// let nodes = parse_inline("**Bold** text", &ParseOptions::default());
/// assert_eq!(nodes[0], DocumentNode::marked_text("Bold", vec![Mark::Bold]));
/// assert_eq!(nodes[1], DocumentNode::text(" text"));
/// ```
pub fn parse_inline(text: &str, options: &ParseOptions) -> Vec<DocumentNode> {
    InlineParser::new(options).parse(text)
}

/// A classified span, stored under its placeholder token.
#[derive(Debug)]
enum Span {
    Code(String),
    Image {
        alt: String,
        src: String,
    },
    Link {
        text: String,
        href: String,
        title: Option<String>,
    },
    Marked {
        mark: Mark,
        inner: String,
    },
}

#[derive(Debug)]
struct Element {
    /// Original source text of the match, tokens restored
    raw: String,
    span: Span,
}

/// Token-to-element map local to one inline parse.
#[derive(Debug, Default)]
struct ElementMap {
    elements: HashMap<String, Element>,
}

impl ElementMap {
    /// Replace any tokens in `text` with the source they stand for.
    fn restore(&self, text: &str) -> String {
        TOKEN_PATTERN
            .replace_all(text, |caps: &Captures<'_>| match self.elements.get(&caps[0]) {
                Some(element) => element.raw.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Run one substitution pass.
    fn substitute<F>(&mut self, text: &str, pattern: &Regex, kind: &str, build: F) -> String
    where
        F: Fn(&Captures<'_>, &ElementMap) -> Span,
    {
        let map = &*self;
        let mut fresh = Vec::new();
        let replaced = pattern
            .replace_all(text, |caps: &Captures<'_>| {
                let element = Element {
                    raw: map.restore(&caps[0]),
                    span: build(caps, map),
                };
                let token = new_token(kind);
                fresh.push((token.clone(), element));
                token
            })
            .into_owned();
        self.elements.extend(fresh);
        replaced
    }

    /// Run one substitution pass for an underscore delimiter, skipping
    /// matches that sit inside a word.
    fn substitute_flanked(&mut self, text: &str, pattern: &Regex, kind: &str, mark: Mark) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut from = 0;
        while let Some(caps) = pattern.captures_at(text, from) {
            let Some(whole) = caps.get(0) else { break };
            if !is_flanked(text, whole.start(), whole.end()) {
                from = whole.start() + 1;
                continue;
            }

            let element = Element {
                raw: self.restore(whole.as_str()),
                span: Span::Marked {
                    mark: mark.clone(),
                    inner: self.restore(&caps[1]),
                },
            };
            let token = new_token(kind);
            out.push_str(&text[last..whole.start()]);
            out.push_str(&token);
            self.elements.insert(token, element);

            last = whole.end();
            from = last;
        }
        out.push_str(&text[last..]);
        out
    }

    fn get(&self, token: &str) -> Option<&Element> {
        self.elements.get(token)
    }
}

/// Inline span parser bound to a set of parse options.
pub(crate) struct InlineParser<'a> {
    options: &'a ParseOptions,
}

impl<'a> InlineParser<'a> {
    pub(crate) fn new(options: &'a ParseOptions) -> Self {
        Self { options }
    }

    /// Parse a line into inline nodes.
    pub(crate) fn parse(&self, text: &str) -> Vec<DocumentNode> {
        let nodes = self.parse_spans(text);
        if self.options.merge_adjacent_text {
            merge_adjacent_text(nodes)
        } else {
            nodes
        }
    }

    fn parse_spans(&self, text: &str) -> Vec<DocumentNode> {
        let mut map = ElementMap::default();

        let text = map.substitute(text, &CODE_SPAN, "code", |caps, _| {
            Span::Code(caps[1].to_string())
        });
        let text = map.substitute(&text, &IMAGE, "image", |caps, map| Span::Image {
            alt: map.restore(&caps[1]),
            src: map.restore(&caps[2]),
        });
        let text = map.substitute(&text, &LINK, "link", |caps, map| Span::Link {
            text: map.restore(&caps[1]),
            href: map.restore(&caps[2]),
            title: caps.get(3).map(|m| m.as_str().to_string()),
        });
        let text = map.substitute(&text, &STRIKE, "strike", |caps, map| Span::Marked {
            mark: Mark::Strike,
            inner: map.restore(&caps[1]),
        });
        let text = map.substitute(&text, &BOLD, "bold", |caps, map| Span::Marked {
            mark: Mark::Bold,
            inner: map.restore(&caps[1]),
        });
        let text = map.substitute_flanked(&text, &UNDERSCORE_BOLD, "bold", Mark::Bold);
        let text = map.substitute(&text, &ITALIC, "italic", |caps, map| Span::Marked {
            mark: Mark::Italic,
            inner: map.restore(&caps[1]),
        });
        let text = map.substitute_flanked(&text, &UNDERSCORE_ITALIC, "italic", Mark::Italic);

        let mut out = Vec::new();
        let mut last = 0;
        for found in TOKEN_PATTERN.find_iter(&text) {
            push_literal(&mut out, &text[last..found.start()]);
            match map.get(found.as_str()) {
                Some(element) => self.emit(element, &mut out),
                None => push_literal(&mut out, found.as_str()),
            }
            last = found.end();
        }
        push_literal(&mut out, &text[last..]);

        out
    }

    fn emit(&self, element: &Element, out: &mut Vec<DocumentNode>) {
        match &element.span {
            Span::Code(code) => out.push(DocumentNode::marked_text(code.clone(), vec![Mark::Code])),
            Span::Image { alt, src } => match self.options.sanitizer().sanitize_image_src(src) {
                Some(src) => out.push(DocumentNode::image(src, alt.clone())),
                None => {
                    log::warn!("Rejected image source {:?}; keeping literal text", src);
                    push_literal(out, &element.raw);
                }
            },
            Span::Link { text, href, title } => match self.options.sanitizer().sanitize_href(href) {
                Some(href) => {
                    let mark = Mark::Link {
                        href,
                        title: title.clone(),
                    };
                    for mut node in self.parse_spans(text) {
                        add_mark(&mut node, &mark, false);
                        out.push(node);
                    }
                }
                None => {
                    log::warn!("Rejected link target {:?}; keeping literal text", href);
                    push_literal(out, &format!("{} ({})", text, href));
                }
            },
            Span::Marked { mark, inner } => {
                for mut node in self.parse_spans(inner) {
                    add_mark(&mut node, mark, true);
                    out.push(node);
                }
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when the characters just outside `text[start..end]` are not word
/// characters.
fn is_flanked(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Push a literal run; empty runs are dropped.
fn push_literal(out: &mut Vec<DocumentNode>, text: &str) {
    if !text.is_empty() {
        out.push(DocumentNode::text(text));
    }
}

/// Add a mark to a text node. Images and other nodes are left untouched.
fn add_mark(node: &mut DocumentNode, mark: &Mark, outermost: bool) {
    if let DocumentNode::Text { marks, .. } = node {
        if marks.contains(mark) {
            return;
        }
        if outermost {
            marks.insert(0, mark.clone());
        } else {
            marks.push(mark.clone());
        }
    }
}

/// Merge neighbouring text nodes that carry identical marks.
pub(crate) fn merge_adjacent_text(nodes: Vec<DocumentNode>) -> Vec<DocumentNode> {
    let mut merged: Vec<DocumentNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (
            Some(DocumentNode::Text {
                value: prev,
                marks: prev_marks,
            }),
            DocumentNode::Text { value, marks },
        ) = (merged.last_mut(), &node)
        {
            if prev_marks == marks {
                prev.push_str(value);
                continue;
            }
        }
        merged.push(node);
    }
    merged
}
