//! Block structure parsing.
//!
//! Consumes the extractor's output line by line and builds the top-level
//! block nodes. Inline content is handed to the [`InlineParser`]. Once the
//! block tree exists, placeholder paragraphs are swapped for the code
//! blocks and tables they stand for.

use once_cell::sync::Lazy;
use regex::Regex;

use super::extract::{Placeholder, PlaceholderTable};
use super::inline::InlineParser;
use super::{ParseOptions, Progress};
use crate::model::DocumentNode;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:-{3,}|_{3,}|\*{3,})$").unwrap());
static BULLET_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)[-*+]\s+(.+)$").unwrap());
static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)\d+\.\s+(.+)$").unwrap());

/// Width of a tab when measuring list indentation.
const TAB_WIDTH: usize = 4;

/// Classification of a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'t> {
    Blank,
    Placeholder(&'t str),
    Heading(u8, &'t str),
    Rule,
    Quote(&'t str),
    ListItem(ListLine<'t>),
    Text(&'t str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListLine<'t> {
    indent: usize,
    ordered: bool,
    text: &'t str,
}

/// Measure leading whitespace: tabs count four, everything else one.
fn indent_width(whitespace: &str) -> usize {
    whitespace
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

fn list_line<'t>(pattern: &Regex, line: &'t str, ordered: bool) -> Option<ListLine<'t>> {
    let caps = pattern.captures(line)?;
    Some(ListLine {
        indent: indent_width(caps.get(1).map_or("", |m| m.as_str())),
        ordered,
        text: caps.get(2).map_or("", |m| m.as_str()).trim(),
    })
}

/// Builder state for nested lists.
///
/// Lists and items live in flat vectors and refer to each other by index,
/// which lets a nested list be attached to an item that is still open.
#[derive(Debug, Default)]
struct ListArena {
    lists: Vec<ListBuild>,
    items: Vec<ItemBuild>,
}

#[derive(Debug)]
struct ListBuild {
    ordered: bool,
    items: Vec<usize>,
}

#[derive(Debug)]
struct ItemBuild {
    inline: Vec<DocumentNode>,
    sublists: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    indent: usize,
    list: usize,
    /// Item the list hangs under; `None` for a top-level list
    parent: Option<usize>,
}

impl ListArena {
    fn new_list(&mut self, ordered: bool) -> usize {
        self.lists.push(ListBuild {
            ordered,
            items: Vec::new(),
        });
        self.lists.len() - 1
    }

    fn push_item(&mut self, list: usize, inline: Vec<DocumentNode>) {
        self.items.push(ItemBuild {
            inline,
            sublists: Vec::new(),
        });
        let item = self.items.len() - 1;
        self.lists[list].items.push(item);
    }

    fn build(&mut self, list: usize) -> DocumentNode {
        let items = std::mem::take(&mut self.lists[list].items);
        let content = items
            .into_iter()
            .map(|item| {
                let inline = std::mem::take(&mut self.items[item].inline);
                let sublists = std::mem::take(&mut self.items[item].sublists);
                let mut content = vec![DocumentNode::paragraph(inline)];
                content.extend(sublists.into_iter().map(|sub| self.build(sub)));
                DocumentNode::ListItem { content }
            })
            .collect();

        if self.lists[list].ordered {
            DocumentNode::OrderedList { content }
        } else {
            DocumentNode::BulletList { content }
        }
    }
}

/// Block structure parser for one parse call.
pub(crate) struct BlockParser<'a> {
    inline: InlineParser<'a>,
    placeholders: &'a PlaceholderTable,
}

impl<'a> BlockParser<'a> {
    pub(crate) fn new(options: &'a ParseOptions, placeholders: &'a PlaceholderTable) -> Self {
        Self {
            inline: InlineParser::new(options),
            placeholders,
        }
    }

    fn classify<'t>(&self, line: &'t str) -> Line<'t> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Line::Blank;
        }
        if self.placeholders.is_placeholder_line(trimmed) {
            return Line::Placeholder(trimmed);
        }
        if let Some(caps) = HEADING.captures(trimmed) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len()) as u8;
            let text = caps.get(2).map_or("", |m| m.as_str()).trim();
            return Line::Heading(level, text);
        }
        if RULE.is_match(trimmed) {
            return Line::Rule;
        }
        if let Some(rest) = trimmed.strip_prefix('>') {
            return Line::Quote(rest.trim());
        }
        if let Some(item) = list_line(&BULLET_ITEM, line, false) {
            return Line::ListItem(item);
        }
        if let Some(item) = list_line(&ORDERED_ITEM, line, true) {
            return Line::ListItem(item);
        }
        Line::Text(trimmed)
    }

    /// Parse extractor output into top-level blocks.
    ///
    /// Placeholder paragraphs are left in place; call [`restore`] afterwards.
    ///
    /// [`restore`]: BlockParser::restore
    pub(crate) fn parse(&self, text: &str, progress: &mut dyn FnMut(Progress)) -> Vec<DocumentNode> {
        let lines: Vec<&str> = text.split('\n').collect();
        let total = lines.len();
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            match self.classify(lines[i]) {
                Line::Blank => i += 1,
                Line::Placeholder(token) => {
                    blocks.push(DocumentNode::paragraph(vec![DocumentNode::text(token)]));
                    i += 1;
                }
                Line::Heading(level, text) => {
                    blocks.push(DocumentNode::heading(level, self.inline.parse(text)));
                    i += 1;
                }
                Line::Rule => {
                    blocks.push(DocumentNode::HorizontalRule);
                    i += 1;
                }
                Line::Quote(text) => {
                    blocks.push(DocumentNode::Blockquote {
                        content: vec![DocumentNode::paragraph(self.inline.parse(text))],
                    });
                    i += 1;
                }
                Line::ListItem(_) => {
                    let (lists, next) = self.parse_list_run(&lines, i);
                    blocks.extend(lists);
                    i = next;
                }
                Line::Text(_) => {
                    let mut parts = Vec::new();
                    while i < lines.len() {
                        match self.classify(lines[i]) {
                            Line::Text(part) => parts.push(part),
                            _ => break,
                        }
                        i += 1;
                    }
                    blocks.push(DocumentNode::paragraph(self.inline.parse(&parts.join(" "))));
                }
            }

            progress(Progress {
                processed: i,
                total,
            });
        }

        blocks
    }

    /// Parse a run of list lines starting at `start`.
    ///
    /// Returns the top-level lists built from the run and the index of the
    /// first line after it.
    fn parse_list_run(&self, lines: &[&str], start: usize) -> (Vec<DocumentNode>, usize) {
        let mut arena = ListArena::default();
        let mut roots: Vec<usize> = Vec::new();
        let mut frames: Vec<Frame> = Vec::new();
        let mut base: Option<usize> = None;
        let mut i = start;

        while i < lines.len() {
            let Line::ListItem(item) = self.classify(lines[i]) else {
                break;
            };
            let base_indent = *base.get_or_insert(item.indent);
            let indent = item.indent.saturating_sub(base_indent);

            match frames.last().copied() {
                None => {
                    let list = arena.new_list(item.ordered);
                    roots.push(list);
                    frames.push(Frame {
                        indent,
                        list,
                        parent: None,
                    });
                }
                Some(top) if indent > top.indent => {
                    let parent = arena.lists[top.list].items.last().copied();
                    let list = arena.new_list(item.ordered);
                    match parent {
                        Some(parent) => arena.items[parent].sublists.push(list),
                        None => roots.push(list),
                    }
                    frames.push(Frame {
                        indent,
                        list,
                        parent,
                    });
                }
                Some(_) => {
                    while frames.len() > 1 && frames.last().is_some_and(|f| indent < f.indent) {
                        frames.pop();
                    }
                    if let Some(top) = frames.last_mut() {
                        if arena.lists[top.list].ordered != item.ordered {
                            let list = arena.new_list(item.ordered);
                            match top.parent {
                                Some(parent) => arena.items[parent].sublists.push(list),
                                None => roots.push(list),
                            }
                            top.list = list;
                        }
                    }
                }
            }

            if let Some(top) = frames.last() {
                arena.push_item(top.list, self.inline.parse(item.text));
            }
            i += 1;
        }

        let lists = roots.into_iter().map(|list| arena.build(list)).collect();
        (lists, i)
    }

    /// Replace placeholder paragraphs with the nodes they stand for.
    pub(crate) fn restore(&self, nodes: &mut [DocumentNode]) {
        for node in nodes.iter_mut() {
            if let Some(replacement) = self.restored(node) {
                *node = replacement;
            } else if let Some(children) = node.children_mut() {
                self.restore(children);
            }
        }
    }

    fn restored(&self, node: &DocumentNode) -> Option<DocumentNode> {
        let DocumentNode::Paragraph { content } = node else {
            return None;
        };
        let [DocumentNode::Text { value, marks }] = content.as_slice() else {
            return None;
        };
        if !marks.is_empty() {
            return None;
        }

        match self.placeholders.get(value)? {
            Placeholder::Code { language, code } => {
                Some(DocumentNode::code_block(language.clone(), code))
            }
            Placeholder::Table { headers, rows } => Some(self.build_table(headers, rows)),
        }
    }

    fn build_table(&self, headers: &[String], rows: &[Vec<String>]) -> DocumentNode {
        let header = DocumentNode::TableRow {
            content: headers
                .iter()
                .map(|cell| DocumentNode::TableHeaderCell {
                    content: vec![self.cell_paragraph(cell)],
                })
                .collect(),
        };

        let mut content = vec![header];
        content.extend(rows.iter().map(|row| DocumentNode::TableRow {
            content: row
                .iter()
                .map(|cell| DocumentNode::TableCell {
                    content: vec![self.cell_paragraph(cell)],
                })
                .collect(),
        }));

        DocumentNode::Table { content }
    }

    fn cell_paragraph(&self, text: &str) -> DocumentNode {
        DocumentNode::paragraph(self.inline.parse(text))
    }
}
