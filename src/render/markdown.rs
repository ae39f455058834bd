//! Markdown serialization for document trees.
//!
//! Blocks are separated by one blank line. Inline marks are opened and
//! closed across neighbouring text nodes, so a mark shared by several runs
//! is written once around all of them.

use crate::model::{Document, DocumentNode, Mark};

use super::{DocumentStats, RenderOptions, RenderResult};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> RenderResult {
    MarkdownRenderer::new(options.clone()).render_with_stats(doc)
}

fn open_delimiter(mark: &Mark, underscore: bool) -> &'static str {
    match mark {
        Mark::Bold if underscore => "__",
        Mark::Bold => "**",
        Mark::Italic if underscore => "_",
        Mark::Italic => "*",
        Mark::Strike => "~~",
        Mark::Code => "`",
        Mark::Link { .. } => "[",
    }
}

fn close_delimiter(mark: &Mark, underscore: bool) -> String {
    match mark {
        Mark::Link {
            href,
            title: Some(title),
        } => format!("]({} \"{}\")", href, title),
        Mark::Link { href, title: None } => format!("]({})", href),
        other => open_delimiter(other, underscore).to_string(),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: DocumentStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: DocumentStats::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> String {
        self.render_blocks(&doc.content)
    }

    /// Render a document to Markdown with document statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> RenderResult {
        self.options.collect_stats = true;
        let content = self.render_blocks(&doc.content);
        self.stats.record_text(&doc.plain_text());
        RenderResult::new(content, self.stats)
    }

    fn count(&mut self, node: &DocumentNode) {
        if self.options.collect_stats {
            self.stats.record(node);
        }
    }

    fn render_blocks(&mut self, nodes: &[DocumentNode]) -> String {
        nodes
            .iter()
            .map(|node| self.render_block(node))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn render_block(&mut self, node: &DocumentNode) -> String {
        match node {
            DocumentNode::Doc { content } => self.render_blocks(content),
            DocumentNode::Paragraph { content } => {
                self.count(node);
                self.render_inline(content)
            }
            DocumentNode::Heading { level, content } => {
                self.count(node);
                format!(
                    "{} {}",
                    "#".repeat((*level).clamp(1, 6) as usize),
                    self.render_inline(content)
                )
            }
            DocumentNode::HorizontalRule => {
                self.count(node);
                "---".to_string()
            }
            DocumentNode::Blockquote { content } => {
                let inner = self.render_blocks(content);
                inner
                    .split('\n')
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {}", line)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            DocumentNode::CodeBlock { language, content } => {
                self.count(node);
                let fence = &self.options.code_fence;
                let code: String = content.iter().map(|c| c.plain_text()).collect();
                if code.is_empty() {
                    format!("{}{}\n{}", fence, language, fence)
                } else {
                    format!("{}{}\n{}\n{}", fence, language, code, fence)
                }
            }
            DocumentNode::BulletList { .. } | DocumentNode::OrderedList { .. } => {
                self.render_list(node, 0)
            }
            DocumentNode::Table { content } => {
                self.count(node);
                self.render_table(content)
            }
            DocumentNode::Text { .. } | DocumentNode::Image { .. } | DocumentNode::HardBreak => {
                self.render_inline(std::slice::from_ref(node))
            }
            DocumentNode::Unknown { kind, content } => {
                log::warn!("Unsupported node type '{}'; rendering its children", kind);
                if content.iter().all(|c| c.is_inline()) {
                    self.render_inline(content)
                } else {
                    self.render_blocks(content)
                }
            }
            DocumentNode::ListItem { content }
            | DocumentNode::TableRow { content }
            | DocumentNode::TableCell { content }
            | DocumentNode::TableHeaderCell { content } => {
                log::warn!("Node '{}' outside its container; flattening", node.kind());
                self.render_blocks(content)
            }
        }
    }

    fn render_list(&mut self, list: &DocumentNode, depth: usize) -> String {
        let ordered = matches!(list, DocumentNode::OrderedList { .. });
        self.count(list);

        let indent = " ".repeat(depth * self.options.indent_width);
        let mut lines = Vec::new();

        for (index, item) in list.children().iter().enumerate() {
            self.count(item);
            let marker = if ordered {
                format!("{}.", index + 1)
            } else {
                self.options.bullet_marker.to_string()
            };

            let children = item.children();
            let (text, rest) = match children.split_first() {
                Some((DocumentNode::Paragraph { content }, rest)) => {
                    (self.render_inline(content), rest)
                }
                _ => (String::new(), children),
            };
            lines.push(format!("{}{} {}", indent, marker, text).trim_end().to_string());

            for child in rest {
                match child {
                    DocumentNode::BulletList { .. } | DocumentNode::OrderedList { .. } => {
                        lines.push(self.render_list(child, depth + 1));
                    }
                    other => {
                        let nested = " ".repeat((depth + 1) * self.options.indent_width);
                        let block = self.render_block(other);
                        lines.extend(block.split('\n').map(|line| format!("{}{}", nested, line)));
                    }
                }
            }
        }

        lines.join("\n")
    }

    fn render_table(&mut self, rows: &[DocumentNode]) -> String {
        let Some((header, body)) = rows.split_first() else {
            return String::new();
        };

        let mut lines = vec![self.render_row(header)];
        let columns = header.children().len().max(1);
        lines.push(format!("|{}", " --- |".repeat(columns)));
        for row in body {
            lines.push(self.render_row(row));
        }

        lines.join("\n")
    }

    fn render_row(&mut self, row: &DocumentNode) -> String {
        let mut line = String::from("|");
        for cell in row.children() {
            let text = cell
                .children()
                .iter()
                .map(|block| self.render_inline(block.children()))
                .collect::<Vec<_>>()
                .join(" ")
                .replace('\n', " ")
                .replace('|', "\\|");
            line.push_str(&format!(" {} |", text.trim()));
        }
        line
    }

    /// Render inline content, tracking open marks across text nodes.
    fn render_inline(&mut self, nodes: &[DocumentNode]) -> String {
        let mut run = InlineRun::default();

        for node in nodes {
            match node {
                DocumentNode::Text { value, marks } => {
                    let keep = run.kept(marks);
                    run.close_to(keep);

                    let mut opening: Vec<&Mark> =
                        marks.iter().filter(|mark| !run.is_active(mark)).collect();
                    opening.sort_by_key(|mark| mark.nesting_rank());
                    for mark in opening {
                        if mark.is_link() && self.options.collect_stats {
                            self.stats.record_link();
                        }
                        run.open(mark);
                    }

                    run.push_str(value);
                }
                DocumentNode::Image { src, alt } => {
                    run.close_to(0);
                    self.count(node);
                    run.push_str(&format!("![{}]({})", alt, src));
                }
                DocumentNode::HardBreak => {
                    run.close_to(0);
                    run.push_str("  \n");
                }
                other => {
                    run.close_to(0);
                    log::warn!("Unsupported inline node '{}'; rendering its children", other.kind());
                    let inner = self.render_inline(other.children());
                    run.push_str(&inner);
                }
            }
        }

        run.finish()
    }
}

/// Piece of inline output; delimiters stay symbolic until the run is done.
enum Piece {
    Open(usize),
    Close(usize),
    Raw(String),
}

struct MarkSpan<'a> {
    mark: &'a Mark,
    /// Spelled with `_` / `__` instead of `*` / `**`
    underscore: bool,
    open_at: usize,
    close_at: usize,
}

/// Inline output under construction.
///
/// Bold and italic share the `*` character, so a closing delimiter that
/// touches an opening one (`*a***b**`) would merge into a single run. Once
/// the run is complete, one mark of every such pair is respelled with
/// underscores.
#[derive(Default)]
struct InlineRun<'a> {
    pieces: Vec<Piece>,
    spans: Vec<MarkSpan<'a>>,
    /// Open spans, outermost first
    active: Vec<usize>,
}

impl<'a> InlineRun<'a> {
    /// Number of open marks, from the outside in, that `marks` also carries.
    /// Code never stays open across nodes.
    fn kept(&self, marks: &[Mark]) -> usize {
        self.active
            .iter()
            .take_while(|&&id| {
                let mark = self.spans[id].mark;
                !matches!(mark, Mark::Code) && marks.contains(mark)
            })
            .count()
    }

    fn is_active(&self, mark: &Mark) -> bool {
        self.active.iter().any(|&id| self.spans[id].mark == mark)
    }

    fn open(&mut self, mark: &'a Mark) {
        let id = self.spans.len();
        self.spans.push(MarkSpan {
            mark,
            underscore: false,
            open_at: self.pieces.len(),
            close_at: self.pieces.len(),
        });
        self.pieces.push(Piece::Open(id));
        self.active.push(id);
    }

    /// Close open marks, innermost first, until `keep` remain.
    fn close_to(&mut self, keep: usize) {
        while self.active.len() > keep {
            if let Some(id) = self.active.pop() {
                self.spans[id].close_at = self.pieces.len();
                self.pieces.push(Piece::Close(id));
            }
        }
    }

    fn push_str(&mut self, text: &str) {
        if !text.is_empty() {
            self.pieces.push(Piece::Raw(text.to_string()));
        }
    }

    fn finish(mut self) -> String {
        self.close_to(0);
        self.respell_collisions();

        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Open(id) => {
                    let span = &self.spans[*id];
                    out.push_str(open_delimiter(span.mark, span.underscore));
                }
                Piece::Close(id) => {
                    let span = &self.spans[*id];
                    out.push_str(&close_delimiter(span.mark, span.underscore));
                }
                Piece::Raw(text) => out.push_str(text),
            }
        }
        out
    }

    /// Respell one mark of each touching bold/italic delimiter pair.
    /// Italic is preferred; the chosen span must not sit inside a word,
    /// since underscores there are read as literal text.
    fn respell_collisions(&mut self) {
        for index in 1..self.pieces.len() {
            let (Some(left), Some(right)) = (self.emphasis_at(index - 1), self.emphasis_at(index))
            else {
                continue;
            };
            if left == right || self.spans[left].underscore || self.spans[right].underscore {
                continue;
            }

            let mut candidates = [left, right];
            candidates.sort_by_key(|&id| !matches!(self.spans[id].mark, Mark::Italic));
            let chosen = candidates
                .iter()
                .copied()
                .find(|&id| self.is_word_bounded(id))
                .unwrap_or(candidates[0]);
            self.spans[chosen].underscore = true;
        }
    }

    /// Span id of the bold or italic delimiter at `index`, if any.
    fn emphasis_at(&self, index: usize) -> Option<usize> {
        match self.pieces[index] {
            Piece::Open(id) | Piece::Close(id)
                if matches!(self.spans[id].mark, Mark::Bold | Mark::Italic) =>
            {
                Some(id)
            }
            _ => None,
        }
    }

    /// True when no word character touches the span from outside.
    fn is_word_bounded(&self, id: usize) -> bool {
        let span = &self.spans[id];
        let before = self.pieces[..span.open_at].last().and_then(|piece| match piece {
            Piece::Raw(text) => text.chars().next_back(),
            _ => None,
        });
        let after = self.pieces.get(span.close_at + 1).and_then(|piece| match piece {
            Piece::Raw(text) => text.chars().next(),
            _ => None,
        });
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    }
}
