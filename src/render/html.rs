//! Static HTML rendering for document trees.
//!
//! Produces markup for non-interactive display. All text and attribute
//! values are escaped, and link and image targets are validated again at
//! render time, so a tree loaded from untrusted JSON cannot inject script
//! URLs.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::{Document, DocumentNode, Mark};

use super::visitor::{DefaultVisitor, HtmlVisitor, VisitorAction};
use super::RenderOptions;

/// Convert a document to HTML.
pub fn to_html(doc: &Document, options: &RenderOptions) -> String {
    HtmlRenderer::new(options.clone()).render(doc)
}

/// HTML renderer with an injectable visitor.
pub struct HtmlRenderer {
    options: RenderOptions,
    visitor: Box<dyn HtmlVisitor>,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            visitor: Box::new(DefaultVisitor),
        }
    }

    /// Use a visitor to customize rendering.
    pub fn with_visitor<V: HtmlVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitor = Box::new(visitor);
        self
    }

    /// Render a document to HTML.
    pub fn render(mut self, doc: &Document) -> String {
        self.render_blocks(&doc.content)
    }

    fn render_blocks(&mut self, nodes: &[DocumentNode]) -> String {
        nodes
            .iter()
            .map(|node| self.render_block(node))
            .filter(|html| !html.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_block(&mut self, node: &DocumentNode) -> String {
        match node {
            DocumentNode::Doc { content } => self.render_blocks(content),
            DocumentNode::Paragraph { content } => format!("<p>{}</p>", self.render_inline(content)),
            DocumentNode::Heading { level, content } => {
                let level = (*level).clamp(1, 6);
                match self.visitor.visit_heading(level, &node.plain_text()) {
                    VisitorAction::Replace(html) => html,
                    VisitorAction::Skip => String::new(),
                    VisitorAction::Continue => {
                        format!("<h{0}>{1}</h{0}>", level, self.render_inline(content))
                    }
                }
            }
            DocumentNode::HorizontalRule => "<hr>".to_string(),
            DocumentNode::Blockquote { content } => {
                format!("<blockquote>\n{}\n</blockquote>", self.render_blocks(content))
            }
            DocumentNode::CodeBlock { language, content } => {
                let code: String = content.iter().map(|c| c.plain_text()).collect();
                match self.visitor.visit_code_block(language, &code) {
                    VisitorAction::Replace(html) => html,
                    VisitorAction::Skip => String::new(),
                    VisitorAction::Continue if language.is_empty() => {
                        format!("<pre><code>{}</code></pre>", encode_text(&code))
                    }
                    VisitorAction::Continue => format!(
                        "<pre><code class=\"language-{}\">{}</code></pre>",
                        encode_double_quoted_attribute(language),
                        encode_text(&code)
                    ),
                }
            }
            DocumentNode::BulletList { content } => {
                format!("<ul>\n{}\n</ul>", self.render_blocks(content))
            }
            DocumentNode::OrderedList { content } => {
                format!("<ol>\n{}\n</ol>", self.render_blocks(content))
            }
            DocumentNode::ListItem { content } => {
                format!("<li>{}</li>", self.render_blocks(content))
            }
            DocumentNode::Table { content } => self.render_table(content),
            DocumentNode::TableRow { content } => {
                let cells: String = content.iter().map(|cell| self.render_block(cell)).collect();
                format!("<tr>{}</tr>", cells)
            }
            DocumentNode::TableHeaderCell { content } => {
                format!("<th>{}</th>", self.render_cell(content))
            }
            DocumentNode::TableCell { content } => {
                format!("<td>{}</td>", self.render_cell(content))
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
        }
    }

    fn render_table(&mut self, rows: &[DocumentNode]) -> String {
        let Some((header, body)) = rows.split_first() else {
            return String::new();
        };

        let mut html = String::from("<table>\n<thead>\n");
        html.push_str(&self.render_block(header));
        html.push_str("\n</thead>\n<tbody>\n");
        html.push_str(&self.render_blocks(body));
        if !body.is_empty() {
            html.push('\n');
        }
        html.push_str("</tbody>\n</table>");
        html
    }

    /// Cells hold paragraphs; render their inline content without `<p>`.
    fn render_cell(&mut self, content: &[DocumentNode]) -> String {
        content
            .iter()
            .map(|block| match block {
                DocumentNode::Paragraph { content } => self.render_inline(content),
                other => self.render_block(other),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render_inline(&mut self, nodes: &[DocumentNode]) -> String {
        let mut out = String::new();
        for node in nodes {
            match node {
                DocumentNode::Text { value, marks } => {
                    out.push_str(&self.render_marked(value, marks));
                }
                DocumentNode::Image { src, alt } => {
                    out.push_str(&self.render_image(src, alt));
                }
                DocumentNode::HardBreak => out.push_str("<br>"),
                other => {
                    log::warn!("Unsupported inline node '{}'; rendering its children", other.kind());
                    out.push_str(&self.render_inline(other.children()));
                }
            }
        }
        out
    }

    fn render_image(&mut self, src: &str, alt: &str) -> String {
        match self.visitor.visit_image(src, alt) {
            VisitorAction::Replace(html) => html,
            VisitorAction::Skip => String::new(),
            VisitorAction::Continue => match self.options.sanitizer.sanitize_image_src(src) {
                Some(src) => format!(
                    "<img src=\"{}\" alt=\"{}\">",
                    encode_double_quoted_attribute(&src),
                    encode_double_quoted_attribute(alt)
                ),
                None => {
                    log::warn!("Dropping unsafe image source {:?} from HTML", src);
                    encode_text(alt).into_owned()
                }
            },
        }
    }

    /// Wrap text in tags for its marks; code innermost, links outermost.
    fn render_marked(&self, value: &str, marks: &[Mark]) -> String {
        let mut html = encode_text(value).into_owned();

        let mut ordered: Vec<&Mark> = marks.iter().collect();
        ordered.sort_by_key(|mark| std::cmp::Reverse(mark.nesting_rank()));

        for mark in ordered {
            html = match mark {
                Mark::Code => format!("<code>{}</code>", html),
                Mark::Bold => format!("<strong>{}</strong>", html),
                Mark::Italic => format!("<em>{}</em>", html),
                Mark::Strike => format!("<s>{}</s>", html),
                Mark::Link { href, title } => self.render_link(href, title.as_deref(), &html),
            };
        }
        html
    }

    fn render_link(&self, href: &str, title: Option<&str>, inner: &str) -> String {
        let Some(href) = self.options.sanitizer.sanitize_href(href) else {
            log::warn!("Dropping unsafe link target {:?} from HTML", href);
            return inner.to_string();
        };

        let mut attrs = format!(" href=\"{}\"", encode_double_quoted_attribute(&href));
        if let Some(title) = title {
            attrs.push_str(&format!(" title=\"{}\"", encode_double_quoted_attribute(title)));
        }
        if !self.options.link_rel.is_empty() {
            attrs.push_str(&format!(
                " rel=\"{}\"",
                encode_double_quoted_attribute(&self.options.link_rel)
            ));
        }
        format!("<a{}>{}</a>", attrs, inner)
    }
}
