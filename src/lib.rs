//! # mdtree
//!
//! Bidirectional conversion between Markdown text and the document tree of a
//! rich-text editing surface.
//!
//! The parser turns Markdown into a tree of block nodes (headings, lists,
//! quotes, code blocks, tables) whose text leaves carry marks (bold,
//! italic, strikethrough, code, links). The serializer turns the tree back
//! into Markdown. A coordinator applies asynchronous parse results to a
//! live editor in request order, discarding stale ones.
//!
//! ## Quick Start
//!
//! ```
//! use mdtree::{parse, serialize};
//!
//! let doc = parse("# Title\n\nSome **bold** text.");
//! assert_eq!(doc.block_count(), 2);
//!
//! let markdown = serialize(&doc);
//! assert_eq!(markdown, "# Title\n\nSome **bold** text.");
//! ```
//!
//! ## Features
//!
//! - **Injection-safe**: link and image targets pass a scheme allow-list;
//!   rejected ones stay visible as literal text
//! - **Never fails on input**: unterminated fences, stray pipes and unknown
//!   node types all degrade to something reasonable
//! - **Multiple outputs**: Markdown, static HTML, plain text, JSON
//! - **Async coordination**: staleness detection, large-input guard and
//!   chunked application with progress (feature `async`, on by default)

#[cfg(feature = "async")]
pub mod coordinator;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
#[cfg(feature = "async")]
pub use coordinator::{
    apply_incrementally, ConversionCoordinator, CoordinatorOptions, EditingSurface,
    MemorySurface, RequestOutcome,
};
pub use detect::{detect_features, is_likely_markup, MarkupFeature};
pub use error::{Error, Result};
pub use model::{Document, DocumentNode, Mark};
pub use parser::{LinkPolicy, LinkSanitizer, MarkdownParser, ParseOptions, Progress};
pub use render::{JsonFormat, RenderOptions};

/// Parse Markdown text into a document tree.
///
/// Never fails: malformed constructs degrade to literal text.
///
/// # Example
///
/// ```
/// use mdtree::{parse, DocumentNode};
///
/// let doc = parse("# Title");
/// assert!(matches!(doc.content[0], DocumentNode::Heading { level: 1, .. }));
/// ```
pub fn parse(markdown: &str) -> Document {
    MarkdownParser::default().parse(markdown)
}

/// Parse Markdown text with custom options.
///
/// # Example
///
/// ```
/// use mdtree::{parse_with_options, ParseOptions, DocumentNode};
///
/// let options = ParseOptions::new().with_image_prefix("/assets/");
/// let doc = parse_with_options("![logo](logo.png)", options);
/// assert_eq!(
///     doc.content[0].children()[0],
///     DocumentNode::image("/assets/logo.png", "logo")
/// );
/// ```
pub fn parse_with_options(markdown: &str, options: ParseOptions) -> Document {
    MarkdownParser::new(options).parse(markdown)
}

/// Parse Markdown text on the blocking thread pool.
///
/// A panic inside the parser is reported as [`Error::Pipeline`].
#[cfg(feature = "async")]
pub async fn parse_async(markdown: impl Into<String>, options: ParseOptions) -> Result<Document> {
    let markdown = markdown.into();
    tokio::task::spawn_blocking(move || MarkdownParser::new(options).parse(&markdown))
        .await
        .map_err(|e| Error::Pipeline(e.to_string()))
}

/// Serialize a document tree to Markdown.
pub fn serialize(doc: &Document) -> String {
    render::to_markdown(doc, &RenderOptions::default())
}

/// Render a document tree to static HTML.
pub fn to_html(doc: &Document) -> String {
    render::to_html(doc, &RenderOptions::default())
}

/// Builder for parsing and converting Markdown.
///
/// # Example
///
/// ```
/// use mdtree::Converter;
///
/// let html = Converter::new()
///     .with_image_prefix("/img/")
///     .with_link_rel("nofollow")
///     .parse("[site](https://example.com) ![x](x.png)")
///     .to_html();
/// assert!(html.contains("rel=\"nofollow\""));
/// assert!(html.contains("src=\"/img/x.png\""));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Converter {
    /// Create a new converter builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix relative image paths. Applies to the built-in link policy
    /// only; a sanitizer installed with [`with_sanitizer`](Self::with_sanitizer)
    /// stays in charge.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parse_options = self.parse_options.with_image_prefix(prefix);
        self
    }

    /// Use a custom link/image validator for parsing and HTML output.
    pub fn with_sanitizer(mut self, sanitizer: std::sync::Arc<dyn LinkSanitizer>) -> Self {
        self.parse_options = self.parse_options.with_sanitizer(sanitizer.clone());
        self.render_options = self.render_options.with_sanitizer(sanitizer);
        self
    }

    /// Set the bullet list marker used when serializing.
    pub fn with_bullet_marker(mut self, marker: char) -> Self {
        self.render_options = self.render_options.with_bullet_marker(marker);
        self
    }

    /// Set the `rel` attribute for HTML links.
    pub fn with_link_rel(mut self, rel: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_link_rel(rel);
        self
    }

    /// Parse Markdown and return a result wrapper.
    pub fn parse(self, markdown: &str) -> ConversionResult {
        let document = MarkdownParser::new(self.parse_options).parse(markdown);
        ConversionResult {
            document,
            render_options: self.render_options,
        }
    }

    /// Load a document from JSON and return a result wrapper.
    pub fn load_json(self, json: &str) -> Result<ConversionResult> {
        Ok(ConversionResult {
            document: render::from_json(json)?,
            render_options: self.render_options,
        })
    }
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// The document tree
    pub document: Document,
    render_options: RenderOptions,
}

impl ConversionResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to HTML.
    pub fn to_html(&self) -> String {
        render::to_html(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_roundtrip() {
        let doc = parse("# Title");
        assert_eq!(
            doc.content,
            vec![DocumentNode::heading(1, vec![DocumentNode::text("Title")])]
        );
        assert_eq!(serialize(&doc), "# Title");
    }

    #[test]
    fn test_unsafe_link_never_becomes_link() {
        let doc = parse("[bad](javascript:alert(1))");
        let mut has_link = false;
        doc.walk(&mut |node| has_link |= node.marks().iter().any(Mark::is_link));
        assert!(!has_link);
        assert_eq!(doc.plain_text(), "bad (javascript:alert(1))");
    }

    #[test]
    fn test_converter_markdown() {
        let markdown = Converter::new()
            .with_bullet_marker('*')
            .parse("- a\n- b")
            .to_markdown();
        assert_eq!(markdown, "* a\n* b");
    }

    #[test]
    fn test_converter_load_json() {
        let result = Converter::new()
            .load_json(r#"{"type":"doc","content":[{"type":"horizontalRule"}]}"#)
            .unwrap();
        assert_eq!(result.to_markdown(), "---");
        assert_eq!(result.to_text(), "");
    }

    #[test]
    fn test_converter_json_output() {
        let json = Converter::new()
            .parse("hi")
            .to_json(JsonFormat::Compact)
            .unwrap();
        assert_eq!(
            json,
            r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","value":"hi"}]}]}"#
        );
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_parse_async() {
        let doc = parse_async("**x**", ParseOptions::default()).await.unwrap();
        assert_eq!(doc, parse("**x**"));
    }
}
