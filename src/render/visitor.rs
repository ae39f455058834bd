//! Visitor pattern for customizing HTML rendering.
//!
//! Visitors let a host plug collaborators into the HTML renderer without
//! the renderer knowing about them. A diagram renderer for `mermaid` code
//! blocks is the typical case: it is passed in as a visitor rather than
//! looked up from shared state.
//!
//! # Example
//!
//! ```
//! use mdtree::render::{DiagramVisitor, HtmlRenderer, RenderOptions};
//! use mdtree::parse;
//!
//! let doc = parse("```mermaid\ngraph TD; A-->B\n```");
//! let html = HtmlRenderer::new(RenderOptions::default())
//!     .with_visitor(DiagramVisitor::new("mermaid", |source: &str| {
//!         Some(format!("<svg data-lines=\"{}\"></svg>", source.lines().count()))
//!     }))
//!     .render(&doc);
//! assert_eq!(html, "<svg data-lines=\"1\"></svg>");
//! ```

/// What the HTML renderer should do with the visited node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Render the node normally
    #[default]
    Continue,
    /// Insert this markup verbatim instead of the node
    Replace(String),
    /// Render nothing for the node
    Skip,
}

/// Hook into HTML rendering of selected node types.
///
/// Every method defaults to [`VisitorAction::Continue`].
pub trait HtmlVisitor: Send + Sync {
    /// Called before rendering a code block.
    ///
    /// # Arguments
    /// * `language` - The fence language tag (may be empty)
    /// * `code` - The raw code
    fn visit_code_block(&mut self, language: &str, code: &str) -> VisitorAction {
        let _ = (language, code);
        VisitorAction::Continue
    }

    /// Called before rendering an image.
    fn visit_image(&mut self, src: &str, alt: &str) -> VisitorAction {
        let _ = (src, alt);
        VisitorAction::Continue
    }

    /// Called before rendering a heading.
    ///
    /// # Arguments
    /// * `level` - Heading level (1-6)
    /// * `text` - The heading's plain text
    fn visit_heading(&mut self, level: u8, text: &str) -> VisitorAction {
        let _ = (level, text);
        VisitorAction::Continue
    }
}

/// Visitor that changes nothing.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl HtmlVisitor for DefaultVisitor {}

/// Visitor that drops every image from the output.
#[derive(Debug, Clone, Default)]
pub struct SkipImagesVisitor;

impl HtmlVisitor for SkipImagesVisitor {
    fn visit_image(&mut self, _src: &str, _alt: &str) -> VisitorAction {
        VisitorAction::Skip
    }
}

/// Visitor that hands code blocks of one language to a diagram renderer.
///
/// The renderer returns the markup to insert, or `None` to fall back to an
/// ordinary code block.
pub struct DiagramVisitor<F> {
    language: String,
    render: F,
}

impl<F> DiagramVisitor<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    /// Create a visitor for code blocks tagged `language`.
    pub fn new(language: impl Into<String>, render: F) -> Self {
        Self {
            language: language.into(),
            render,
        }
    }
}

impl<F> HtmlVisitor for DiagramVisitor<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn visit_code_block(&mut self, language: &str, code: &str) -> VisitorAction {
        if !language.eq_ignore_ascii_case(&self.language) {
            return VisitorAction::Continue;
        }
        match (self.render)(code) {
            Some(markup) => VisitorAction::Replace(markup),
            None => VisitorAction::Continue,
        }
    }
}

/// Chain of visitors; the first one that does not return
/// [`VisitorAction::Continue`] decides.
#[derive(Default)]
pub struct CompositeVisitor {
    visitors: Vec<Box<dyn HtmlVisitor>>,
}

impl CompositeVisitor {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a visitor.
    pub fn with_visitor<V: HtmlVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    fn first_action(
        &mut self,
        mut visit: impl FnMut(&mut dyn HtmlVisitor) -> VisitorAction,
    ) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = visit(visitor.as_mut());
            if action != VisitorAction::Continue {
                return action;
            }
        }
        VisitorAction::Continue
    }
}

impl HtmlVisitor for CompositeVisitor {
    fn visit_code_block(&mut self, language: &str, code: &str) -> VisitorAction {
        self.first_action(|v| v.visit_code_block(language, code))
    }

    fn visit_image(&mut self, src: &str, alt: &str) -> VisitorAction {
        self.first_action(|v| v.visit_image(src, alt))
    }

    fn visit_heading(&mut self, level: u8, text: &str) -> VisitorAction {
        self.first_action(|v| v.visit_heading(level, text))
    }
}
