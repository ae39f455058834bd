//! Rendering options and configuration.

use std::sync::Arc;

use crate::parser::{LinkPolicy, LinkSanitizer};

/// Options for rendering a document tree.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Character used for bullet list markers
    pub bullet_marker: char,

    /// Spaces of indentation per list nesting level
    pub indent_width: usize,

    /// Fence used for code blocks
    pub code_fence: String,

    /// Collect document statistics during rendering
    pub collect_stats: bool,

    /// `rel` attribute for HTML links (empty = none)
    pub link_rel: String,

    /// Validator applied to link and image targets in HTML output
    pub sanitizer: Arc<dyn LinkSanitizer>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bullet list marker.
    pub fn with_bullet_marker(mut self, marker: char) -> Self {
        self.bullet_marker = marker;
        self
    }

    /// Set the list indentation width.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    /// Set the code fence.
    pub fn with_code_fence(mut self, fence: impl Into<String>) -> Self {
        self.code_fence = fence.into();
        self
    }

    /// Enable or disable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Set the `rel` attribute for HTML links.
    pub fn with_link_rel(mut self, rel: impl Into<String>) -> Self {
        self.link_rel = rel.into();
        self
    }

    /// Use a custom link/image validator for HTML output.
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn LinkSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bullet_marker: '-',
            indent_width: 2,
            code_fence: "```".to_string(),
            collect_stats: false,
            link_rel: "noopener noreferrer".to_string(),
            sanitizer: Arc::new(LinkPolicy::default()),
        }
    }
}
