//! Rendering output paired with document statistics.

use serde::{Deserialize, Serialize};

use crate::model::DocumentNode;

/// Rendered output and the statistics gathered while producing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// Rendered text
    pub content: String,

    /// Counts of the nodes that were rendered
    pub stats: DocumentStats,
}

impl RenderResult {
    /// Pair rendered text with its statistics.
    pub fn new(content: String, stats: DocumentStats) -> Self {
        Self { content, stats }
    }
}

/// Node counts for a document tree.
///
/// Paragraphs inside list items and table cells are part of their container
/// and are not counted as paragraphs. A run of text nodes under one link
/// counts as a single link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub paragraph_count: u32,
    pub heading_count: u32,
    /// Bullet and ordered lists, nested ones included
    pub list_count: u32,
    pub list_item_count: u32,
    pub table_count: u32,
    pub code_block_count: u32,
    pub image_count: u32,
    pub link_count: u32,
    pub horizontal_rule_count: u32,
    /// Whitespace-separated words of the plain text
    pub word_count: u32,
    /// Non-whitespace characters of the plain text
    pub char_count: u32,
}

impl DocumentStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one rendered node. Containers are counted once; their children
    /// are recorded separately as the renderer reaches them.
    pub fn record(&mut self, node: &DocumentNode) {
        let counter = match node {
            DocumentNode::Paragraph { .. } => &mut self.paragraph_count,
            DocumentNode::Heading { .. } => &mut self.heading_count,
            DocumentNode::BulletList { .. } | DocumentNode::OrderedList { .. } => {
                &mut self.list_count
            }
            DocumentNode::ListItem { .. } => &mut self.list_item_count,
            DocumentNode::Table { .. } => &mut self.table_count,
            DocumentNode::CodeBlock { .. } => &mut self.code_block_count,
            DocumentNode::Image { .. } => &mut self.image_count,
            DocumentNode::HorizontalRule => &mut self.horizontal_rule_count,
            _ => return,
        };
        *counter += 1;
    }

    /// Count one link run.
    pub fn record_link(&mut self) {
        self.link_count += 1;
    }

    /// Add word and character counts for `text`.
    pub fn record_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Total number of block-level nodes counted.
    pub fn block_count(&self) -> u32 {
        self.paragraph_count
            + self.heading_count
            + self.list_count
            + self.table_count
            + self.code_block_count
            + self.horizontal_rule_count
    }
}
