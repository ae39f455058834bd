//! Document-level types.

use super::DocumentNode;
use serde::{Deserialize, Serialize};

/// A structured document: the children of the `doc` root node.
///
/// Serializes as `{"type": "doc", "content": [...]}`, the shape a
/// rich-text editing surface exchanges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "doc")]
pub struct Document {
    /// Top-level block nodes
    #[serde(default)]
    pub content: Vec<DocumentNode>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from top-level blocks.
    pub fn with_content(content: Vec<DocumentNode>) -> Self {
        Self { content }
    }

    /// Build a document that shows `text` verbatim, one paragraph per line.
    ///
    /// No markup is interpreted. Blank lines become empty paragraphs so the
    /// visible layout matches the input.
    pub fn literal(text: &str) -> Self {
        let content = text
            .lines()
            .map(|line| {
                if line.is_empty() {
                    DocumentNode::paragraph(Vec::new())
                } else {
                    DocumentNode::paragraph(vec![DocumentNode::text(line)])
                }
            })
            .collect();
        Self { content }
    }

    /// Wrap a node as a document. A `doc` node donates its children.
    pub fn from_node(node: DocumentNode) -> Self {
        match node {
            DocumentNode::Doc { content } => Self { content },
            other => Self {
                content: vec![other],
            },
        }
    }

    /// Convert into a `doc` root node.
    pub fn into_node(self) -> DocumentNode {
        DocumentNode::Doc {
            content: self.content,
        }
    }

    /// Append a top-level block.
    pub fn push(&mut self, node: DocumentNode) {
        self.content.push(node);
    }

    /// Append several top-level blocks.
    pub fn extend(&mut self, nodes: impl IntoIterator<Item = DocumentNode>) {
        self.content.extend(nodes);
    }

    /// Get the number of top-level blocks.
    pub fn block_count(&self) -> usize {
        self.content.len()
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|block| block.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Walk every node in the document depth-first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DocumentNode)) {
        for block in &self.content {
            block.walk(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_document() {
        let doc = Document::literal("# not a heading\n\n**plain**");
        assert_eq!(doc.block_count(), 3);
        assert_eq!(
            doc.content[0],
            DocumentNode::paragraph(vec![DocumentNode::text("# not a heading")])
        );
        assert_eq!(doc.content[1], DocumentNode::paragraph(Vec::new()));
    }

    #[test]
    fn test_document_json_root() {
        let doc = Document::with_content(vec![DocumentNode::HorizontalRule]);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"type":"doc","content":[{"type":"horizontalRule"}]}"#);

        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_from_node_unwraps_doc() {
        let node = DocumentNode::Doc {
            content: vec![DocumentNode::HorizontalRule],
        };
        let doc = Document::from_node(node);
        assert_eq!(doc.block_count(), 1);
        assert_eq!(doc.clone().into_node().children().len(), 1);
    }

    #[test]
    fn test_plain_text_joins_blocks() {
        let doc = Document::with_content(vec![
            DocumentNode::heading(1, vec![DocumentNode::text("Title")]),
            DocumentNode::paragraph(vec![DocumentNode::text("Body")]),
        ]);
        assert_eq!(doc.plain_text(), "Title\n\nBody");
    }
}
