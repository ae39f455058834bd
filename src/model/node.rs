//! Document tree nodes.

use super::Mark;
use serde::{Deserialize, Serialize};

/// A node in the structured document tree.
///
/// Every container owns its children; the tree never shares nodes.
/// Node types a host editor knows but this crate does not deserialize
/// into [`DocumentNode::Unknown`], which keeps its children so the
/// serializers can flatten it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DocumentNode {
    /// Document root
    Doc {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Paragraph of inline content
    Paragraph {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Heading, level 1-6
    Heading {
        level: u8,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Unordered list of `listItem` nodes
    BulletList {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Ordered list of `listItem` nodes
    OrderedList {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// List item: a paragraph, optionally followed by nested lists
    ListItem {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Block quote
    Blockquote {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Fenced code block; content is a single unmarked text node
    CodeBlock {
        #[serde(default)]
        language: String,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Table of `tableRow` nodes
    Table {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Table row of cells
    TableRow {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Body cell
    TableCell {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Header cell
    TableHeaderCell {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },

    /// Thematic break
    HorizontalRule,

    /// Forced line break inside inline content
    HardBreak,

    /// Inline image
    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },

    /// Run of text sharing one set of marks
    Text {
        value: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },

    /// Node type not modelled by this crate
    #[serde(untagged)]
    Unknown {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
}

impl DocumentNode {
    /// Create an unmarked text node.
    pub fn text(value: impl Into<String>) -> Self {
        DocumentNode::Text {
            value: value.into(),
            marks: Vec::new(),
        }
    }

    /// Create a text node with marks.
    pub fn marked_text(value: impl Into<String>, marks: Vec<Mark>) -> Self {
        DocumentNode::Text {
            value: value.into(),
            marks,
        }
    }

    /// Create a paragraph.
    pub fn paragraph(content: Vec<DocumentNode>) -> Self {
        DocumentNode::Paragraph { content }
    }

    /// Create a heading, clamping the level to 1-6.
    pub fn heading(level: u8, content: Vec<DocumentNode>) -> Self {
        DocumentNode::Heading {
            level: level.clamp(1, 6),
            content,
        }
    }

    /// Create a code block holding `code` verbatim.
    pub fn code_block(language: impl Into<String>, code: &str) -> Self {
        let content = if code.is_empty() {
            Vec::new()
        } else {
            vec![DocumentNode::text(code)]
        };
        DocumentNode::CodeBlock {
            language: language.into(),
            content,
        }
    }

    /// Create an image node.
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        DocumentNode::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    /// Get the node's type name as used in the JSON tree.
    pub fn kind(&self) -> &str {
        match self {
            DocumentNode::Doc { .. } => "doc",
            DocumentNode::Paragraph { .. } => "paragraph",
            DocumentNode::Heading { .. } => "heading",
            DocumentNode::BulletList { .. } => "bulletList",
            DocumentNode::OrderedList { .. } => "orderedList",
            DocumentNode::ListItem { .. } => "listItem",
            DocumentNode::Blockquote { .. } => "blockquote",
            DocumentNode::CodeBlock { .. } => "codeBlock",
            DocumentNode::Table { .. } => "table",
            DocumentNode::TableRow { .. } => "tableRow",
            DocumentNode::TableCell { .. } => "tableCell",
            DocumentNode::TableHeaderCell { .. } => "tableHeaderCell",
            DocumentNode::HorizontalRule => "horizontalRule",
            DocumentNode::HardBreak => "hardBreak",
            DocumentNode::Image { .. } => "image",
            DocumentNode::Text { .. } => "text",
            DocumentNode::Unknown { kind, .. } => kind,
        }
    }

    /// Get the node's children (empty for leaves).
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Doc { content }
            | DocumentNode::Paragraph { content }
            | DocumentNode::Heading { content, .. }
            | DocumentNode::BulletList { content }
            | DocumentNode::OrderedList { content }
            | DocumentNode::ListItem { content }
            | DocumentNode::Blockquote { content }
            | DocumentNode::CodeBlock { content, .. }
            | DocumentNode::Table { content }
            | DocumentNode::TableRow { content }
            | DocumentNode::TableCell { content }
            | DocumentNode::TableHeaderCell { content }
            | DocumentNode::Unknown { content, .. } => content,
            DocumentNode::HorizontalRule
            | DocumentNode::HardBreak
            | DocumentNode::Image { .. }
            | DocumentNode::Text { .. } => &[],
        }
    }

    /// Get mutable access to the node's children, if it can hold any.
    pub fn children_mut(&mut self) -> Option<&mut Vec<DocumentNode>> {
        match self {
            DocumentNode::Doc { content }
            | DocumentNode::Paragraph { content }
            | DocumentNode::Heading { content, .. }
            | DocumentNode::BulletList { content }
            | DocumentNode::OrderedList { content }
            | DocumentNode::ListItem { content }
            | DocumentNode::Blockquote { content }
            | DocumentNode::CodeBlock { content, .. }
            | DocumentNode::Table { content }
            | DocumentNode::TableRow { content }
            | DocumentNode::TableCell { content }
            | DocumentNode::TableHeaderCell { content }
            | DocumentNode::Unknown { content, .. } => Some(content),
            DocumentNode::HorizontalRule
            | DocumentNode::HardBreak
            | DocumentNode::Image { .. }
            | DocumentNode::Text { .. } => None,
        }
    }

    /// Get the marks of a text node (empty for other nodes).
    pub fn marks(&self) -> &[Mark] {
        match self {
            DocumentNode::Text { marks, .. } => marks,
            _ => &[],
        }
    }

    /// Check if this node lives inside inline content.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            DocumentNode::Text { .. } | DocumentNode::Image { .. } | DocumentNode::HardBreak
        )
    }

    /// Get the plain text content of this node and its descendants.
    pub fn plain_text(&self) -> String {
        match self {
            DocumentNode::Text { value, .. } => value.clone(),
            DocumentNode::Image { alt, .. } => alt.clone(),
            DocumentNode::HardBreak => "\n".to_string(),
            DocumentNode::HorizontalRule => String::new(),
            DocumentNode::TableRow { content } => content
                .iter()
                .map(|cell| cell.plain_text())
                .collect::<Vec<_>>()
                .join("\t"),
            _ => {
                let children = self.children();
                let separator = if children.iter().all(|c| c.is_inline()) {
                    ""
                } else {
                    "\n"
                };
                children
                    .iter()
                    .map(|c| c.plain_text())
                    .collect::<Vec<_>>()
                    .join(separator)
            }
        }
    }

    /// Walk this node and its descendants depth-first, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DocumentNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_clamped() {
        let heading = DocumentNode::heading(9, vec![DocumentNode::text("Title")]);
        assert!(matches!(heading, DocumentNode::Heading { level: 6, .. }));
    }

    #[test]
    fn test_empty_code_block_has_no_text_child() {
        let block = DocumentNode::code_block("rust", "");
        assert!(block.children().is_empty());
    }

    #[test]
    fn test_plain_text_of_nested_list() {
        let list = DocumentNode::BulletList {
            content: vec![
                DocumentNode::ListItem {
                    content: vec![DocumentNode::paragraph(vec![DocumentNode::text("one")])],
                },
                DocumentNode::ListItem {
                    content: vec![DocumentNode::paragraph(vec![
                        DocumentNode::marked_text("two", vec![Mark::Bold]),
                        DocumentNode::text(" too"),
                    ])],
                },
            ],
        };
        assert_eq!(list.plain_text(), "one\ntwo too");
    }

    #[test]
    fn test_json_shape() {
        let node = DocumentNode::heading(2, vec![DocumentNode::text("Hi")]);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"type":"heading","level":2,"content":[{"type":"text","value":"Hi"}]}"#
        );

        let rule: DocumentNode = serde_json::from_str(r#"{"type":"horizontalRule"}"#).unwrap();
        assert_eq!(rule, DocumentNode::HorizontalRule);
    }

    #[test]
    fn test_unknown_node_keeps_children() {
        let json = r#"{"type":"callout","content":[{"type":"text","value":"note"}]}"#;
        let node: DocumentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind(), "callout");
        assert_eq!(node.plain_text(), "note");
    }

    #[test]
    fn test_walk_visits_all_nodes() {
        let node = DocumentNode::Blockquote {
            content: vec![DocumentNode::paragraph(vec![DocumentNode::text("q")])],
        };
        let mut kinds = Vec::new();
        node.walk(&mut |n| kinds.push(n.kind().to_string()));
        assert_eq!(kinds, vec!["blockquote", "paragraph", "text"]);
    }
}
