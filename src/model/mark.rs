//! Character-level formatting marks.

use serde::{Deserialize, Serialize};

/// A formatting annotation attached to a text node.
///
/// Marks on one text node form an ordered set; the first mark is the
/// outermost wrapper produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    /// Strong emphasis (`**text**` or `__text__`)
    Bold,
    /// Emphasis (`*text*` or `_text_`)
    Italic,
    /// Strikethrough (`~~text~~`)
    Strike,
    /// Inline code (`` `text` ``)
    Code,
    /// Hyperlink (`[text](href "title")`)
    Link {
        /// Validated link target
        href: String,
        /// Optional link title
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl Mark {
    /// Create a link mark without a title.
    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link {
            href: href.into(),
            title: None,
        }
    }

    /// Get the mark's type name as used in the JSON tree.
    pub fn name(&self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Strike => "strike",
            Mark::Code => "code",
            Mark::Link { .. } => "link",
        }
    }

    /// Check if this is a link mark.
    pub fn is_link(&self) -> bool {
        matches!(self, Mark::Link { .. })
    }

    /// Nesting order when several marks wrap the same text: lower ranks sit
    /// outside higher ones. Links are outermost and code is innermost.
    pub fn nesting_rank(&self) -> u8 {
        match self {
            Mark::Link { .. } => 0,
            Mark::Strike => 1,
            Mark::Italic => 2,
            Mark::Bold => 3,
            Mark::Code => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_names() {
        assert_eq!(Mark::Bold.name(), "bold");
        assert_eq!(Mark::link("https://example.com").name(), "link");
        assert!(Mark::link("https://example.com").is_link());
        assert!(!Mark::Code.is_link());
    }

    #[test]
    fn test_nesting_rank() {
        let mut marks = vec![Mark::Code, Mark::Bold, Mark::link("/"), Mark::Italic, Mark::Strike];
        marks.sort_by_key(Mark::nesting_rank);
        assert_eq!(
            marks,
            vec![Mark::link("/"), Mark::Strike, Mark::Italic, Mark::Bold, Mark::Code]
        );
    }

    #[test]
    fn test_mark_json_shape() {
        let json = serde_json::to_string(&Mark::Bold).unwrap();
        assert_eq!(json, r#"{"type":"bold"}"#);

        let json = serde_json::to_string(&Mark::link("https://example.com")).unwrap();
        assert_eq!(json, r#"{"type":"link","href":"https://example.com"}"#);
    }
}
