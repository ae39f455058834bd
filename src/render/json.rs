//! JSON interchange for document trees.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Load a document from its JSON tree.
///
/// The root must be a `doc` node. Node types this crate does not know are
/// kept as [`DocumentNode::Unknown`](crate::DocumentNode::Unknown).
pub fn from_json(json: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value.get("type").and_then(|t| t.as_str()) {
        Some("doc") => Ok(serde_json::from_value(value)?),
        Some(other) => Err(Error::InvalidDocument(format!(
            "root node must be 'doc', found '{}'",
            other
        ))),
        None => Err(Error::InvalidDocument("root node has no type".to_string())),
    }
}
