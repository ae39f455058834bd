//! Plain text rendering.

use crate::model::Document;

/// Convert a document to plain text, dropping all markup.
pub fn to_text(doc: &Document) -> String {
    doc.plain_text().trim().to_string()
}
