//! Editing surface abstraction.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::{Document, DocumentNode};

/// The live editor a coordinator applies parse results to.
///
/// Methods take `&self`; implementations handle their own synchronization.
pub trait EditingSurface: Send + Sync {
    /// Replace the whole document.
    fn replace_document(&self, doc: Document);

    /// Append top-level blocks to the current document.
    fn append_blocks(&self, blocks: Vec<DocumentNode>);

    /// Show `text` verbatim, discarding any partial tree.
    fn restore_plain_text(&self, text: &str);
}

#[derive(Debug, Default)]
struct SurfaceState {
    document: Document,
    replacements: usize,
    restores: usize,
}

/// In-memory editing surface.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a snapshot of the current document.
    pub fn document(&self) -> Document {
        self.lock().document.clone()
    }

    /// Number of whole-document replacements so far.
    pub fn replacement_count(&self) -> usize {
        self.lock().replacements
    }

    /// Number of plain-text restorations so far.
    pub fn restore_count(&self) -> usize {
        self.lock().restores
    }
}

impl EditingSurface for MemorySurface {
    fn replace_document(&self, doc: Document) {
        let mut state = self.lock();
        state.document = doc;
        state.replacements += 1;
    }

    fn append_blocks(&self, blocks: Vec<DocumentNode>) {
        self.lock().document.extend(blocks);
    }

    fn restore_plain_text(&self, text: &str) {
        let mut state = self.lock();
        state.document = Document::literal(text);
        state.restores += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_surface() {
        let surface = MemorySurface::new();
        surface.replace_document(Document::new());
        surface.append_blocks(vec![DocumentNode::HorizontalRule]);
        assert_eq!(surface.document().block_count(), 1);
        assert_eq!(surface.replacement_count(), 1);

        surface.restore_plain_text("a\nb");
        assert_eq!(surface.document().plain_text(), "a\n\nb");
        assert_eq!(surface.restore_count(), 1);
    }
}
