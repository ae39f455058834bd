//! Document model types for the structured editor tree.
//!
//! This module defines the tree that bridges Markdown parsing and
//! rendering. It mirrors the node and mark vocabulary of a rich-text
//! editing surface: block nodes own ordered children, and text nodes
//! carry an ordered set of marks.

mod document;
mod mark;
mod node;

pub use document::Document;
pub use mark::Mark;
pub use node::DocumentNode;
