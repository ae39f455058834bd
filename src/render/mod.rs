//! Rendering module for converting document trees to output formats.

mod html;
mod json;
mod markdown;
mod options;
mod result;
mod text;
pub mod visitor;

pub use html::{to_html, HtmlRenderer};
pub use json::{from_json, to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::RenderOptions;
pub use result::{DocumentStats, RenderResult};
pub use text::to_text;
pub use visitor::{
    CompositeVisitor, DefaultVisitor, DiagramVisitor, HtmlVisitor, SkipImagesVisitor,
    VisitorAction,
};
