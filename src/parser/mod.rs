//! Markdown parsing module.
//!
//! Parsing runs as a fixed pipeline over one input string:
//! code fence extraction, table extraction, block structure parsing (which
//! calls the inline parser for each block's text), and finally restoration
//! of the extracted regions into typed nodes.

mod block;
mod chunked;
mod extract;
mod inline;
mod options;
mod sanitize;
mod token;

pub use chunked::{ChunkedParser, ParsedChunk};
pub use inline::parse_inline;
pub use options::ParseOptions;
pub use sanitize::{LinkPolicy, LinkSanitizer};

use block::BlockParser;
use extract::{extract_code_blocks, extract_tables, PlaceholderTable};

use crate::model::Document;

/// Line-granularity parse progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Lines consumed so far
    pub processed: usize,
    /// Total number of lines
    pub total: usize,
}

impl Progress {
    /// Get progress as a fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }

    /// Check if all lines have been processed.
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

/// Markdown to document tree parser.
///
/// Parsing is pure: every call owns its placeholder tables, so one parser
/// can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    options: ParseOptions,
}

impl MarkdownParser {
    /// Create a parser with the given options.
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse Markdown text into a document.
    pub fn parse(&self, text: &str) -> Document {
        self.parse_with_progress(text, &mut |_| {})
    }

    /// Parse Markdown text, reporting progress after each block.
    pub fn parse_with_progress(&self, text: &str, progress: &mut dyn FnMut(Progress)) -> Document {
        let normalized = text.replace("\r\n", "\n");

        let mut placeholders = PlaceholderTable::new();
        let extracted = extract_code_blocks(&normalized, &mut placeholders);
        let extracted = extract_tables(&extracted, &mut placeholders);
        log::debug!("Extracted {} code/table regions", placeholders.len());

        let blocks = BlockParser::new(&self.options, &placeholders);
        let mut content = blocks.parse(&extracted, progress);
        blocks.restore(&mut content);

        Document::with_content(content)
    }
}
