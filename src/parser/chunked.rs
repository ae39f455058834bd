//! Chunked parsing for large inputs.
//!
//! The chunked parser splits the input at blank lines that sit outside any
//! code fence, parses each piece on its own, and yields the resulting
//! blocks one chunk at a time. No block construct spans such a blank line,
//! so concatenating every chunk's blocks gives the same tree as parsing the
//! whole input at once.
//!
//! # Example
//!
//! ```
//! use mdtree::parser::{ChunkedParser, MarkdownParser};
//!
//! let text = "# One\n\nfirst\n\n# Two\n\nsecond";
//! let mut blocks = Vec::new();
//! for chunk in ChunkedParser::new(text, MarkdownParser::default(), 2) {
//!     println!("{}/{} lines", chunk.progress.processed, chunk.progress.total);
//!     blocks.extend(chunk.blocks);
//! }
//! assert_eq!(blocks.len(), 4);
//! ```

use super::{MarkdownParser, Progress};
use crate::model::DocumentNode;

/// Fence marker tracked while looking for split points.
const FENCE: &str = "```";

/// Blocks parsed from one chunk of input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedChunk {
    /// Top-level blocks of this chunk
    pub blocks: Vec<DocumentNode>,
    /// Lines consumed so far, out of the whole input
    pub progress: Progress,
}

/// Iterator that parses a document chunk by chunk.
pub struct ChunkedParser {
    parser: MarkdownParser,
    lines: Vec<String>,
    position: usize,
    chunk_lines: usize,
}

impl ChunkedParser {
    /// Create a chunked parser over `text`.
    ///
    /// A chunk closes at the first blank line outside a fence once at least
    /// `chunk_lines` lines have accumulated.
    pub fn new(text: &str, parser: MarkdownParser, chunk_lines: usize) -> Self {
        Self {
            parser,
            lines: text.replace("\r\n", "\n").split('\n').map(str::to_string).collect(),
            position: 0,
            chunk_lines: chunk_lines.max(1),
        }
    }

    /// Get the total number of input lines.
    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// Find the end (exclusive) of the chunk starting at `start`.
    fn chunk_end(&self, start: usize) -> usize {
        let mut in_fence = false;
        let mut end = start;

        while end < self.lines.len() {
            let trimmed = self.lines[end].trim();
            end += 1;

            if trimmed.starts_with(FENCE) {
                in_fence = !in_fence;
            } else if trimmed.is_empty() && !in_fence && end - start >= self.chunk_lines {
                break;
            }
        }

        end
    }
}

impl Iterator for ChunkedParser {
    type Item = ParsedChunk;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.lines.len() {
            return None;
        }

        let start = self.position;
        let end = self.chunk_end(start);
        self.position = end;

        let text = self.lines[start..end].join("\n");
        let blocks = self.parser.parse(&text).content;
        let progress = Progress {
            processed: end,
            total: self.lines.len(),
        };
        log::debug!(
            "Parsed chunk of {} lines ({}/{})",
            end - start,
            progress.processed,
            progress.total
        );

        Some(ParsedChunk { blocks, progress })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, chunk_lines: usize) -> (Vec<ParsedChunk>, Vec<DocumentNode>) {
        let chunks: Vec<ParsedChunk> =
            ChunkedParser::new(text, MarkdownParser::default(), chunk_lines).collect();
        let blocks = chunks.iter().flat_map(|c| c.blocks.clone()).collect();
        (chunks, blocks)
    }

    #[test]
    fn test_chunks_match_whole_parse() {
        let text = "# Title\n\npara one\ncontinued\n\n- a\n  - b\n\n| x | y |\n|---|---|\n| 1 | 2 |\n\n> quote\n\n---\n\nend";
        let whole = MarkdownParser::default().parse(text).content;

        for size in [1, 2, 3, 5, 100] {
            let (_, blocks) = collect(text, size);
            assert_eq!(blocks, whole, "chunk size {}", size);
        }
    }

    #[test]
    fn test_fence_is_never_split() {
        let text = "```\na\n\nb\n\nc\n```\n\nafter";
        let (chunks, blocks) = collect(text, 1);
        assert_eq!(chunks[0].blocks.len(), 1);
        assert_eq!(chunks[0].blocks[0].kind(), "codeBlock");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_progress_reaches_total() {
        let text = "a\n\nb\n\nc";
        let (chunks, _) = collect(text, 1);
        assert_eq!(chunks.len(), 3);
        let last = chunks.last().unwrap().progress;
        assert_eq!(last.processed, 5);
        assert_eq!(last.total, 5);
    }

    #[test]
    fn test_empty_input() {
        let (chunks, blocks) = collect("", 10);
        assert_eq!(chunks.len(), 1);
        assert!(blocks.is_empty());
    }
}
