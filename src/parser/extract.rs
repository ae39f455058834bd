//! Block extraction for fenced code and pipe tables.
//!
//! Runs before any structural parsing. Each extracted region is replaced by
//! a single line holding an opaque placeholder token, and its raw payload is
//! stored in a [`PlaceholderTable`] scoped to one parse call. Lines that are
//! not extracted pass through byte-identical and in their original order.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::token::{is_token, new_token};

/// Opening and closing code fence.
const FENCE: &str = "```";

/// A header-separator cell: only dashes, colons and whitespace.
static SEPARATOR_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-:\s]*$").unwrap());

/// Raw payload of an extracted region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Placeholder {
    /// Fenced code block
    Code { language: String, code: String },
    /// Pipe table; every row has exactly `headers.len()` cells
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// Token-to-payload map for one parse call.
#[derive(Debug, Default)]
pub(crate) struct PlaceholderTable {
    entries: HashMap<String, Placeholder>,
}

impl PlaceholderTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store a payload under a fresh token and return the token.
    pub(crate) fn insert(&mut self, payload: Placeholder) -> String {
        let kind = match payload {
            Placeholder::Code { .. } => "code",
            Placeholder::Table { .. } => "table",
        };
        let token = new_token(kind);
        self.entries.insert(token.clone(), payload);
        token
    }

    pub(crate) fn get(&self, token: &str) -> Option<&Placeholder> {
        self.entries.get(token)
    }

    /// Check whether a line is a placeholder line from this table.
    pub(crate) fn is_placeholder_line(&self, line: &str) -> bool {
        let line = line.trim();
        is_token(line) && self.entries.contains_key(line)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Replace fenced code blocks with placeholder lines.
///
/// A line whose trimmed content starts with a fence opens a block; the rest
/// of that line is the language tag. Lines are captured verbatim until a
/// line whose trimmed content starts with a fence. An unterminated fence
/// consumes through the end of input.
pub(crate) fn extract_code_blocks(text: &str, table: &mut PlaceholderTable) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut output: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let Some(rest) = lines[i].trim().strip_prefix(FENCE) else {
            output.push(Cow::Borrowed(lines[i]));
            i += 1;
            continue;
        };

        let language = rest.trim_start_matches('`').trim().to_string();
        let mut end = i + 1;
        while end < lines.len() && !lines[end].trim().starts_with(FENCE) {
            end += 1;
        }

        let code = lines[i + 1..end].join("\n");
        output.push(Cow::Owned(table.insert(Placeholder::Code { language, code })));

        // Skip the closing fence when there is one
        i = (end + 1).min(lines.len());
    }

    output.join("\n")
}

/// Replace pipe tables with placeholder lines.
///
/// A maximal run of candidate rows becomes a table only when some row after
/// the first is a header separator. Otherwise the run is emitted unchanged.
pub(crate) fn extract_tables(text: &str, table: &mut PlaceholderTable) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut output: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if !is_candidate_row(lines[i]) {
            output.push(Cow::Borrowed(lines[i]));
            i += 1;
            continue;
        }

        let start = i;
        while i < lines.len() && is_candidate_row(lines[i]) {
            i += 1;
        }

        let run = &lines[start..i];
        match parse_table_rows(run) {
            Some(payload) => output.push(Cow::Owned(table.insert(payload))),
            None => output.extend(run.iter().map(|line| Cow::Borrowed(*line))),
        }
    }

    output.join("\n")
}

/// Build a table payload from a run of candidate rows.
///
/// Returns `None` when no row after the first is a header separator. The
/// first row supplies the headers; the separator row is dropped; body rows
/// are padded or truncated to the header width.
pub(crate) fn parse_table_rows(lines: &[&str]) -> Option<Placeholder> {
    let mut rows: Vec<Vec<String>> = lines.iter().map(|line| split_row(line)).collect();
    let separator = rows.iter().skip(1).position(|row| is_separator_row(row))? + 1;

    rows.remove(separator);
    let mut rows = rows.into_iter();
    let headers = rows.next()?;
    let width = headers.len();
    let rows = rows
        .map(|mut row| {
            row.resize(width, String::new());
            row
        })
        .collect();

    Some(Placeholder::Table { headers, rows })
}

/// Split a row on `|`, dropping an empty leading and trailing segment.
/// `\|` is a literal pipe inside a cell.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.trim().chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                current.push('|');
            }
            '|' => cells.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    cells.push(current);

    let mut cells: Vec<String> = cells.iter().map(|c| c.trim().to_string()).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

fn is_candidate_row(line: &str) -> bool {
    line.contains('|') && split_row(line).len() >= 2
}

fn is_separator_row(cells: &[String]) -> bool {
    cells.iter().all(|cell| SEPARATOR_CELL.is_match(cell)) && cells.iter().any(|c| c.contains('-'))
}
