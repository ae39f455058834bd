//! Placeholder tokens.
//!
//! A placeholder token stands in for a span that an earlier parsing stage
//! has already classified, so later stages cannot reinterpret it. Tokens
//! are delimited by private-use characters and carry a random 128-bit
//! identifier, which keeps them from colliding with user-authored text.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Opening delimiter (U+E000, private use area).
const TOKEN_OPEN: char = '\u{E000}';

/// Closing delimiter (U+E001, private use area).
const TOKEN_CLOSE: char = '\u{E001}';

/// Matches any placeholder token produced by [`new_token`].
pub(crate) static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{E000}[a-z]+[0-9a-f]{32}\u{E001}").unwrap());

/// Generate a fresh token tagged with `kind` (lowercase ASCII letters).
///
/// The token contains no Markdown punctuation, so no inline or block
/// pattern can match inside it.
pub(crate) fn new_token(kind: &str) -> String {
    format!(
        "{}{}{}{}",
        TOKEN_OPEN,
        kind,
        Uuid::new_v4().simple(),
        TOKEN_CLOSE
    )
}

/// Check whether `text` is exactly one placeholder token.
pub(crate) fn is_token(text: &str) -> bool {
    TOKEN_PATTERN
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}
