//! Markup detection heuristics.
//!
//! A cheap pre-check a host runs on pasted text to decide whether a full
//! parse is worth attempting. False negatives leave plain text plain; false
//! positives only cost a wasted parse.

use once_cell::sync::Lazy;
use regex::RegexSet;

/// A Markdown construct recognized by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupFeature {
    /// `# Heading`
    Heading,
    /// Triple-backtick fence
    CodeFence,
    /// Bullet or numbered list marker
    ListMarker,
    /// `> quote`
    Quote,
    /// `**bold**`
    Bold,
    /// `[text](target)`
    Link,
    /// Pipe table header separator
    Table,
}

impl MarkupFeature {
    const ALL: [MarkupFeature; 7] = [
        MarkupFeature::Heading,
        MarkupFeature::CodeFence,
        MarkupFeature::ListMarker,
        MarkupFeature::Quote,
        MarkupFeature::Bold,
        MarkupFeature::Link,
        MarkupFeature::Table,
    ];

    /// Get a short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            MarkupFeature::Heading => "heading",
            MarkupFeature::CodeFence => "code fence",
            MarkupFeature::ListMarker => "list",
            MarkupFeature::Quote => "quote",
            MarkupFeature::Bold => "bold",
            MarkupFeature::Link => "link",
            MarkupFeature::Table => "table",
        }
    }
}

impl std::fmt::Display for MarkupFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One pattern per feature, in `MarkupFeature::ALL` order.
static FEATURE_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?m)^\s{0,3}#{1,6}\s+\S",
        r"(?m)^\s*```",
        r"(?m)^\s*(?:[-*+]|\d+\.)\s+\S",
        r"(?m)^\s*>",
        r"\*\*[^*\n]+\*\*",
        r"\[[^\]\n]+\]\([^)\s]+\)",
        r"(?m)^\s*\|?\s*:?-{3,}:?\s*\|",
    ])
    .unwrap()
});

/// List the Markdown features found in `text`.
pub fn detect_features(text: &str) -> Vec<MarkupFeature> {
    FEATURE_PATTERNS
        .matches(text)
        .into_iter()
        .map(|index| MarkupFeature::ALL[index])
        .collect()
}

/// Check whether `text` looks like Markdown.
///
/// # Example
///
/// ```
/// use mdtree::is_likely_markup;
///
/// assert!(is_likely_markup("# Title\n\nBody"));
/// assert!(!is_likely_markup("just a sentence."));
/// ```
pub fn is_likely_markup(text: &str) -> bool {
    FEATURE_PATTERNS.is_match(text)
}
