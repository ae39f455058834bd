//! Parsing options and configuration.

use std::sync::Arc;

use super::{LinkPolicy, LinkSanitizer};

/// Options for parsing Markdown into a document tree.
///
/// Link and image targets are checked by the built-in [`LinkPolicy`] unless
/// a custom validator is installed with [`with_sanitizer`]. The
/// `with_image_prefix` and `with_allowed_schemes` helpers adjust the
/// built-in policy in place, so they compose in any order.
///
/// [`with_sanitizer`]: ParseOptions::with_sanitizer
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Built-in scheme allow-list policy
    pub policy: LinkPolicy,

    /// Custom validator that replaces `policy` when set
    custom_sanitizer: Option<Arc<dyn LinkSanitizer>>,

    /// Merge adjacent text nodes that carry identical marks
    pub merge_adjacent_text: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the validator in effect.
    pub fn sanitizer(&self) -> &dyn LinkSanitizer {
        match &self.custom_sanitizer {
            Some(custom) => custom.as_ref(),
            None => &self.policy,
        }
    }

    /// Use a custom link/image validator instead of the built-in policy.
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn LinkSanitizer>) -> Self {
        self.custom_sanitizer = Some(sanitizer);
        self
    }

    /// Replace the built-in policy.
    pub fn with_policy(mut self, policy: LinkPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Prefix relative image paths.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.warn_if_custom("image prefix");
        self.policy = self.policy.with_image_prefix(prefix);
        self
    }

    /// Restrict link targets to the given schemes.
    pub fn with_allowed_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.warn_if_custom("link scheme allow-list");
        self.policy = self.policy.with_link_schemes(schemes);
        self
    }

    /// Enable or disable merging of adjacent text nodes.
    pub fn with_merge_adjacent_text(mut self, merge: bool) -> Self {
        self.merge_adjacent_text = merge;
        self
    }

    fn warn_if_custom(&self, setting: &str) {
        if self.custom_sanitizer.is_some() {
            log::warn!(
                "Custom link sanitizer installed; {} applies to the built-in policy only",
                setting
            );
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            policy: LinkPolicy::default(),
            custom_sanitizer: None,
            merge_adjacent_text: true,
        }
    }
}
