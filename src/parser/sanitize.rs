//! Link and image target validation.
//!
//! The parser never creates a link mark or image node whose target has not
//! passed through a [`LinkSanitizer`]. The default [`LinkPolicy`] allows a
//! short list of schemes and treats anything without a scheme as a
//! relative reference.

use std::fmt;

/// Validates and normalizes link and image targets.
///
/// Returning `None` rejects the target; the parser then degrades the
/// construct to visible literal text.
pub trait LinkSanitizer: fmt::Debug + Send + Sync {
    /// Validate a link `href`.
    fn sanitize_href(&self, href: &str) -> Option<String>;

    /// Validate an image `src`, optionally rewriting local paths.
    fn sanitize_image_src(&self, src: &str) -> Option<String>;
}

/// Image MIME subtypes accepted in `data:` URLs.
const DATA_IMAGE_TYPES: &[&str] = &["png", "gif", "jpeg", "jpg", "webp"];

/// Scheme allow-list policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    /// Schemes allowed in link targets (lowercase)
    pub link_schemes: Vec<String>,

    /// Schemes allowed in image sources (lowercase)
    pub image_schemes: Vec<String>,

    /// Accept base64 `data:image/...` sources for raster formats
    pub allow_data_images: bool,

    /// Prefix prepended to relative image paths (e.g., "/assets/")
    pub image_path_prefix: Option<String>,
}

impl LinkPolicy {
    /// Create the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the link scheme allow-list.
    pub fn with_link_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.link_schemes = schemes
            .into_iter()
            .map(|s| s.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    /// Replace the image scheme allow-list.
    pub fn with_image_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.image_schemes = schemes
            .into_iter()
            .map(|s| s.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    /// Enable or disable `data:image/...` sources.
    pub fn with_data_images(mut self, allow: bool) -> Self {
        self.allow_data_images = allow;
        self
    }

    /// Set the prefix for relative image paths.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.image_path_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    fn rewrite_local_path(&self, src: &str) -> String {
        match &self.image_path_prefix {
            Some(prefix) if !src.starts_with('/') && !src.starts_with(prefix.as_str()) => {
                format!("{}{}", prefix, src.trim_start_matches("./"))
            }
            _ => src.to_string(),
        }
    }
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            link_schemes: vec!["http".into(), "https".into(), "mailto".into()],
            image_schemes: vec!["http".into(), "https".into()],
            allow_data_images: true,
            image_path_prefix: None,
        }
    }
}

impl LinkSanitizer for LinkPolicy {
    fn sanitize_href(&self, href: &str) -> Option<String> {
        let target = clean_target(href)?;
        match scheme_of(target) {
            Some(scheme) if self.link_schemes.contains(&scheme) => Some(target.to_string()),
            Some(_) => None,
            None => Some(target.to_string()),
        }
    }

    fn sanitize_image_src(&self, src: &str) -> Option<String> {
        let target = clean_target(src)?;
        match scheme_of(target) {
            Some(scheme) if scheme == "data" => {
                (self.allow_data_images && is_raster_data_url(target)).then(|| target.to_string())
            }
            Some(scheme) if self.image_schemes.contains(&scheme) => Some(target.to_string()),
            Some(_) => None,
            None if target.starts_with("//") => Some(target.to_string()),
            None => Some(self.rewrite_local_path(target)),
        }
    }
}

/// Trim a target and reject empty ones or ones hiding control characters.
fn clean_target(raw: &str) -> Option<&str> {
    let target = raw.trim();
    if target.is_empty() || target.chars().any(char::is_control) {
        return None;
    }
    Some(target)
}

/// Extract the lowercase scheme of a target, if it has one.
///
/// A colon only introduces a scheme when no path, query or fragment
/// delimiter precedes it, so `./a:b` stays relative.
fn scheme_of(target: &str) -> Option<String> {
    let colon = target.find(':')?;
    let candidate = &target[..colon];
    if candidate.contains(['/', '?', '#']) {
        return None;
    }
    Some(candidate.trim().to_ascii_lowercase())
}

fn is_raster_data_url(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    DATA_IMAGE_TYPES
        .iter()
        .any(|kind| lower.starts_with(&format!("data:image/{};base64,", kind)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_link_schemes() {
        let policy = LinkPolicy::default();
        assert_eq!(
            policy.sanitize_href("https://example.com"),
            Some("https://example.com".to_string())
        );
        assert!(policy.sanitize_href("HTTP://EXAMPLE.COM").is_some());
        assert!(policy.sanitize_href("mailto:someone@example.com").is_some());
    }

    #[test]
    fn test_rejected_link_schemes() {
        let policy = LinkPolicy::default();
        assert_eq!(policy.sanitize_href("javascript:alert(1)"), None);
        assert_eq!(policy.sanitize_href("JavaScript:alert(1)"), None);
        assert_eq!(policy.sanitize_href("java\tscript:alert(1)"), None);
        assert_eq!(policy.sanitize_href("vbscript:msgbox"), None);
        assert_eq!(policy.sanitize_href("data:text/html,hi"), None);
        assert_eq!(policy.sanitize_href("   "), None);
    }

    #[test]
    fn test_relative_links_allowed() {
        let policy = LinkPolicy::default();
        assert!(policy.sanitize_href("/docs/intro").is_some());
        assert!(policy.sanitize_href("#section").is_some());
        assert!(policy.sanitize_href("./notes:draft.md").is_some());
    }

    #[test]
    fn test_image_sources() {
        let policy = LinkPolicy::default();
        assert!(policy.sanitize_image_src("https://example.com/a.png").is_some());
        assert!(policy
            .sanitize_image_src("data:image/png;base64,iVBORw0KGgo=")
            .is_some());
        assert_eq!(policy.sanitize_image_src("data:image/svg+xml;base64,PHN2Zz4="), None);
        assert_eq!(policy.sanitize_image_src("javascript:alert(1)"), None);
        assert_eq!(policy.sanitize_image_src("mailto:a@b.c"), None);
    }

    #[test]
    fn test_image_prefix_rewriting() {
        let policy = LinkPolicy::default().with_image_prefix("/assets/");
        assert_eq!(
            policy.sanitize_image_src("diagram.png"),
            Some("/assets/diagram.png".to_string())
        );
        assert_eq!(
            policy.sanitize_image_src("./diagram.png"),
            Some("/assets/diagram.png".to_string())
        );
        assert_eq!(
            policy.sanitize_image_src("/assets/diagram.png"),
            Some("/assets/diagram.png".to_string())
        );
        assert_eq!(
            policy.sanitize_image_src("https://cdn.example.com/x.png"),
            Some("https://cdn.example.com/x.png".to_string())
        );
    }

    #[test]
    fn test_custom_schemes() {
        let policy = LinkPolicy::default().with_link_schemes(["https", "ftp"]);
        assert!(policy.sanitize_href("ftp://files.example.com").is_some());
        assert_eq!(policy.sanitize_href("http://example.com"), None);
    }
}
