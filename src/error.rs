//! Error types for mdtree library.

use std::io;
use thiserror::Error;

/// Result type alias for mdtree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the edges of the conversion core.
///
/// Parsing and serialization themselves never fail: malformed or unsafe
/// input degrades to literal text instead. Errors only surface from I/O,
/// JSON interchange, and the asynchronous pipeline boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization of a document tree failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON value was valid but did not describe a document.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Error during rendering (Markdown, HTML, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// The parse pipeline panicked or its task was cancelled.
    #[error("Conversion pipeline failed: {0}")]
    Pipeline(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Pipeline("task panicked".to_string());
        assert_eq!(err.to_string(), "Conversion pipeline failed: task panicked");

        let err = Error::InvalidDocument("root is not a doc".to_string());
        assert_eq!(err.to_string(), "Invalid document: root is not a doc");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_message_variants() {
        let errors = [
            Error::InvalidDocument("root".to_string()),
            Error::Render("html".to_string()),
            Error::Pipeline("cancelled".to_string()),
        ];
        for err in &errors {
            let message = match err {
                Error::InvalidDocument(m) | Error::Render(m) | Error::Pipeline(m) => m,
                Error::Io(_) | Error::Json(_) => unreachable!(),
            };
            assert!(err.to_string().ends_with(message.as_str()));
        }
    }
}
