//! Error types for pdf-autohighlight.
//!
//! Provides [`PdfError`] for fatal errors that stop processing of a document,
//! and [`SearchSpecError`] for problems in the search-terms file, which stop
//! the whole run before any document is touched.

use std::fmt;

use crate::palette::HighlightColor;

/// Fatal error types for PDF processing.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading or writing PDF data.
    IoError(String),
    /// Error resolving font or encoding information.
    FontError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// The PDF is encrypted and requires a password to open.
    PasswordRequired,
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// A color name that is not part of the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown color '{}' (expected one of: {})",
            self.0,
            HighlightColor::valid_names()
        )
    }
}

impl std::error::Error for UnknownColor {}

/// Error reading or validating the search-terms file.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchSpecError {
    /// The file could not be read.
    Io(String),
    /// A non-blank line is not of the form `term=color`, or its term is empty.
    MalformedLine { line: usize, content: String },
    /// The color on a line is not a palette name.
    UnknownColor {
        line: usize,
        term: String,
        color: String,
    },
}

impl fmt::Display for SearchSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSpecError::Io(msg) => write!(f, "failed to read search terms: {msg}"),
            SearchSpecError::MalformedLine { line, content } => write!(
                f,
                "line {line}: expected 'term=color', got '{content}'"
            ),
            SearchSpecError::UnknownColor { line, term, color } => write!(
                f,
                "line {line}: invalid color for term: {term} = {color} (expected one of: {})",
                HighlightColor::valid_names()
            ),
        }
    }
}

impl std::error::Error for SearchSpecError {}

impl From<std::io::Error> for SearchSpecError {
    fn from(err: std::io::Error) -> Self {
        SearchSpecError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_error_display() {
        assert_eq!(
            PdfError::ParseError("bad xref".to_string()).to_string(),
            "parse error: bad xref"
        );
        assert_eq!(
            PdfError::PasswordRequired.to_string(),
            "PDF is encrypted and requires a password"
        );
        assert_eq!(PdfError::Other("boom".to_string()).to_string(), "boom");
    }

    #[test]
    fn pdf_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pdf");
        let err: PdfError = io.into();
        assert!(matches!(err, PdfError::IoError(ref m) if m.contains("missing.pdf")));
    }

    #[test]
    fn search_spec_error_display_names_line_and_term() {
        let err = SearchSpecError::UnknownColor {
            line: 3,
            term: "Foo".to_string(),
            color: "magenta".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("line 3: invalid color for term: Foo = magenta"));
        assert!(msg.contains("purple"));
    }

    #[test]
    fn malformed_line_display() {
        let err = SearchSpecError::MalformedLine {
            line: 1,
            content: "no separator".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "line 1: expected 'term=color', got 'no separator'"
        );
    }
}
