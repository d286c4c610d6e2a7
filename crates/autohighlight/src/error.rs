//! Errors returned by the highlighting facade.

use std::path::PathBuf;

use autohighlight_core::SearchSpecError;
use autohighlight_parse::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighlightError {
    /// The document could not be loaded, annotated or saved.
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("page index {index} out of range (0..{count})")]
    PageOutOfRange { index: usize, count: usize },

    /// The search-terms file is invalid.
    #[error("invalid search terms: {0}")]
    Searches(#[from] SearchSpecError),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HighlightError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HighlightError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autohighlight_core::PdfError;

    #[test]
    fn backend_error_is_transparent() {
        let err: HighlightError = BackendError::Core(PdfError::PasswordRequired).into();
        assert_eq!(err.to_string(), "PDF is encrypted and requires a password");
    }

    #[test]
    fn page_out_of_range_message() {
        let err = HighlightError::PageOutOfRange { index: 4, count: 2 };
        assert_eq!(err.to_string(), "page index 4 out of range (0..2)");
    }

    #[test]
    fn io_error_names_path() {
        let err = HighlightError::io(
            "/tmp/out",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "/tmp/out: denied");
    }

    #[test]
    fn searches_error_wraps_line_message() {
        let err: HighlightError = SearchSpecError::MalformedLine {
            line: 2,
            content: "Foo".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid search terms: line 2: expected 'term=color', got 'Foo'"
        );
    }
}
