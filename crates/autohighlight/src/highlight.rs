//! Annotate one document with every configured search term.

use autohighlight_core::{HighlightColor, Quad, SearchOptions, SearchSpec};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::HighlightError;

/// One highlight annotation added to a document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HighlightRecord {
    pub term: String,
    pub color: HighlightColor,
    /// Page index (0-based).
    pub page_index: usize,
    pub quad: Quad,
}

/// What [`highlight_document`] did to a document.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentReport {
    pub pages: usize,
    pub highlights: Vec<HighlightRecord>,
}

impl DocumentReport {
    pub fn highlight_count(&self) -> usize {
        self.highlights.len()
    }

    /// Number of highlights added for `term`.
    pub fn count_for(&self, term: &str) -> usize {
        self.highlights.iter().filter(|h| h.term == term).count()
    }
}

/// Highlight every occurrence of every search term.
///
/// Pages are visited in order and, on each page, terms in the order given.
/// Every quad of every match becomes its own annotation, colored by the
/// term's palette color. A page whose text cannot be extracted is skipped
/// with a warning.
pub fn highlight_document(
    doc: &mut Document,
    searches: &[SearchSpec],
    options: &SearchOptions,
) -> Result<DocumentReport, HighlightError> {
    let mut report = DocumentReport {
        pages: doc.page_count(),
        highlights: Vec::new(),
    };

    for page_index in 0..doc.page_count() {
        let page = match doc.page(page_index) {
            Ok(page) => page,
            Err(HighlightError::Backend(e)) => {
                warn!(page = page_index + 1, error = %e, "skipping page");
                continue;
            }
            Err(e) => return Err(e),
        };

        let results = page.search_all(searches.iter().map(|s| s.term.as_str()), options);
        for (spec, matches) in searches.iter().zip(results) {
            for quad in matches.iter().flat_map(|m| m.quads.iter()) {
                debug!(
                    "Highlighting instance of \"{}\" @ {}:({})",
                    spec.term, page_index, quad
                );
                doc.add_highlight(page_index, std::slice::from_ref(quad), spec.color)?;
                report.highlights.push(HighlightRecord {
                    term: spec.term.clone(),
                    color: spec.color,
                    page_index,
                    quad: *quad,
                });
            }
        }
    }

    Ok(report)
}
