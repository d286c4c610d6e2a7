//! Search-terms file parsing.
//!
//! The file holds one `term=color` pair per line. Blank lines are skipped and
//! the first invalid entry rejects the whole file.

use std::path::Path;

use crate::error::SearchSpecError;
use crate::palette::HighlightColor;

/// A term to highlight and the color to highlight it with.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSpec {
    pub term: String,
    pub color: HighlightColor,
}

impl SearchSpec {
    pub fn new(term: impl Into<String>, color: HighlightColor) -> Self {
        Self {
            term: term.into(),
            color,
        }
    }
}

impl std::fmt::Display for SearchSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.term, self.color)
    }
}

/// Parse the contents of a search-terms file, preserving line order.
///
/// Each line is trimmed and split at its last `=`, so terms may themselves
/// contain `=`. Both halves are trimmed.
pub fn parse_searches(input: &str) -> Result<Vec<SearchSpec>, SearchSpecError> {
    let mut searches = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some((term, color)) = line.rsplit_once('=') else {
            return Err(SearchSpecError::MalformedLine {
                line: line_no,
                content: line.to_string(),
            });
        };
        let term = term.trim();
        let color = color.trim();

        if term.is_empty() {
            return Err(SearchSpecError::MalformedLine {
                line: line_no,
                content: line.to_string(),
            });
        }

        let Some(color) = HighlightColor::from_name(color) else {
            return Err(SearchSpecError::UnknownColor {
                line: line_no,
                term: term.to_string(),
                color: color.to_string(),
            });
        };

        searches.push(SearchSpec::new(term, color));
    }

    Ok(searches)
}

/// Read and parse a search-terms file.
pub fn read_searches(path: impl AsRef<Path>) -> Result<Vec<SearchSpec>, SearchSpecError> {
    let input = std::fs::read_to_string(path.as_ref())?;
    parse_searches(&input)
}
