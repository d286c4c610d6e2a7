//! Text search with position: find a term on a page and return one quad per
//! line the match covers.

use regex::Regex;

use crate::geometry::{BBox, Quad};
use crate::text::{Char, LayoutOptions, TextLayout};

/// How a term must be delimited to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MatchMode {
    /// Whitespace (or a line break) on both sides. The start and end of the
    /// page are not whitespace, and neither is punctuation.
    #[default]
    Padded,
    /// Word boundaries on both sides: any non-word character, or the start or
    /// end of the page.
    Word,
}

/// Options controlling text search behavior.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOptions {
    /// Delimiting rule for matches (default: [`MatchMode::Padded`]).
    pub mode: MatchMode,
    /// Whether the search is case-sensitive (default: `false`).
    pub case_sensitive: bool,
    /// Line and space detection used to build the page text.
    pub layout: LayoutOptions,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::Padded,
            case_sensitive: false,
            layout: LayoutOptions::default(),
        }
    }
}

/// A single occurrence of a term on a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchMatch {
    /// The matched text as it appears on the page.
    pub text: String,
    /// Page index (0-based).
    pub page_index: usize,
    /// One quad per text line the match covers, in reading order.
    pub quads: Vec<Quad>,
}

impl SearchMatch {
    /// Union of all quads.
    pub fn rect(&self) -> Option<BBox> {
        self.quads
            .iter()
            .map(Quad::rect)
            .reduce(|acc, r| acc.union(&r))
    }
}

/// Compile the pattern for `term`. Runs of whitespace inside the term match
/// any run of whitespace on the page, including line breaks.
pub fn build_pattern(term: &str, options: &SearchOptions) -> Result<Regex, regex::Error> {
    let literal = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let flags = if options.case_sensitive { "" } else { "(?i)" };
    let pattern = match options.mode {
        MatchMode::Padded => format!(r"{flags}\s({literal})\s"),
        MatchMode::Word => format!(r"{flags}(?:^|\W)({literal})(?:\W|$)"),
    };
    Regex::new(&pattern)
}

/// Search for `term` in a sequence of glyphs.
///
/// Builds the page text with [`TextLayout`] and delegates to
/// [`search_layout`]. Returns an empty vector for an empty term or page.
pub fn search_chars(
    chars: &[Char],
    term: &str,
    options: &SearchOptions,
    page_index: usize,
) -> Vec<SearchMatch> {
    if chars.is_empty() || term.trim().is_empty() {
        return Vec::new();
    }
    let layout = TextLayout::build(chars, &options.layout);
    search_layout(&layout, chars, term, options, page_index)
}

/// Search a prebuilt layout. `chars` must be the glyphs the layout was built
/// from.
pub fn search_layout(
    layout: &TextLayout,
    chars: &[Char],
    term: &str,
    options: &SearchOptions,
    page_index: usize,
) -> Vec<SearchMatch> {
    if layout.text.is_empty() || term.trim().is_empty() {
        return Vec::new();
    }
    let re = match build_pattern(term, options) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let haystack = layout.text.as_str();
    let mut results = Vec::new();
    let mut pos = 0;

    while pos < haystack.len() {
        let Some(caps) = re.captures_at(haystack, pos) else {
            break;
        };
        let Some(m) = caps.get(1) else {
            break;
        };
        // Resume right after the term so its trailing delimiter can open the
        // next match.
        pos = if m.end() > m.start() {
            m.end()
        } else {
            m.end() + 1
        };

        let indices = layout.glyphs_in(m.start(), m.end());
        let quads = line_quads(layout, chars, &indices);
        if quads.is_empty() {
            continue;
        }
        results.push(SearchMatch {
            text: m.as_str().to_string(),
            page_index,
            quads,
        });
    }

    results
}

/// Merge the quads of consecutive glyphs on the same line.
fn line_quads(layout: &TextLayout, chars: &[Char], indices: &[usize]) -> Vec<Quad> {
    let mut quads: Vec<Quad> = Vec::new();
    let mut current_line = None;

    for &idx in indices {
        let Some(ch) = chars.get(idx) else {
            continue;
        };
        let line = layout.lines.get(idx).copied();
        match quads.last_mut() {
            Some(last) if current_line == line => *last = last.extend(&ch.quad),
            _ => {
                quads.push(ch.quad);
                current_line = line;
            }
        }
    }

    quads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn make_char(text: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Char {
        Char {
            text: text.to_string(),
            fontname: "TestFont".to_string(),
            size: 12.0,
            quad: Quad::from_bbox(&BBox::new(x0, y0, x1, y1)),
        }
    }

    /// Lay out `text` on one line starting at `x`, 6pt per character, with
    /// real space glyphs.
    fn line(text: &str, x: f64, y: f64) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x0 = x + i as f64 * 6.0;
                make_char(&c.to_string(), x0, y - 3.0, x0 + 6.0, y + 9.0)
            })
            .collect()
    }

    #[test]
    fn search_options_defaults() {
        let opts = SearchOptions::default();
        assert_eq!(opts.mode, MatchMode::Padded);
        assert!(!opts.case_sensitive);
    }

    #[test]
    fn padded_search_finds_term_between_spaces() {
        let chars = line("say Foo now", 10.0, 100.0);
        let matches = search_chars(&chars, "Foo", &SearchOptions::default(), 0);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "Foo");
        assert_eq!(matches[0].page_index, 0);
        // Highlight covers "Foo" only, not the padding spaces.
        assert_eq!(matches[0].quads.len(), 1);
        assert_eq!(
            matches[0].quads[0].rect(),
            BBox::new(34.0, 97.0, 52.0, 109.0)
        );
    }

    #[test]
    fn padded_search_finds_adjacent_repeats() {
        let chars = line("x Foo Foo Foo x", 0.0, 100.0);
        let matches = search_chars(&chars, "Foo", &SearchOptions::default(), 2);
        assert_eq!(matches.len(), 3);
        assert!(matches.iter().all(|m| m.page_index == 2));
        let starts: Vec<f64> = matches.iter().map(|m| m.quads[0].ll.x).collect();
        assert_eq!(starts, vec![12.0, 36.0, 60.0]);
    }

    #[test]
    fn padded_search_misses_page_edges_and_punctuation() {
        let chars = line("Foo, x Foo. Foo", 0.0, 100.0);
        let matches = search_chars(&chars, "Foo", &SearchOptions::default(), 0);
        assert!(matches.is_empty());
    }

    #[test]
    fn word_search_accepts_punctuation_and_page_edges() {
        let chars = line("Foo, x Foo. Foo", 0.0, 100.0);
        let opts = SearchOptions {
            mode: MatchMode::Word,
            ..Default::default()
        };
        let matches = search_chars(&chars, "Foo", &opts, 0);
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn word_search_rejects_partial_words() {
        let chars = line("Food foo", 0.0, 100.0);
        let opts = SearchOptions {
            mode: MatchMode::Word,
            ..Default::default()
        };
        let matches = search_chars(&chars, "foo", &opts, 0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].quads[0].ll.x, 30.0);
    }

    #[test]
    fn case_insensitive_by_default() {
        let chars = line("a FOO b", 0.0, 100.0);
        let matches = search_chars(&chars, "foo", &SearchOptions::default(), 0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "FOO");
    }

    #[test]
    fn case_sensitive_no_match() {
        let chars = line("a FOO b", 0.0, 100.0);
        let opts = SearchOptions {
            case_sensitive: true,
            ..Default::default()
        };
        assert!(search_chars(&chars, "foo", &opts, 0).is_empty());
    }

    #[test]
    fn term_is_matched_literally() {
        let chars = line("a f.o b fxo c", 0.0, 100.0);
        let matches = search_chars(&chars, "f.o", &SearchOptions::default(), 0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "f.o");
    }

    #[test]
    fn multi_line_match_yields_quad_per_line() {
        let mut chars = line("see big", 10.0, 700.0);
        chars.extend(line("cat here", 10.0, 686.0));
        let matches = search_chars(&chars, "big cat", &SearchOptions::default(), 0);

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.text, "big\ncat");
        assert_eq!(m.quads.len(), 2);
        assert_eq!(m.quads[0].rect(), BBox::new(34.0, 697.0, 52.0, 709.0));
        assert_eq!(m.quads[1].rect(), BBox::new(10.0, 683.0, 28.0, 695.0));
        assert_eq!(
            m.rect(),
            Some(BBox::new(10.0, 683.0, 52.0, 709.0))
        );
    }

    #[test]
    fn line_break_counts_as_padding() {
        let mut chars = line("top Foo", 10.0, 700.0);
        chars.extend(line("next", 10.0, 686.0));
        let matches = search_chars(&chars, "Foo", &SearchOptions::default(), 0);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn synthetic_space_counts_as_padding() {
        let mut chars = line("a", 0.0, 100.0);
        chars.extend(line("Foo", 20.0, 100.0));
        chars.extend(line("b", 50.0, 100.0));
        let matches = search_chars(&chars, "Foo", &SearchOptions::default(), 0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].quads[0].ll.x, 20.0);
    }

    #[test]
    fn rotated_match_keeps_rotated_quad() {
        // Three glyphs running upwards along x = 40..52.
        let glyph = |text: &str, y0: f64| Char {
            text: text.to_string(),
            fontname: "TestFont".to_string(),
            size: 12.0,
            quad: Quad::new(
                Point::new(40.0, y0),
                Point::new(40.0, y0 + 6.0),
                Point::new(52.0, y0),
                Point::new(52.0, y0 + 6.0),
            ),
        };
        let chars = vec![
            glyph(" ", 94.0),
            glyph("a", 100.0),
            glyph("b", 106.0),
            glyph(" ", 112.0),
        ];
        let matches = search_chars(&chars, "ab", &SearchOptions::default(), 0);
        assert_eq!(matches.len(), 1);
        let q = matches[0].quads[0];
        assert_eq!(q.ul, Point::new(40.0, 100.0));
        assert_eq!(q.lr, Point::new(52.0, 112.0));
    }

    #[test]
    fn empty_term_or_page_yields_nothing() {
        let chars = line("a b", 0.0, 100.0);
        assert!(search_chars(&chars, "", &SearchOptions::default(), 0).is_empty());
        assert!(search_chars(&chars, "   ", &SearchOptions::default(), 0).is_empty());
        assert!(search_chars(&[], "a", &SearchOptions::default(), 0).is_empty());
    }

    #[test]
    fn results_are_stable_across_runs() {
        let chars = line("x Foo y Foo z", 0.0, 100.0);
        let first = search_chars(&chars, "Foo", &SearchOptions::default(), 0);
        let second = search_chars(&chars, "Foo", &SearchOptions::default(), 0);
        assert_eq!(first, second);
    }
}
