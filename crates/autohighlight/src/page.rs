//! Page type for searching the text of a PDF page.

use autohighlight_core::{Char, LayoutOptions, SearchMatch, SearchOptions, TextLayout, search_chars, search_layout};

/// A single page from a PDF document.
///
/// Holds the glyphs extracted from the page's content stream. Constructed by
/// [`Document::page`](crate::Document::page).
#[derive(Debug, Clone)]
pub struct Page {
    /// Page index (0-based).
    index: usize,
    chars: Vec<Char>,
}

impl Page {
    pub fn new(index: usize, chars: Vec<Char>) -> Self {
        Self { index, chars }
    }

    /// Returns the page index (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the glyphs of this page in content-stream order.
    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Returns the searchable text of the page, one line per text line.
    pub fn text(&self, options: &LayoutOptions) -> String {
        TextLayout::build(&self.chars, options).text
    }

    /// Find every occurrence of `term` on the page.
    ///
    /// Each match carries one quad per line it spans.
    pub fn search_for(&self, term: &str, options: &SearchOptions) -> Vec<SearchMatch> {
        search_chars(&self.chars, term, options, self.index)
    }

    /// Search for several terms over one shared text layout.
    ///
    /// Results are returned in the order of `terms`.
    pub fn search_all<'t>(
        &self,
        terms: impl IntoIterator<Item = &'t str>,
        options: &SearchOptions,
    ) -> Vec<Vec<SearchMatch>> {
        let layout = TextLayout::build(&self.chars, &options.layout);
        terms
            .into_iter()
            .map(|term| search_layout(&layout, &self.chars, term, options, self.index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autohighlight_core::{BBox, MatchMode, Quad};

    /// Lay out `text` as 10pt glyphs, 5pt wide, on one baseline.
    fn line(text: &str, x: f64, y: f64) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x0 = x + i as f64 * 5.0;
                Char {
                    text: c.to_string(),
                    fontname: "Helvetica".to_string(),
                    size: 10.0,
                    quad: Quad::from_bbox(&BBox::new(x0, y - 2.0, x0 + 5.0, y + 7.0)),
                }
            })
            .collect()
    }

    #[test]
    fn accessors() {
        let page = Page::new(3, line("ab", 0.0, 0.0));
        assert_eq!(page.index(), 3);
        assert_eq!(page.chars().len(), 2);
        assert_eq!(page.text(&LayoutOptions::default()), "ab");
    }

    #[test]
    fn search_for_returns_matches_with_page_index() {
        let page = Page::new(1, line("see Foo and Foo here", 72.0, 700.0));
        let matches = page.search_for("foo", &SearchOptions::default());
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.page_index == 1));
        assert_eq!(matches[0].text, "Foo");

        let rect = matches[0].rect().unwrap();
        assert_eq!(rect.x0, 72.0 + 4.0 * 5.0);
        assert_eq!(rect.x1, 72.0 + 7.0 * 5.0);
    }

    #[test]
    fn search_all_preserves_term_order() {
        let page = Page::new(0, line("alpha beta gamma beta end", 0.0, 100.0));
        let options = SearchOptions {
            mode: MatchMode::Word,
            ..Default::default()
        };
        let results = page.search_all(["beta", "alpha", "delta"], &options);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].len(), 2);
        assert_eq!(results[1].len(), 1);
        assert!(results[2].is_empty());
    }

    #[test]
    fn empty_page_has_no_matches() {
        let page = Page::new(0, Vec::new());
        assert!(page.search_for("Foo", &SearchOptions::default()).is_empty());
        assert_eq!(page.text(&LayoutOptions::default()), "");
    }
}
