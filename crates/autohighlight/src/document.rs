//! Top-level PDF document type for searching and annotating.

use std::path::Path;

use autohighlight_core::{HighlightColor, Quad};
use autohighlight_parse::{LopdfDocument, SaveOptions, extract_page_chars};
use autohighlight_parse::lopdf::ObjectId;

use crate::error::HighlightError;
use crate::page::Page;

/// Iterator over pages of a document, extracting each page on demand.
///
/// Created by [`Document::pages`].
pub struct PagesIter<'a> {
    doc: &'a Document,
    current: usize,
    count: usize,
}

impl Iterator for PagesIter<'_> {
    type Item = Result<Page, HighlightError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.count {
            return None;
        }
        let result = self.doc.page(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PagesIter<'_> {}

/// A PDF document opened for highlighting.
///
/// Pages are extracted from the current state of the document, so
/// highlights added earlier never change the glyphs a later search sees.
///
/// # Example
///
/// ```ignore
/// let mut doc = Document::open_file("report.pdf")?;
/// let page = doc.page(0)?;
/// for m in page.search_for("Foo", &SearchOptions::default()) {
///     doc.add_highlight(0, &m.quads, HighlightColor::Yellow)?;
/// }
/// doc.save("out/report.pdf", &SaveOptions::default())?;
/// ```
#[derive(Debug)]
pub struct Document {
    doc: LopdfDocument,
}

impl Document {
    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid PDF or the document is
    /// encrypted.
    pub fn open(bytes: &[u8]) -> Result<Self, HighlightError> {
        Ok(Self {
            doc: LopdfDocument::open(bytes)?,
        })
    }

    /// Open a PDF document from a file path.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, HighlightError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| HighlightError::io(path, e))?;
        Self::open(&bytes)
    }

    /// Wrap an already loaded lopdf document.
    pub fn from_lopdf(doc: autohighlight_parse::lopdf::Document) -> Result<Self, HighlightError> {
        Ok(Self {
            doc: LopdfDocument::from_document(doc)?,
        })
    }

    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    /// Extract the page at `index` (0-based).
    pub fn page(&self, index: usize) -> Result<Page, HighlightError> {
        self.check_index(index)?;
        let chars = extract_page_chars(&self.doc, index)?;
        Ok(Page::new(index, chars))
    }

    /// Iterate over all pages in order.
    pub fn pages(&self) -> PagesIter<'_> {
        PagesIter {
            doc: self,
            current: 0,
            count: self.page_count(),
        }
    }

    /// Add one highlight annotation covering `quads` on page `page_index`.
    pub fn add_highlight(
        &mut self,
        page_index: usize,
        quads: &[Quad],
        color: HighlightColor,
    ) -> Result<ObjectId, HighlightError> {
        self.check_index(page_index)?;
        let page_id = self.doc.page_id(page_index)?;
        let id = autohighlight_parse::add_highlight(self.doc.inner_mut(), page_id, quads, color)?;
        Ok(id)
    }

    /// Write the document to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<(), HighlightError> {
        autohighlight_parse::save(self.doc.inner_mut(), path, options)?;
        Ok(())
    }

    /// Serialize the document into memory.
    pub fn to_bytes(&mut self, options: &SaveOptions) -> Result<Vec<u8>, HighlightError> {
        Ok(autohighlight_parse::save_to_bytes(self.doc.inner_mut(), options)?)
    }

    /// The underlying lopdf document.
    pub fn lopdf(&self) -> &autohighlight_parse::lopdf::Document {
        self.doc.inner()
    }

    fn check_index(&self, index: usize) -> Result<(), HighlightError> {
        let count = self.page_count();
        if index >= count {
            return Err(HighlightError::PageOutOfRange { index, count });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pdf;
    use autohighlight_core::{BBox, SearchOptions};
    use autohighlight_parse::lopdf::Object;

    #[test]
    fn open_reports_page_count() {
        let doc = Document::open(&test_pdf::pdf_with_pages(&["", ""])).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages().len(), 2);
    }

    #[test]
    fn open_garbage_is_error() {
        assert!(Document::open(b"not a pdf").is_err());
    }

    #[test]
    fn open_file_missing_names_path() {
        let err = Document::open_file("/nonexistent/input.pdf").unwrap_err();
        assert!(matches!(err, HighlightError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/input.pdf"));
    }

    #[test]
    fn page_out_of_range() {
        let doc = Document::open(&test_pdf::pdf_with_pages(&[""])).unwrap();
        let err = doc.page(1).unwrap_err();
        assert!(matches!(err, HighlightError::PageOutOfRange { index: 1, count: 1 }));
    }

    #[test]
    fn page_search_finds_text() {
        let doc = Document::open(&test_pdf::pdf_with_pages(&[
            "BT /F1 12 Tf 72 700 Td (see Foo here) Tj ET",
        ]))
        .unwrap();
        let page = doc.page(0).unwrap();
        let matches = page.search_for("Foo", &SearchOptions::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].quads.len(), 1);
    }

    #[test]
    fn kerned_word_gaps_separate_words() {
        let doc = Document::open(&test_pdf::pdf_with_pages(&[
            "BT /F1 12 Tf 72 700 Td [(see)-250(Foo)-250(here)] TJ ET",
            "BT /F1 10 Tf 72 700 Td [(see)-250(Foo)-250(here)] TJ ET",
        ]))
        .unwrap();
        for page in doc.pages() {
            let page = page.unwrap();
            assert_eq!(page.text(&Default::default()), "see Foo here");
            assert_eq!(page.search_for("Foo", &SearchOptions::default()).len(), 1);
        }
    }

    #[test]
    fn pages_iterator_yields_in_order() {
        let doc = Document::open(&test_pdf::pdf_with_pages(&[
            "BT /F1 12 Tf 72 700 Td (one) Tj ET",
            "BT /F1 12 Tf 72 700 Td (two) Tj ET",
        ]))
        .unwrap();
        let texts: Vec<String> = doc
            .pages()
            .map(|p| p.unwrap().text(&Default::default()))
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn add_highlight_and_save_roundtrip() {
        let mut doc = Document::open(&test_pdf::pdf_with_pages(&[""])).unwrap();
        let quad = Quad::from_bbox(&BBox::new(72.0, 697.0, 100.0, 710.0));
        doc.add_highlight(0, &[quad], HighlightColor::Pink).unwrap();

        let bytes = doc.to_bytes(&SaveOptions::default()).unwrap();
        let reopened = autohighlight_parse::lopdf::Document::load_mem(&bytes).unwrap();
        let highlights = test_pdf::highlight_annotations(&reopened);
        assert_eq!(highlights.len(), 1);
        let color: Vec<f32> = highlights[0]
            .get(b"C")
            .and_then(Object::as_array)
            .unwrap()
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(color, vec![1.0, 0.5, 1.0]);
    }

    #[test]
    fn add_highlight_out_of_range() {
        let mut doc = Document::open(&test_pdf::pdf_with_pages(&[""])).unwrap();
        let quad = Quad::from_bbox(&BBox::new(0.0, 0.0, 1.0, 1.0));
        let err = doc.add_highlight(5, &[quad], HighlightColor::Yellow).unwrap_err();
        assert!(matches!(err, HighlightError::PageOutOfRange { .. }));
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let mut doc = Document::open(&test_pdf::pdf_with_pages(&[""])).unwrap();
        doc.save(&path, &SaveOptions::default()).unwrap();
        assert_eq!(Document::open_file(&path).unwrap().page_count(), 1);
    }
}
