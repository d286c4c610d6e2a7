//! Saving annotated documents.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::BackendError;

/// Cleanup applied to a document before it is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Drop unreachable objects and renumber the rest.
    pub garbage: bool,
    /// Flate-compress streams that are stored uncompressed.
    pub deflate: bool,
    /// Remove zero-length streams.
    pub clean: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            garbage: true,
            deflate: true,
            clean: true,
        }
    }
}

impl SaveOptions {
    /// Serialize the document as-is.
    pub fn none() -> Self {
        Self {
            garbage: false,
            deflate: false,
            clean: false,
        }
    }
}

fn prepare(doc: &mut lopdf::Document, options: &SaveOptions) {
    if options.clean {
        let removed = doc.delete_zero_length_streams();
        debug!(count = removed.len(), "removed zero-length streams");
    }
    if options.garbage {
        let pruned = doc.prune_objects();
        doc.renumber_objects();
        debug!(count = pruned.len(), "pruned unreachable objects");
    }
    if options.deflate {
        doc.compress();
    }
}

/// Write the document to `writer`.
pub fn save_to<W: Write>(
    doc: &mut lopdf::Document,
    writer: &mut W,
    options: &SaveOptions,
) -> Result<(), BackendError> {
    prepare(doc, options);
    doc.save_to(writer)
        .map_err(|e| BackendError::Write(format!("failed to serialize PDF: {e}")))
}

/// Write the document to a file at `path`, replacing any existing file.
pub fn save(
    doc: &mut lopdf::Document,
    path: impl AsRef<Path>,
    options: &SaveOptions,
) -> Result<(), BackendError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    save_to(doc, &mut writer, options)?;
    writer.flush()?;
    debug!(path = %path.display(), "wrote PDF");
    Ok(())
}

/// Serialize the document into memory.
pub fn save_to_bytes(
    doc: &mut lopdf::Document,
    options: &SaveOptions,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    save_to(doc, &mut buf, options)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lopdf_backend::{LopdfDocument, test_pdf};
    use lopdf::{Object, Stream};

    #[test]
    fn default_options_enable_everything() {
        let options = SaveOptions::default();
        assert!(options.garbage && options.deflate && options.clean);
        assert_eq!(
            SaveOptions::none(),
            SaveOptions {
                garbage: false,
                deflate: false,
                clean: false
            }
        );
    }

    #[test]
    fn saved_bytes_reopen_with_same_pages() {
        let mut doc = test_pdf::with_pages(&["BT /F1 12 Tf 72 700 Td (Foo) Tj ET", ""]);
        let bytes = save_to_bytes(&mut doc, &SaveOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let reopened = LopdfDocument::open(&bytes).unwrap();
        assert_eq!(reopened.page_count(), 2);
    }

    fn has_orphan(doc: &lopdf::Document) -> bool {
        doc.objects
            .values()
            .any(|o| matches!(o, Object::String(s, _) if s.as_slice() == b"orphan"))
    }

    fn saved_with_orphan(options: &SaveOptions) -> lopdf::Document {
        let mut doc = test_pdf::with_pages(&["BT ET"]);
        doc.add_object(Object::String(b"orphan".to_vec(), lopdf::StringFormat::Literal));
        let bytes = save_to_bytes(&mut doc, options).unwrap();
        lopdf::Document::load_mem(&bytes).unwrap()
    }

    #[test]
    fn garbage_drops_unreachable_objects() {
        let pruned = saved_with_orphan(&SaveOptions::default());
        assert!(!has_orphan(&pruned));

        let kept = saved_with_orphan(&SaveOptions::none());
        assert!(pruned.objects.len() < kept.objects.len());
    }

    #[test]
    fn none_keeps_unreachable_objects() {
        assert!(has_orphan(&saved_with_orphan(&SaveOptions::none())));
    }

    #[test]
    fn deflate_compresses_content_streams() {
        let content = "BT /F1 12 Tf 72 700 Td (Foo Foo Foo Foo Foo Foo Foo Foo) Tj ET ".repeat(20);
        let mut doc = test_pdf::with_pages(&[content.as_str()]);
        let bytes = save_to_bytes(&mut doc, &SaveOptions::default()).unwrap();

        let reopened = lopdf::Document::load_mem(&bytes).unwrap();
        let compressed = reopened.objects.values().any(|obj| match obj {
            Object::Stream(s) => s.dict.get(b"Filter").is_ok(),
            _ => false,
        });
        assert!(compressed);

        let page = LopdfDocument::from_document(reopened).unwrap();
        assert_eq!(page.page_content(0).unwrap(), content.as_bytes());
    }

    #[test]
    fn clean_removes_empty_streams() {
        let mut doc = test_pdf::with_pages(&["BT ET"]);
        let empty = doc.add_object(Stream::new(lopdf::Dictionary::new(), Vec::new()));
        let options = SaveOptions {
            clean: true,
            ..SaveOptions::none()
        };
        let bytes = save_to_bytes(&mut doc, &options).unwrap();
        let reopened = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(reopened.get_object(empty).is_err());
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let mut doc = test_pdf::with_pages(&["BT ET"]);
        save(&mut doc, &path, &SaveOptions::default()).unwrap();

        let reopened = LopdfDocument::open_file(&path).unwrap();
        assert_eq!(reopened.page_count(), 1);
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdf");
        let mut doc = test_pdf::with_pages(&["BT ET"]);
        let err = save(&mut doc, &path, &SaveOptions::default()).unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }
}
