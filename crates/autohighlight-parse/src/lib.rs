//! autohighlight-parse: lopdf backend for pdf-autohighlight.
//!
//! Loads documents with [`lopdf`], positions every shown glyph by
//! interpreting page content streams, writes highlight annotations and saves
//! the result. It depends on autohighlight-core for shared data types.

pub mod annotation;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font;
pub mod interpreter;
pub mod lopdf_backend;
pub mod standard_fonts;
pub mod text_state;
pub mod writer;

pub use annotation::add_highlight;
pub use autohighlight_core;
pub use lopdf;
pub use error::BackendError;
pub use font::LoadedFont;
pub use interpreter::{MAX_FORM_DEPTH, extract_page_chars};
pub use lopdf_backend::LopdfDocument;
pub use writer::{SaveOptions, save, save_to, save_to_bytes};
