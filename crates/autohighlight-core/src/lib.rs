//! autohighlight-core: Backend-independent data types and algorithms.
//!
//! This crate provides the geometry (Point, Ctm, BBox, Quad), the highlight
//! palette, search-terms file parsing, and the glyph-level text search used
//! by pdf-autohighlight. It does not read PDF files itself.

pub mod error;
pub mod geometry;
pub mod palette;
pub mod search;
pub mod searches;
pub mod text;

pub use error::{PdfError, SearchSpecError, UnknownColor};
pub use geometry::{BBox, Ctm, Point, Quad};
pub use palette::HighlightColor;
pub use search::{MatchMode, SearchMatch, SearchOptions, build_pattern, search_chars, search_layout};
pub use searches::{SearchSpec, parse_searches, read_searches};
pub use text::{Char, LayoutOptions, Slot, TextLayout};
