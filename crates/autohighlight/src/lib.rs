//! autohighlight: find search terms in PDF documents and highlight them.
//!
//! This is the public API facade of pdf-autohighlight. It re-exports types
//! from autohighlight-core and uses autohighlight-parse for reading,
//! annotating and saving documents.
//!
//! # Architecture
//!
//! - **autohighlight-core**: geometry, palette, search-terms parsing, text search
//! - **autohighlight-parse**: lopdf backend, glyph extraction, annotation and saving
//! - **autohighlight** (this crate): [`Document`], [`Page`], [`highlight_document`]
//!   and the directory-level [`Pipeline`]

mod document;
mod error;
mod highlight;
mod page;
mod pipeline;

pub use autohighlight_core;
pub use autohighlight_core::{
    BBox, Char, HighlightColor, LayoutOptions, MatchMode, PdfError, Point, Quad, SearchMatch,
    SearchOptions, SearchSpec, SearchSpecError, parse_searches, read_searches,
};
pub use autohighlight_parse;
pub use autohighlight_parse::SaveOptions;
pub use document::{Document, PagesIter};
pub use error::HighlightError;
pub use highlight::{DocumentReport, HighlightRecord, highlight_document};
pub use page::Page;
pub use pipeline::{DocumentOutcome, Outcome, Pipeline, RunReport};
