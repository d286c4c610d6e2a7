//! Font loading: glyph widths, vertical metrics and Unicode mapping.
//!
//! Only what is needed to position glyphs and recover their text is read;
//! glyph outlines are never touched.

use std::collections::HashMap;

use lopdf::{Dictionary, Object};
use tracing::{debug, warn};

use crate::cmap::ToUnicodeCMap;
use crate::encoding::{BaseEncoding, SimpleEncoding};
use crate::lopdf_backend::{decode_content_stream, get_dict, get_name, get_number, object_to_f64, resolve};
use crate::standard_fonts::{self, StandardFont};

/// Ascent when neither the font descriptor nor a standard font supplies one.
const DEFAULT_ASCENT: f64 = 750.0;

/// Descent when neither the font descriptor nor a standard font supplies one.
const DEFAULT_DESCENT: f64 = -250.0;

/// Width of glyphs without any width information.
const DEFAULT_WIDTH: f64 = 500.0;

/// Default width of CIDFonts (`/DW`).
const DEFAULT_CID_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
enum FontKind {
    /// Type1, TrueType, MMType1 and Type3: one byte per code.
    Simple,
    /// Type0: two bytes per code.
    Composite,
}

#[derive(Debug, Clone)]
enum Widths {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing_width: f64,
        standard: Option<&'static StandardFont>,
    },
    Cid {
        widths: HashMap<u32, f64>,
        default_width: f64,
    },
}

/// One decoded glyph of a shown string.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Character code as read from the string.
    pub code: u32,
    /// Unicode text, U+FFFD when the font gives no mapping.
    pub text: String,
    /// Horizontal advance in 1/1000 text space units.
    pub width: f64,
    /// Whether word spacing (`Tw`) applies, i.e. a single-byte code 32.
    pub is_word_space: bool,
}

/// A font resource prepared for text extraction.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// Base font name without subset prefix.
    pub name: String,
    kind: FontKind,
    widths: Widths,
    ascent: f64,
    descent: f64,
    /// Scale from glyph space to 1/1000 text space (only Type3 differs from 1).
    width_scale: f64,
    to_unicode: Option<ToUnicodeCMap>,
    encoding: SimpleEncoding,
    vertical: bool,
}

impl LoadedFont {
    /// Metrics used when a font resource is missing or unreadable.
    pub fn fallback(name: &str) -> Self {
        let standard = standard_fonts::lookup(name);
        LoadedFont {
            name: strip_subset_prefix(name).to_string(),
            kind: FontKind::Simple,
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing_width: DEFAULT_WIDTH,
                standard,
            },
            ascent: standard.map_or(DEFAULT_ASCENT, |f| f.ascent),
            descent: standard.map_or(DEFAULT_DESCENT, |f| f.descent),
            width_scale: 1.0,
            to_unicode: None,
            encoding: SimpleEncoding::default(),
            vertical: false,
        }
    }

    /// Load a font dictionary.
    pub fn load(doc: &lopdf::Document, font_dict: &Dictionary) -> Self {
        let base_font = get_name(doc, font_dict, b"BaseFont")
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_default();
        let subtype = get_name(doc, font_dict, b"Subtype").unwrap_or(b"Type1");
        let name = strip_subset_prefix(&base_font).to_string();

        let to_unicode = load_to_unicode(doc, font_dict, &name);

        if subtype == b"Type0" {
            return Self::load_composite(doc, font_dict, name, to_unicode);
        }

        let standard = standard_fonts::lookup(&name);
        let descriptor = get_dict(doc, font_dict, b"FontDescriptor");

        let first_char = get_number(doc, font_dict, b"FirstChar").map_or(0, |v| v.max(0.0) as u32);
        let widths = number_array(doc, font_dict, b"Widths");
        let missing_width = descriptor
            .and_then(|d| get_number(doc, d, b"MissingWidth"))
            .unwrap_or_else(|| {
                if widths.is_empty() && standard.is_none() {
                    DEFAULT_WIDTH
                } else {
                    0.0
                }
            });

        let (mut ascent, mut descent) = vertical_metrics(doc, descriptor, standard);

        let mut width_scale = 1.0;
        if subtype == b"Type3" {
            let matrix = number_array(doc, font_dict, b"FontMatrix");
            if matrix.len() == 6 {
                width_scale = matrix[0] * 1000.0;
                let bbox = number_array(doc, font_dict, b"FontBBox");
                if bbox.len() == 4 && bbox[3] > bbox[1] {
                    ascent = bbox[3] * matrix[3] * 1000.0;
                    descent = bbox[1] * matrix[3] * 1000.0;
                }
            }
        }

        let default_base = if subtype == b"Type1" || subtype == b"MMType1" {
            BaseEncoding::Standard
        } else {
            BaseEncoding::WinAnsi
        };
        let encoding = match font_dict.get(b"Encoding") {
            Ok(obj) => SimpleEncoding::from_object(doc, obj, default_base),
            Err(_) => SimpleEncoding::new(default_base),
        };

        LoadedFont {
            name,
            kind: FontKind::Simple,
            widths: Widths::Simple {
                first_char,
                widths,
                missing_width,
                standard,
            },
            ascent,
            descent,
            width_scale,
            to_unicode,
            encoding,
            vertical: false,
        }
    }

    fn load_composite(
        doc: &lopdf::Document,
        font_dict: &Dictionary,
        name: String,
        to_unicode: Option<ToUnicodeCMap>,
    ) -> Self {
        let encoding_name = get_name(doc, font_dict, b"Encoding").unwrap_or(b"Identity-H");
        let vertical = encoding_name.ends_with(b"-V");
        if vertical {
            warn!(font = %name, "vertical writing is not supported, treating text as horizontal");
        }

        let descendant = font_dict
            .get(b"DescendantFonts")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| arr.first())
            .and_then(|o| resolve(doc, o).as_dict().ok());

        let (widths, default_width, descriptor) = match descendant {
            Some(cid_font) => (
                cid_font
                    .get(b"W")
                    .ok()
                    .map(|o| resolve(doc, o))
                    .and_then(|o| o.as_array().ok())
                    .map(|arr| parse_cid_widths(doc, arr))
                    .unwrap_or_default(),
                get_number(doc, cid_font, b"DW").unwrap_or(DEFAULT_CID_WIDTH),
                get_dict(doc, cid_font, b"FontDescriptor"),
            ),
            None => {
                debug!(font = %name, "Type0 font without descendant font");
                (HashMap::new(), DEFAULT_CID_WIDTH, None)
            }
        };

        let (ascent, descent) = vertical_metrics(doc, descriptor, None);

        LoadedFont {
            name,
            kind: FontKind::Composite,
            widths: Widths::Cid {
                widths,
                default_width,
            },
            ascent,
            descent,
            width_scale: 1.0,
            to_unicode,
            encoding: SimpleEncoding::default(),
            vertical,
        }
    }

    /// Ascent in 1/1000 text space units.
    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    /// Descent in 1/1000 text space units (negative).
    pub fn descent(&self) -> f64 {
        self.descent
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// Advance width of a code in 1/1000 text space units.
    pub fn width(&self, code: u32) -> f64 {
        let raw = match &self.widths {
            Widths::Simple {
                first_char,
                widths,
                missing_width,
                standard,
            } => {
                let explicit = code
                    .checked_sub(*first_char)
                    .and_then(|i| widths.get(i as usize))
                    .copied();
                match (explicit, standard) {
                    (Some(w), _) => w,
                    (None, Some(font)) if widths.is_empty() => font.width(code),
                    (None, _) => *missing_width,
                }
            }
            Widths::Cid {
                widths,
                default_width,
            } => widths.get(&code).copied().unwrap_or(*default_width),
        };
        raw * self.width_scale
    }

    /// Unicode text for a code.
    pub fn unicode(&self, code: u32) -> String {
        if let Some(text) = self.to_unicode.as_ref().and_then(|c| c.lookup(code)) {
            return text.to_string();
        }
        if self.kind == FontKind::Simple {
            if let Some(text) = u8::try_from(code).ok().and_then(|b| self.encoding.decode(b)) {
                return text;
            }
        }
        "\u{FFFD}".to_string()
    }

    /// Split a shown string into glyphs.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        match self.kind {
            FontKind::Simple => bytes
                .iter()
                .map(|&b| {
                    let code = u32::from(b);
                    Glyph {
                        code,
                        text: self.unicode(code),
                        width: self.width(code),
                        is_word_space: b == b' ',
                    }
                })
                .collect(),
            FontKind::Composite => bytes
                .chunks(2)
                .map(|pair| {
                    let code = pair
                        .iter()
                        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                    Glyph {
                        code,
                        text: self.unicode(code),
                        width: self.width(code),
                        is_word_space: false,
                    }
                })
                .collect(),
        }
    }
}

/// Remove a `ABCDEF+` subset tag from a font name.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

fn load_to_unicode(doc: &lopdf::Document, font_dict: &Dictionary, name: &str) -> Option<ToUnicodeCMap> {
    let obj = font_dict.get(b"ToUnicode").ok()?;
    let stream = resolve(doc, obj).as_stream().ok()?;
    let data = match decode_content_stream(stream) {
        Ok(data) => data,
        Err(e) => {
            warn!(font = %name, error = %e, "failed to decode /ToUnicode stream");
            return None;
        }
    };
    match ToUnicodeCMap::parse(&data) {
        Ok(cmap) => Some(cmap),
        Err(e) => {
            warn!(font = %name, error = %e, "ignoring malformed /ToUnicode CMap");
            None
        }
    }
}

fn vertical_metrics(
    doc: &lopdf::Document,
    descriptor: Option<&Dictionary>,
    standard: Option<&'static StandardFont>,
) -> (f64, f64) {
    let ascent = descriptor
        .and_then(|d| get_number(doc, d, b"Ascent"))
        .filter(|a| *a > 0.0);
    let descent = descriptor
        .and_then(|d| get_number(doc, d, b"Descent"))
        .filter(|d| *d != 0.0)
        .map(|d| -d.abs());

    (
        ascent.unwrap_or_else(|| standard.map_or(DEFAULT_ASCENT, |f| f.ascent)),
        descent.unwrap_or_else(|| standard.map_or(DEFAULT_DESCENT, |f| f.descent)),
    )
}

fn number_array(doc: &lopdf::Document, dict: &Dictionary, key: &[u8]) -> Vec<f64> {
    dict.get(key)
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|arr| {
            arr.iter()
                .map(|o| object_to_f64(resolve(doc, o)).unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a CIDFont `/W` array: `c [w1 w2 ...]` and `c_first c_last w` runs.
fn parse_cid_widths(doc: &lopdf::Document, items: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;

    while i < items.len() {
        let Ok(first) = object_to_f64(resolve(doc, &items[i])) else {
            i += 1;
            continue;
        };
        let first = first.max(0.0) as u32;

        match items.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Ok(w) = object_to_f64(resolve(doc, w)) {
                        widths.insert(first + offset as u32, w);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let last = object_to_f64(last).map_or(first, |v| v.max(0.0) as u32);
                let width = items
                    .get(i + 2)
                    .and_then(|o| object_to_f64(resolve(doc, o)).ok());
                if let Some(width) = width {
                    // Cap absurd ranges from broken files.
                    for cid in first..=last.min(first.saturating_add(0xFFFF)) {
                        widths.insert(cid, width);
                    }
                }
                i += 3;
            }
            None => break,
        }
    }

    widths
}
