//! Character encodings of simple (single-byte) fonts.
//!
//! Resolves the `/Encoding` entry of a font dictionary: one of the named base
//! encodings, optionally patched with a `/Differences` array of glyph names.

use std::collections::HashMap;

use encoding_rs::{MACINTOSH, WINDOWS_1252};
use lopdf::{Dictionary, Object};

use crate::lopdf_backend::{object_to_f64, resolve};

/// Named base encodings for simple fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseEncoding {
    /// `/WinAnsiEncoding` (Windows code page 1252).
    #[default]
    WinAnsi,
    /// `/MacRomanEncoding`.
    MacRoman,
    /// Adobe StandardEncoding, the built-in encoding of most Type1 fonts.
    Standard,
}

impl BaseEncoding {
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"WinAnsiEncoding" => Some(BaseEncoding::WinAnsi),
            b"MacRomanEncoding" | b"MacExpertEncoding" => Some(BaseEncoding::MacRoman),
            b"StandardEncoding" => Some(BaseEncoding::Standard),
            _ => None,
        }
    }

    fn decode(&self, code: u8) -> Option<String> {
        match self {
            BaseEncoding::WinAnsi => decode_with(WINDOWS_1252, code),
            BaseEncoding::MacRoman => decode_with(MACINTOSH, code),
            BaseEncoding::Standard => standard_encoding(code),
        }
    }
}

fn decode_with(encoding: &'static encoding_rs::Encoding, code: u8) -> Option<String> {
    if code < 0x20 {
        return None;
    }
    let bytes = [code];
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// The encoding of a simple font.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleEncoding {
    base: BaseEncoding,
    differences: HashMap<u8, String>,
}

impl SimpleEncoding {
    pub fn new(base: BaseEncoding) -> Self {
        Self {
            base,
            differences: HashMap::new(),
        }
    }

    /// Parse an `/Encoding` value: a base encoding name or an encoding
    /// dictionary with `/BaseEncoding` and `/Differences`.
    ///
    /// `default_base` applies when the entry names no base encoding.
    pub fn from_object(doc: &lopdf::Document, obj: &Object, default_base: BaseEncoding) -> Self {
        match resolve(doc, obj) {
            Object::Name(name) => {
                SimpleEncoding::new(BaseEncoding::from_name(name).unwrap_or(default_base))
            }
            Object::Dictionary(dict) => Self::from_dict(doc, dict, default_base),
            _ => SimpleEncoding::new(default_base),
        }
    }

    fn from_dict(doc: &lopdf::Document, dict: &Dictionary, default_base: BaseEncoding) -> Self {
        let base = dict
            .get(b"BaseEncoding")
            .ok()
            .and_then(|o| resolve(doc, o).as_name().ok())
            .and_then(BaseEncoding::from_name)
            .unwrap_or(default_base);

        let mut encoding = SimpleEncoding::new(base);
        if let Some(Object::Array(items)) = dict.get(b"Differences").ok().map(|o| resolve(doc, o)) {
            encoding.differences = parse_differences(items);
        }
        encoding
    }

    /// Unicode text for a character code, if the encoding defines one.
    pub fn decode(&self, code: u8) -> Option<String> {
        if let Some(name) = self.differences.get(&code) {
            return glyph_name_to_unicode(name);
        }
        self.base.decode(code)
    }
}

/// Parse a `/Differences` array: `[code /name /name ... code /name ...]`.
fn parse_differences(items: &[Object]) -> HashMap<u8, String> {
    let mut map = HashMap::new();
    let mut code: Option<u32> = None;

    for item in items {
        match item {
            Object::Name(name) => {
                if let Some(c) = code {
                    if let Ok(byte) = u8::try_from(c) {
                        map.insert(byte, String::from_utf8_lossy(name).into_owned());
                    }
                    code = Some(c + 1);
                }
            }
            other => {
                if let Ok(n) = object_to_f64(other) {
                    code = (n >= 0.0).then_some(n as u32);
                }
            }
        }
    }

    map
}

/// Map a PostScript glyph name to Unicode text.
///
/// Understands the common Latin names, ligatures, and the `uniXXXX` and
/// `uXXXX[XX]` forms. Suffixes such as `.sc` or `_alt` are ignored.
pub fn glyph_name_to_unicode(name: &str) -> Option<String> {
    let name = name.split(['.', '_']).next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }

    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() >= 4 && hex.len() % 4 == 0 {
            let units: Option<Vec<u16>> = hex
                .as_bytes()
                .chunks(4)
                .map(|c| {
                    std::str::from_utf8(c)
                        .ok()
                        .and_then(|s| u16::from_str_radix(s, 16).ok())
                })
                .collect();
            if let Some(units) = units {
                return Some(String::from_utf16_lossy(&units));
            }
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            if let Some(ch) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                return Some(ch.to_string());
            }
        }
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c.to_string());
        }
    }

    GLYPH_NAMES
        .binary_search_by(|(n, _)| n.cmp(&name))
        .ok()
        .map(|idx| GLYPH_NAMES[idx].1.to_string())
}

fn standard_encoding(code: u8) -> Option<String> {
    match code {
        0x27 => Some("\u{2019}".to_string()),
        0x60 => Some("\u{2018}".to_string()),
        0x20..=0x7E => Some((code as char).to_string()),
        _ => STANDARD_HIGH
            .iter()
            .find(|(c, _)| *c == code)
            .and_then(|(_, name)| glyph_name_to_unicode(name)),
    }
}

/// StandardEncoding above 0x7F, as glyph names.
const STANDARD_HIGH: &[(u8, &str)] = &[
    (0xA1, "exclamdown"),
    (0xA2, "cent"),
    (0xA3, "sterling"),
    (0xA4, "fraction"),
    (0xA5, "yen"),
    (0xA6, "florin"),
    (0xA7, "section"),
    (0xA8, "currency"),
    (0xA9, "quotesingle"),
    (0xAA, "quotedblleft"),
    (0xAB, "guillemotleft"),
    (0xAC, "guilsinglleft"),
    (0xAD, "guilsinglright"),
    (0xAE, "fi"),
    (0xAF, "fl"),
    (0xB1, "endash"),
    (0xB2, "dagger"),
    (0xB3, "daggerdbl"),
    (0xB4, "periodcentered"),
    (0xB6, "paragraph"),
    (0xB7, "bullet"),
    (0xB8, "quotesinglbase"),
    (0xB9, "quotedblbase"),
    (0xBA, "quotedblright"),
    (0xBB, "guillemotright"),
    (0xBC, "ellipsis"),
    (0xBD, "perthousand"),
    (0xBF, "questiondown"),
    (0xC1, "grave"),
    (0xC2, "acute"),
    (0xC3, "circumflex"),
    (0xC4, "tilde"),
    (0xC5, "macron"),
    (0xC6, "breve"),
    (0xC7, "dotaccent"),
    (0xC8, "dieresis"),
    (0xCA, "ring"),
    (0xCB, "cedilla"),
    (0xCD, "hungarumlaut"),
    (0xCE, "ogonek"),
    (0xCF, "caron"),
    (0xD0, "emdash"),
    (0xE1, "AE"),
    (0xE3, "ordfeminine"),
    (0xE8, "Lslash"),
    (0xE9, "Oslash"),
    (0xEA, "OE"),
    (0xEB, "ordmasculine"),
    (0xF1, "ae"),
    (0xF5, "dotlessi"),
    (0xF8, "lslash"),
    (0xF9, "oslash"),
    (0xFA, "oe"),
    (0xFB, "germandbls"),
];

/// Glyph names that are not a single letter, sorted by name for binary search.
#[rustfmt::skip]
const GLYPH_NAMES: &[(&str, &str)] = &[
    ("AE", "Æ"), ("Aacute", "Á"), ("Acircumflex", "Â"), ("Adieresis", "Ä"),
    ("Agrave", "À"), ("Aring", "Å"), ("Atilde", "Ã"), ("Ccedilla", "Ç"),
    ("Eacute", "É"), ("Ecircumflex", "Ê"), ("Edieresis", "Ë"), ("Egrave", "È"),
    ("Euro", "€"), ("Iacute", "Í"), ("Icircumflex", "Î"), ("Idieresis", "Ï"),
    ("Igrave", "Ì"), ("Lslash", "Ł"), ("Ntilde", "Ñ"), ("OE", "Œ"),
    ("Oacute", "Ó"), ("Ocircumflex", "Ô"), ("Odieresis", "Ö"), ("Ograve", "Ò"),
    ("Oslash", "Ø"), ("Otilde", "Õ"), ("Scaron", "Š"), ("Uacute", "Ú"),
    ("Ucircumflex", "Û"), ("Udieresis", "Ü"), ("Ugrave", "Ù"), ("Yacute", "Ý"),
    ("Ydieresis", "Ÿ"), ("Zcaron", "Ž"),
    ("aacute", "á"), ("acircumflex", "â"), ("acute", "´"), ("adieresis", "ä"),
    ("ae", "æ"), ("agrave", "à"), ("ampersand", "&"), ("aring", "å"),
    ("asciicircum", "^"), ("asciitilde", "~"), ("asterisk", "*"), ("at", "@"),
    ("atilde", "ã"), ("backslash", "\\"), ("bar", "|"), ("braceleft", "{"),
    ("braceright", "}"), ("bracketleft", "["), ("bracketright", "]"), ("breve", "˘"),
    ("brokenbar", "¦"), ("bullet", "•"), ("caron", "ˇ"), ("ccedilla", "ç"),
    ("cedilla", "¸"), ("cent", "¢"), ("circumflex", "ˆ"), ("colon", ":"),
    ("comma", ","), ("copyright", "©"), ("currency", "¤"), ("dagger", "†"),
    ("daggerdbl", "‡"), ("degree", "°"), ("dieresis", "¨"), ("divide", "÷"),
    ("dollar", "$"), ("dotaccent", "˙"), ("dotlessi", "ı"), ("eacute", "é"),
    ("ecircumflex", "ê"), ("edieresis", "ë"), ("egrave", "è"), ("eight", "8"),
    ("ellipsis", "…"), ("emdash", "—"), ("endash", "–"), ("equal", "="),
    ("exclam", "!"), ("exclamdown", "¡"), ("ff", "ff"), ("ffi", "ffi"),
    ("ffl", "ffl"), ("fi", "fi"), ("five", "5"), ("fl", "fl"),
    ("florin", "ƒ"), ("four", "4"), ("fraction", "⁄"), ("germandbls", "ß"),
    ("grave", "`"), ("greater", ">"), ("guillemotleft", "«"), ("guillemotright", "»"),
    ("guilsinglleft", "‹"), ("guilsinglright", "›"), ("hungarumlaut", "˝"), ("hyphen", "-"),
    ("iacute", "í"), ("icircumflex", "î"), ("idieresis", "ï"), ("igrave", "ì"),
    ("less", "<"), ("logicalnot", "¬"), ("lslash", "ł"), ("macron", "¯"),
    ("minus", "−"), ("mu", "µ"), ("multiply", "×"), ("nbspace", "\u{a0}"),
    ("nine", "9"), ("ntilde", "ñ"), ("numbersign", "#"), ("oacute", "ó"),
    ("ocircumflex", "ô"), ("odieresis", "ö"), ("oe", "œ"), ("ogonek", "˛"),
    ("ograve", "ò"), ("one", "1"), ("ordfeminine", "ª"), ("ordmasculine", "º"),
    ("oslash", "ø"), ("otilde", "õ"), ("paragraph", "¶"), ("parenleft", "("),
    ("parenright", ")"), ("percent", "%"), ("period", "."), ("periodcentered", "·"),
    ("perthousand", "‰"), ("plus", "+"), ("plusminus", "±"), ("question", "?"),
    ("questiondown", "¿"), ("quotedbl", "\""), ("quotedblbase", "„"), ("quotedblleft", "“"),
    ("quotedblright", "”"), ("quoteleft", "‘"), ("quoteright", "’"), ("quotesinglbase", "‚"),
    ("quotesingle", "'"), ("registered", "®"), ("ring", "˚"), ("scaron", "š"),
    ("section", "§"), ("semicolon", ";"), ("seven", "7"), ("six", "6"),
    ("slash", "/"), ("space", " "), ("sterling", "£"), ("three", "3"),
    ("tilde", "˜"), ("trademark", "™"), ("two", "2"), ("uacute", "ú"),
    ("ucircumflex", "û"), ("udieresis", "ü"), ("ugrave", "ù"), ("underscore", "_"),
    ("yacute", "ý"), ("ydieresis", "ÿ"), ("yen", "¥"), ("zcaron", "ž"),
    ("zero", "0"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn glyph_table_is_sorted() {
        for pair in GLYPH_NAMES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn winansi_decodes_ascii_and_high_codes() {
        let enc = SimpleEncoding::new(BaseEncoding::WinAnsi);
        assert_eq!(enc.decode(b'F').as_deref(), Some("F"));
        assert_eq!(enc.decode(0x80).as_deref(), Some("€"));
        assert_eq!(enc.decode(0x93).as_deref(), Some("“"));
        assert_eq!(enc.decode(0xE9).as_deref(), Some("é"));
        assert_eq!(enc.decode(0x05), None);
    }

    #[test]
    fn macroman_differs_from_winansi() {
        let enc = SimpleEncoding::new(BaseEncoding::MacRoman);
        assert_eq!(enc.decode(0x8E).as_deref(), Some("é"));
        assert_eq!(enc.decode(b'a').as_deref(), Some("a"));
    }

    #[test]
    fn standard_encoding_quotes_and_ligatures() {
        let enc = SimpleEncoding::new(BaseEncoding::Standard);
        assert_eq!(enc.decode(0x27).as_deref(), Some("’"));
        assert_eq!(enc.decode(0xAE).as_deref(), Some("fi"));
        assert_eq!(enc.decode(b'Z').as_deref(), Some("Z"));
        assert_eq!(enc.decode(0xB0), None);
    }

    #[test]
    fn glyph_names() {
        assert_eq!(glyph_name_to_unicode("A").as_deref(), Some("A"));
        assert_eq!(glyph_name_to_unicode("space").as_deref(), Some(" "));
        assert_eq!(glyph_name_to_unicode("uni00E9").as_deref(), Some("é"));
        assert_eq!(glyph_name_to_unicode("uni00660069").as_deref(), Some("fi"));
        assert_eq!(glyph_name_to_unicode("u1F600").as_deref(), Some("😀"));
        assert_eq!(glyph_name_to_unicode("a.sc").as_deref(), Some("a"));
        assert_eq!(glyph_name_to_unicode("g123"), None);
    }

    #[test]
    fn differences_override_base() {
        let doc = lopdf::Document::with_version("1.5");
        let obj = Object::Dictionary(dictionary! {
            "Type" => "Encoding",
            "BaseEncoding" => "WinAnsiEncoding",
            "Differences" => vec![
                Object::Integer(65),
                Object::Name(b"B".to_vec()),
                Object::Name(b"C".to_vec()),
                Object::Integer(1),
                Object::Name(b"fi".to_vec()),
            ],
        });
        let enc = SimpleEncoding::from_object(&doc, &obj, BaseEncoding::Standard);
        assert_eq!(enc.decode(65).as_deref(), Some("B"));
        assert_eq!(enc.decode(66).as_deref(), Some("C"));
        assert_eq!(enc.decode(67).as_deref(), Some("C"));
        assert_eq!(enc.decode(1).as_deref(), Some("fi"));
        assert_eq!(enc.decode(0x80).as_deref(), Some("€"));
    }

    #[test]
    fn encoding_name_object() {
        let doc = lopdf::Document::with_version("1.5");
        let obj = Object::Name(b"MacRomanEncoding".to_vec());
        let enc = SimpleEncoding::from_object(&doc, &obj, BaseEncoding::WinAnsi);
        assert_eq!(enc, SimpleEncoding::new(BaseEncoding::MacRoman));
    }

    #[test]
    fn unknown_encoding_falls_back_to_default() {
        let doc = lopdf::Document::with_version("1.5");
        let obj = Object::Name(b"Identity-H".to_vec());
        let enc = SimpleEncoding::from_object(&doc, &obj, BaseEncoding::Standard);
        assert_eq!(enc, SimpleEncoding::new(BaseEncoding::Standard));
    }
}
