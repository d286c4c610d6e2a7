//! Metrics for the standard 14 fonts that PDFs may use without embedding.
//!
//! Widths (1/1000 em) cover the printable ASCII range of WinAnsiEncoding and
//! come from the Adobe AFM files. Codes outside that range use the font's
//! typical width, which is close enough to place a highlight.

/// Built-in metrics for one standard font.
#[derive(Debug)]
pub struct StandardFont {
    pub name: &'static str,
    widths: &'static [u16; 95],
    default_width: u16,
    pub ascent: f64,
    pub descent: f64,
}

impl StandardFont {
    /// Glyph width for a single-byte code, in 1/1000 em.
    pub fn width(&self, code: u32) -> f64 {
        let width = match code {
            32..=126 => self.widths[(code - 32) as usize],
            _ => self.default_width,
        };
        f64::from(width)
    }
}

/// Find the metrics for a base font name.
///
/// Exact standard names match first; other names fall back by family
/// (`Arial` and `Helvetica*` to Helvetica, `Times*` to Times, `Courier*` to
/// Courier), which covers the common non-embedded substitutes.
pub fn lookup(base_font: &str) -> Option<&'static StandardFont> {
    let lower = base_font.to_ascii_lowercase();
    let bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");

    if lower.starts_with("courier") {
        Some(&COURIER)
    } else if lower.starts_with("helvetica") || lower.starts_with("arial") {
        Some(if bold { &HELVETICA_BOLD } else { &HELVETICA })
    } else if lower.starts_with("times") {
        Some(if bold { &TIMES_BOLD } else { &TIMES_ROMAN })
    } else {
        None
    }
}

static HELVETICA: StandardFont = StandardFont {
    name: "Helvetica",
    widths: &HELVETICA_WIDTHS,
    default_width: 556,
    ascent: 718.0,
    descent: -207.0,
};

static HELVETICA_BOLD: StandardFont = StandardFont {
    name: "Helvetica-Bold",
    widths: &HELVETICA_BOLD_WIDTHS,
    default_width: 611,
    ascent: 718.0,
    descent: -207.0,
};

static TIMES_ROMAN: StandardFont = StandardFont {
    name: "Times-Roman",
    widths: &TIMES_ROMAN_WIDTHS,
    default_width: 500,
    ascent: 683.0,
    descent: -217.0,
};

static TIMES_BOLD: StandardFont = StandardFont {
    name: "Times-Bold",
    widths: &TIMES_BOLD_WIDTHS,
    default_width: 500,
    ascent: 676.0,
    descent: -205.0,
};

static COURIER: StandardFont = StandardFont {
    name: "Courier",
    widths: &[600; 95],
    default_width: 600,
    ascent: 629.0,
    descent: -157.0,
};

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_known_widths() {
        let font = lookup("Helvetica").unwrap();
        assert_eq!(font.width(u32::from(b' ')), 278.0);
        assert_eq!(font.width(u32::from(b'F')), 611.0);
        assert_eq!(font.width(u32::from(b'o')), 556.0);
        assert_eq!(font.width(u32::from(b'W')), 944.0);
    }

    #[test]
    fn times_known_widths() {
        let font = lookup("Times-Roman").unwrap();
        assert_eq!(font.width(u32::from(b'F')), 556.0);
        assert_eq!(font.width(u32::from(b'i')), 278.0);
    }

    #[test]
    fn courier_is_monospaced() {
        let font = lookup("Courier-BoldOblique").unwrap();
        assert_eq!(font.name, "Courier");
        assert!((0..256).all(|code| font.width(code) == 600.0));
    }

    #[test]
    fn family_fallbacks() {
        assert_eq!(lookup("Helvetica-Oblique").unwrap().name, "Helvetica");
        assert_eq!(lookup("Helvetica-BoldOblique").unwrap().name, "Helvetica-Bold");
        assert_eq!(lookup("Arial,Bold").unwrap().name, "Helvetica-Bold");
        assert_eq!(lookup("TimesNewRomanPSMT").unwrap().name, "Times-Roman");
        assert_eq!(lookup("Times-BoldItalic").unwrap().name, "Times-Bold");
    }

    #[test]
    fn unknown_font_returns_none() {
        assert!(lookup("Garamond").is_none());
        assert!(lookup("Symbol").is_none());
    }

    #[test]
    fn codes_outside_ascii_use_default_width() {
        let font = lookup("Helvetica").unwrap();
        assert_eq!(font.width(0xE9), 556.0);
        assert_eq!(font.width(0x05), 556.0);
    }

    #[test]
    fn ascent_above_descent() {
        for name in ["Helvetica", "Helvetica-Bold", "Times-Roman", "Times-Bold", "Courier"] {
            let font = lookup(name).unwrap();
            assert!(font.ascent > 0.0 && font.descent < 0.0, "{name}");
        }
    }
}
