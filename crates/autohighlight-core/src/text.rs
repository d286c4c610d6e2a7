//! Glyphs and the searchable text built from them.

use crate::geometry::{Point, Quad};

/// A single glyph shown on a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// Unicode text of the glyph. Ligatures may carry several characters.
    pub text: String,
    /// Font name with any subset prefix removed.
    pub fontname: String,
    /// Effective font size in user space units, after the text and graphics
    /// transforms are applied.
    pub size: f64,
    /// Region covered by the glyph, from descent to ascent.
    pub quad: Quad,
}

impl Char {
    /// Whether the glyph only shows whitespace (or nothing at all).
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    /// Unit vector pointing "up" the glyph, from descent to ascent.
    fn up(&self) -> (f64, f64) {
        let (dx, dy) = self.quad.ll.to(self.quad.ul);
        normalize(dx, dy).unwrap_or((0.0, 1.0))
    }

    /// Unit vector along the baseline, in writing direction.
    fn advance_dir(&self) -> (f64, f64) {
        let (ux, uy) = self.up();
        (uy, -ux)
    }
}

fn normalize(dx: f64, dy: f64) -> Option<(f64, f64)> {
    let len = dx.hypot(dy);
    if len > f64::EPSILON {
        Some((dx / len, dy / len))
    } else {
        None
    }
}

fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

fn offset(from: Point, to: Point) -> (f64, f64) {
    from.to(to)
}

/// Tolerances used when turning glyphs into lines of text.
///
/// Both are fractions of the previous glyph's font size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOptions {
    /// Maximum baseline shift before a glyph starts a new line.
    pub line_tolerance: f64,
    /// Minimum gap between two glyphs that reads as a word space.
    pub space_tolerance: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 0.5,
            space_tolerance: 0.15,
        }
    }
}

/// What a byte of the layout text stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Part of the text of the glyph at this index.
    Glyph(usize),
    /// A space or line break inserted between glyphs.
    Separator,
}

/// The searchable text of a page.
///
/// `text` is the concatenation of glyph texts in content-stream order, with
/// `' '` inserted for visual gaps and `'\n'` between lines. `slots[i]` tells
/// which glyph produced byte `i` of `text`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    pub text: String,
    pub slots: Vec<Slot>,
    /// Line number of every glyph, indexed like the input chars.
    pub lines: Vec<usize>,
}

impl TextLayout {
    pub fn build(chars: &[Char], options: &LayoutOptions) -> TextLayout {
        let mut layout = TextLayout {
            text: String::new(),
            slots: Vec::new(),
            lines: Vec::with_capacity(chars.len()),
        };
        let mut line = 0;

        for (i, ch) in chars.iter().enumerate() {
            if i > 0 {
                let prev = &chars[i - 1];
                match classify_gap(prev, ch, options) {
                    Gap::NewLine => {
                        line += 1;
                        layout.push_separator('\n');
                    }
                    Gap::Space if !prev.is_whitespace() && !ch.is_whitespace() => {
                        layout.push_separator(' ');
                    }
                    Gap::Space | Gap::None => {}
                }
            }
            layout.lines.push(line);
            layout.push_glyph(i, &ch.text);
        }

        layout
    }

    fn push_separator(&mut self, sep: char) {
        self.text.push(sep);
        self.slots.push(Slot::Separator);
    }

    fn push_glyph(&mut self, index: usize, text: &str) {
        self.text.push_str(text);
        self.slots
            .extend(std::iter::repeat_n(Slot::Glyph(index), text.len()));
    }

    /// Glyph indices covered by a byte range of `text`, in order, without
    /// duplicates. Separators are skipped.
    pub fn glyphs_in(&self, start: usize, end: usize) -> Vec<usize> {
        let end = end.min(self.slots.len());
        let mut indices: Vec<usize> = Vec::new();
        for slot in self.slots.get(start..end).unwrap_or(&[]) {
            if let Slot::Glyph(idx) = *slot {
                if indices.last() != Some(&idx) {
                    indices.push(idx);
                }
            }
        }
        indices
    }

    /// Number of lines the layout contains.
    pub fn line_count(&self) -> usize {
        self.lines.last().map_or(0, |l| l + 1)
    }
}

enum Gap {
    None,
    Space,
    NewLine,
}

fn classify_gap(prev: &Char, cur: &Char, options: &LayoutOptions) -> Gap {
    let size = if prev.size > 0.0 { prev.size } else { cur.size };
    let up = prev.up();
    let dir = prev.advance_dir();

    let from_start = offset(prev.quad.ll, cur.quad.ll);
    let baseline_shift = dot(from_start, up).abs();
    if baseline_shift > options.line_tolerance * size {
        return Gap::NewLine;
    }
    if dot(from_start, dir) < -options.space_tolerance * size {
        return Gap::NewLine;
    }

    let gap = dot(offset(prev.quad.lr, cur.quad.ll), dir);
    if gap >= options.space_tolerance * size {
        Gap::Space
    } else {
        Gap::None
    }
}
