//! Text state for the content stream interpreter.
//!
//! [`TextParams`] holds the parameters that belong to the graphics state and
//! are saved by `q`/`Q`; [`TextMatrices`] holds the text and line matrices of
//! the current `BT`/`ET` object, which `q`/`Q` leave alone.

use std::rc::Rc;

use autohighlight_core::Ctm;

use crate::font::LoadedFont;

/// Text state parameters set by `Tc`, `Tw`, `Tz`, `TL`, `Tf` and `Ts`.
#[derive(Debug, Clone)]
pub struct TextParams {
    /// Character spacing (`Tc`), in unscaled text space units.
    pub char_spacing: f64,
    /// Word spacing (`Tw`), applied to single-byte code 32.
    pub word_spacing: f64,
    /// Horizontal scaling (`Tz`) as a percentage.
    pub h_scaling: f64,
    /// Leading (`TL`).
    pub leading: f64,
    pub font: Option<Rc<LoadedFont>>,
    pub font_size: f64,
    /// Rise (`Ts`).
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font: None,
            font_size: 0.0,
            rise: 0.0,
        }
    }
}

impl TextParams {
    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scale(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// Matrix mapping glyph space (in text space units) to text space:
    /// `[Tfs*Th 0 0 Tfs 0 Trise]`.
    pub fn glyph_matrix(&self) -> Ctm {
        Ctm::new(
            self.font_size * self.h_scale(),
            0.0,
            0.0,
            self.font_size,
            0.0,
            self.rise,
        )
    }
}

/// Text matrix and text line matrix of the current text object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMatrices {
    pub text: Ctm,
    pub line: Ctm,
}

impl TextMatrices {
    /// `BT`: both matrices reset to identity.
    pub fn begin(&mut self) {
        *self = TextMatrices::default();
    }

    /// `Tm`: replace both matrices.
    pub fn set(&mut self, m: Ctm) {
        self.text = m;
        self.line = m;
    }

    /// `Td`: offset the start of the next line from the start of this one.
    pub fn move_line(&mut self, tx: f64, ty: f64) {
        self.line = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, ty).concat(&self.line);
        self.text = self.line;
    }

    /// `T*`: move to the next line using `leading`.
    pub fn next_line(&mut self, leading: f64) {
        self.move_line(0.0, -leading);
    }

    /// Advance the text matrix horizontally after a glyph or `TJ` adjustment.
    pub fn advance(&mut self, tx: f64) {
        self.text = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, 0.0).concat(&self.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_matrix(actual: &Ctm, expected: [f64; 6]) {
        let got = [actual.a, actual.b, actual.c, actual.d, actual.e, actual.f];
        for (g, e) in got.iter().zip(expected) {
            assert!((g - e).abs() < 1e-9, "expected {expected:?}, got {got:?}");
        }
    }

    #[test]
    fn params_defaults() {
        let params = TextParams::default();
        assert_eq!(params.h_scale(), 1.0);
        assert!(params.font.is_none());
    }

    #[test]
    fn glyph_matrix_includes_scaling_and_rise() {
        let params = TextParams {
            font_size: 12.0,
            h_scaling: 50.0,
            rise: 3.0,
            ..Default::default()
        };
        assert_matrix(&params.glyph_matrix(), [6.0, 0.0, 0.0, 12.0, 0.0, 3.0]);
    }

    #[test]
    fn move_line_translates_from_line_start() {
        let mut m = TextMatrices::default();
        m.move_line(72.0, 700.0);
        m.advance(30.0);
        m.move_line(0.0, -14.0);
        assert_matrix(&m.text, [1.0, 0.0, 0.0, 1.0, 72.0, 686.0]);
        assert_eq!(m.text, m.line);
    }

    #[test]
    fn move_line_respects_scaled_matrix() {
        let mut m = TextMatrices::default();
        m.set(Ctm::new(2.0, 0.0, 0.0, 2.0, 10.0, 10.0));
        m.move_line(5.0, 5.0);
        assert_matrix(&m.text, [2.0, 0.0, 0.0, 2.0, 20.0, 20.0]);
    }

    #[test]
    fn next_line_uses_leading() {
        let mut m = TextMatrices::default();
        m.set(Ctm::new(1.0, 0.0, 0.0, 1.0, 72.0, 700.0));
        m.next_line(12.0);
        assert_matrix(&m.text, [1.0, 0.0, 0.0, 1.0, 72.0, 688.0]);
    }

    #[test]
    fn advance_moves_text_but_not_line() {
        let mut m = TextMatrices::default();
        m.set(Ctm::new(1.0, 0.0, 0.0, 1.0, 72.0, 700.0));
        m.advance(6.5);
        assert_matrix(&m.text, [1.0, 0.0, 0.0, 1.0, 78.5, 700.0]);
        assert_matrix(&m.line, [1.0, 0.0, 0.0, 1.0, 72.0, 700.0]);
    }

    #[test]
    fn begin_resets_to_identity() {
        let mut m = TextMatrices::default();
        m.set(Ctm::new(3.0, 0.0, 0.0, 3.0, 1.0, 1.0));
        m.begin();
        assert_eq!(m.text, Ctm::identity());
        assert_eq!(m.line, Ctm::identity());
    }
}
