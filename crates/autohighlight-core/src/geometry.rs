//! Geometric primitives in PDF user space.
//!
//! All coordinates follow the PDF convention: origin at the bottom-left of the
//! unrotated page, y growing upwards. Annotation geometry (`/Rect`,
//! `/QuadPoints`) is written in this space, so no y-flip is ever applied.

/// A point in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`.
    pub fn to(&self, other: Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

/// An affine transformation matrix `[a b c d e f]` as used by `cm` and `Tm`.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Matrix product `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Build from a 6-element operand array, if it has exactly six numbers.
    pub fn from_slice(values: &[f64]) -> Option<Ctm> {
        match values {
            [a, b, c, d, e, f] => Some(Ctm::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }
}

/// Axis-aligned rectangle in PDF user space (`x0 <= x1`, `y0 <= y1`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box containing all `points`. `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<BBox> {
        let first = points.first()?;
        let mut bbox = BBox::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            bbox.x0 = bbox.x0.min(p.x);
            bbox.y0 = bbox.y0.min(p.y);
            bbox.x1 = bbox.x1.max(p.x);
            bbox.y1 = bbox.y1.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A quadrilateral around a run of text on a single line.
///
/// `ul`/`ur` lie on the ascent line, `ll`/`lr` on the descent line; "left" is
/// where the text run starts. For rotated text the quad is rotated with it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quad {
    pub ul: Point,
    pub ur: Point,
    pub ll: Point,
    pub lr: Point,
}

impl Quad {
    pub fn new(ul: Point, ur: Point, ll: Point, lr: Point) -> Self {
        Self { ul, ur, ll, lr }
    }

    /// Quad covering an axis-aligned rectangle, reading left to right.
    pub fn from_bbox(bbox: &BBox) -> Self {
        Self {
            ul: Point::new(bbox.x0, bbox.y1),
            ur: Point::new(bbox.x1, bbox.y1),
            ll: Point::new(bbox.x0, bbox.y0),
            lr: Point::new(bbox.x1, bbox.y0),
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        [self.ul, self.ur, self.ll, self.lr]
    }

    /// Enclosing axis-aligned rectangle.
    pub fn rect(&self) -> BBox {
        // four points, never empty
        BBox::from_points(&self.corners()).unwrap_or(BBox::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Whether the quad's edges are parallel to the page axes with the text
    /// running left to right.
    pub fn is_axis_aligned(&self) -> bool {
        const EPS: f64 = 1e-3;
        (self.ll.y - self.lr.y).abs() < EPS
            && (self.ul.y - self.ur.y).abs() < EPS
            && (self.ll.x - self.ul.x).abs() < EPS
            && (self.lr.x - self.ur.x).abs() < EPS
            && self.lr.x >= self.ll.x
    }

    /// Flattened `/QuadPoints` entry: `ul, ur, ll, lr`.
    ///
    /// This is the order Acrobat, MuPDF and pdf.js read, even though the PDF
    /// reference describes a counter-clockwise order.
    pub fn to_quad_points(&self) -> [f64; 8] {
        [
            self.ul.x, self.ul.y, self.ur.x, self.ur.y, self.ll.x, self.ll.y, self.lr.x,
            self.lr.y,
        ]
    }

    /// Combine two quads of the same line into one spanning both.
    ///
    /// Axis-aligned quads are merged by rectangle union, which absorbs small
    /// height differences between fonts. Rotated quads take their left edge
    /// from `self` and their right edge from `other`.
    pub fn extend(&self, other: &Quad) -> Quad {
        if self.is_axis_aligned() && other.is_axis_aligned() {
            Quad::from_bbox(&self.rect().union(&other.rect()))
        } else {
            Quad {
                ul: self.ul,
                ll: self.ll,
                ur: other.ur,
                lr: other.lr,
            }
        }
    }
}

impl std::fmt::Display for Quad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}], [{:.2}, {:.2}], [{:.2}, {:.2}], [{:.2}, {:.2}]",
            self.ll.x,
            self.ll.y,
            self.ul.x,
            self.ul.y,
            self.ur.x,
            self.ur.y,
            self.lr.x,
            self.lr.y
        )
    }
}
