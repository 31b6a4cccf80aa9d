//! DOMMatrix-style 2D affine matrix.
//!
//! Mirrors the six-component DOMMatrix layout used by the Canvas 2D API:
//!
//! ```text
//! | a c e |
//! | b d f |
//! | 0 0 1 |
//! ```

use tiny_skia::Transform;

/// A 2D affine matrix in DOMMatrix component order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for DomMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl DomMatrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// All six components are finite.
    pub fn is_finite(&self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.c.is_finite()
            && self.d.is_finite()
            && self.e.is_finite()
            && self.f.is_finite()
    }
}

impl From<Transform> for DomMatrix {
    fn from(t: Transform) -> Self {
        Self {
            a: t.sx as f64,
            b: t.ky as f64,
            c: t.kx as f64,
            d: t.sy as f64,
            e: t.tx as f64,
            f: t.ty as f64,
        }
    }
}

impl From<DomMatrix> for Transform {
    fn from(m: DomMatrix) -> Self {
        Transform::from_row(
            m.a as f32, m.b as f32, m.c as f32, m.d as f32, m.e as f32, m.f as f32,
        )
    }
}
