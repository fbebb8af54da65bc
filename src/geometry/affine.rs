//! 2D affine transforms as six coefficients (a, b, c, d, tx, ty):
//!
//! ```text
//! | a c tx |   | x |
//! | b d ty | * | y |
//! | 0 0  1 |   | 1 |
//! ```

use crate::geometry::tolerance::EPS_DENOM;
use crate::model::Vector;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        AffineMatrix { a, b, c, d, tx, ty }
    }

    pub fn translation(offset: Vector) -> Self {
        AffineMatrix::new(1.0, 0.0, 0.0, 1.0, offset.x, offset.y)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        AffineMatrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        AffineMatrix::new(c, s, -s, c, 0.0, 0.0)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn invert(&self) -> Option<AffineMatrix> {
        let det = self.determinant();
        if det.abs() <= EPS_DENOM {
            return None;
        }
        let inv = 1.0 / det;
        Some(AffineMatrix::new(
            self.d * inv,
            -self.b * inv,
            -self.c * inv,
            self.a * inv,
            (self.c * self.ty - self.d * self.tx) * inv,
            (self.b * self.tx - self.a * self.ty) * inv,
        ))
    }

    /// Apply to a point (includes translation).
    pub fn apply(&self, p: Vector) -> Vector {
        Vector::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Apply the linear part only, for offsets such as anchor handles.
    pub fn apply_offset(&self, v: Vector) -> Vector {
        Vector::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    /// `self` applied first, then `next`.
    pub fn then(&self, next: &AffineMatrix) -> AffineMatrix {
        AffineMatrix::new(
            next.a * self.a + next.c * self.b,
            next.b * self.a + next.d * self.b,
            next.a * self.c + next.c * self.d,
            next.b * self.c + next.d * self.d,
            next.a * self.tx + next.c * self.ty + next.tx,
            next.b * self.tx + next.d * self.ty + next.ty,
        )
    }
}

impl Mul for AffineMatrix {
    type Output = AffineMatrix;

    /// `lhs * rhs` applies `rhs` first, matching column-vector convention.
    fn mul(self, rhs: AffineMatrix) -> AffineMatrix {
        rhs.then(&self)
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        AffineMatrix::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }

    #[test]
    fn identity_is_noop() {
        let p = v(3.5, -2.0);
        assert_eq!(AffineMatrix::IDENTITY.apply(p), p);
    }

    #[test]
    fn translate_then_rotate() {
        let m = AffineMatrix::translation(v(1.0, 0.0))
            .then(&AffineMatrix::rotation(std::f64::consts::FRAC_PI_2));
        let p = m.apply(v(0.0, 0.0));
        assert!((p.x - 0.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mul_matches_then() {
        let t = AffineMatrix::translation(v(2.0, 3.0));
        let r = AffineMatrix::rotation(0.7);
        let p = v(1.0, 1.0);
        let via_then = t.then(&r).apply(p);
        let via_mul = (r * t).apply(p);
        assert!(via_then.distance(via_mul) < 1e-12);
    }

    #[test]
    fn inverse_round_trip() {
        let m = AffineMatrix::rotation(0.3)
            .then(&AffineMatrix::scaling(2.0, 0.5))
            .then(&AffineMatrix::translation(v(5.0, -7.0)));
        let inv = m.invert().expect("invertible");
        let p = v(1.25, -4.5);
        assert!(inv.apply(m.apply(p)).distance(p) < 1e-9);
    }

    #[test]
    fn singular_has_no_inverse() {
        let m = AffineMatrix::scaling(1.0, 0.0);
        assert!(m.invert().is_none());
    }

    #[test]
    fn offset_ignores_translation() {
        let m = AffineMatrix::translation(v(100.0, 100.0));
        assert_eq!(m.apply_offset(v(1.0, 2.0)), v(1.0, 2.0));
    }
}
