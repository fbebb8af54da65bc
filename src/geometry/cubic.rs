//! Cubic Bézier curve utilities for evaluation, subdivision, and
//! arc-length sampling.

use crate::geometry::tolerance::{ARC_SAMPLES, EPS_COINCIDENT};
use crate::model::{LineSeg, Vector};

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Vector,
    pub p1: Vector,
    pub p2: Vector,
    pub p3: Vector,
}

impl CubicBezier {
    pub fn new(p0: Vector, p1: Vector, p2: Vector, p3: Vector) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the curve at parameter t ∈ [0, 1]. Exact at the
    /// endpoints: t=0 yields p0 and t=1 yields p3.
    pub fn eval(&self, t: f64) -> Vector {
        if t == 0.0 {
            return self.p0;
        }
        if t == 1.0 {
            return self.p3;
        }
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;
        self.p0 * mt3 + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * t3
    }

    /// First derivative at parameter t.
    pub fn derivative(&self, t: f64) -> Vector {
        let t2 = t * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        (self.p1 - self.p0) * (3.0 * mt2)
            + (self.p2 - self.p1) * (6.0 * mt * t)
            + (self.p3 - self.p2) * (3.0 * t2)
    }

    /// Split the curve at parameter t using de Casteljau subdivision.
    ///
    /// Returns two cubic curves: the first from 0..t, the second from t..1.
    pub fn split_at(&self, t: f64) -> (CubicBezier, CubicBezier) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);

        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);

        let p0123 = p012.lerp(p123, t); // the split point

        (
            CubicBezier::new(self.p0, p01, p012, p0123),
            CubicBezier::new(p0123, p123, p23, self.p3),
        )
    }

    /// Extract the portion of the curve from t0 to t1.
    pub fn subcurve(&self, t0: f64, t1: f64) -> CubicBezier {
        if t0 >= t1 {
            let p = self.eval(t0);
            return CubicBezier::new(p, p, p, p);
        }
        let (head, _) = self.split_at(t1);
        if t1 <= 0.0 {
            return head;
        }
        let (_, tail) = head.split_at(t0 / t1);
        tail
    }

    /// Control-point bounding box. Conservative: contains the curve but
    /// is not tight against it.
    pub fn bounds(&self) -> (Vector, Vector) {
        let min = Vector::new(
            self.p0.x.min(self.p1.x).min(self.p2.x).min(self.p3.x),
            self.p0.y.min(self.p1.y).min(self.p2.y).min(self.p3.y),
        );
        let max = Vector::new(
            self.p0.x.max(self.p1.x).max(self.p2.x).max(self.p3.x),
            self.p0.y.max(self.p1.y).max(self.p2.y).max(self.p3.y),
        );
        (min, max)
    }

    /// The same curve traversed in the opposite direction.
    pub fn reversed(&self) -> CubicBezier {
        CubicBezier::new(self.p3, self.p2, self.p1, self.p0)
    }

    /// All four control points coincident within `eps`.
    pub fn is_point(&self, eps: f64) -> bool {
        self.p0.distance(self.p1) <= eps
            && self.p1.distance(self.p2) <= eps
            && self.p2.distance(self.p3) <= eps
    }

    /// Pointwise comparison in forward order.
    pub fn approx_eq(&self, other: &CubicBezier, eps: f64) -> bool {
        self.p0.distance(other.p0) <= eps
            && self.p1.distance(other.p1) <= eps
            && self.p2.distance(other.p2) <= eps
            && self.p3.distance(other.p3) <= eps
    }

    /// Straight segment connecting the endpoints.
    pub fn chord(&self) -> LineSeg {
        LineSeg::new(self.p0, self.p3)
    }

    /// Identical point-for-point, traversed in either direction.
    pub fn coincident(&self, other: &CubicBezier) -> bool {
        self.approx_eq(other, EPS_COINCIDENT) || self.approx_eq(&other.reversed(), EPS_COINCIDENT)
    }

    /// Cumulative chord lengths at `ARC_SAMPLES + 1` evenly spaced
    /// parameters. Entry 0 is 0; the last entry approximates the total
    /// arc length with error governed by the sample count.
    pub fn arc_lengths(&self) -> Vec<f64> {
        let mut table = Vec::with_capacity(ARC_SAMPLES + 1);
        table.push(0.0);
        let mut prev = self.p0;
        let mut total = 0.0;
        for i in 1..=ARC_SAMPLES {
            let p = self.eval(i as f64 / ARC_SAMPLES as f64);
            total += prev.distance(p);
            table.push(total);
            prev = p;
        }
        table
    }

    /// Approximate arc length from the fixed-resolution sample table.
    pub fn length(&self) -> f64 {
        let mut prev = self.p0;
        let mut total = 0.0;
        for i in 1..=ARC_SAMPLES {
            let p = self.eval(i as f64 / ARC_SAMPLES as f64);
            total += prev.distance(p);
            prev = p;
        }
        total
    }
}
