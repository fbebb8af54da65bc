//! Anchor/path data model for the curve kernel.
//!
//! A `Path` is an ordered chain of `Anchor`s; pairs of adjacent anchors
//! form virtual `Segment`s classified as straight lines or cubic Béziers.

use crate::geometry::affine::AffineMatrix;
use crate::geometry::cubic::CubicBezier;
use crate::geometry::tolerance::EPS_LEN;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D point or offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vector { x, y }
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z-component of the 3D cross).
    pub fn cross(self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length_sq(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_sq().sqrt()
    }

    pub fn distance(self, other: Vector) -> f64 {
        (self - other).length()
    }

    /// Unit vector in the same direction; zero stays zero.
    pub fn normalized(self) -> Vector {
        let len = self.length();
        if len > EPS_LEN {
            Vector::new(self.x / len, self.y / len)
        } else {
            Vector::ZERO
        }
    }

    /// Rotate counter-clockwise by `angle` radians.
    pub fn rotated(self, angle: f64) -> Vector {
        let (s, c) = angle.sin_cos();
        Vector::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// 90° counter-clockwise rotation.
    pub fn perpendicular(self) -> Vector {
        Vector::new(-self.y, self.x)
    }

    pub fn lerp(self, other: Vector, t: f64) -> Vector {
        Vector::new(self.x + t * (other.x - self.x), self.y + t * (other.y - self.y))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn is_zero(self) -> bool {
        self.length_sq() <= EPS_LEN * EPS_LEN
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// One vertex of a path. Handles are offsets relative to `position`;
/// a zero handle means no curvature on that side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub position: Vector,
    pub handle_in: Vector,
    pub handle_out: Vector,
}

impl Anchor {
    pub fn new(position: Vector) -> Self {
        Anchor {
            position,
            handle_in: Vector::ZERO,
            handle_out: Vector::ZERO,
        }
    }

    pub fn with_handles(position: Vector, handle_in: Vector, handle_out: Vector) -> Self {
        Anchor {
            position,
            handle_in,
            handle_out,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.handle_in.is_finite() && self.handle_out.is_finite()
    }

    /// Map the position by the full matrix and the handle offsets by its
    /// linear part.
    pub fn transform(&mut self, m: &AffineMatrix) {
        self.position = m.apply(self.position);
        self.handle_in = m.apply_offset(self.handle_in);
        self.handle_out = m.apply_offset(self.handle_out);
    }
}

/// A straight segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSeg {
    pub a: Vector,
    pub b: Vector,
}

impl LineSeg {
    pub fn new(a: Vector, b: Vector) -> Self {
        LineSeg { a, b }
    }

    pub fn eval(&self, t: f64) -> Vector {
        self.a.lerp(self.b, t)
    }

    pub fn delta(&self) -> Vector {
        self.b - self.a
    }

    pub fn length(&self) -> f64 {
        self.delta().length()
    }

    pub fn bounds(&self) -> (Vector, Vector) {
        (
            Vector::new(self.a.x.min(self.b.x), self.a.y.min(self.b.y)),
            Vector::new(self.a.x.max(self.b.x), self.a.y.max(self.b.y)),
        )
    }
}

/// A virtual view over two adjacent anchors, classified by whether the
/// facing handles carry curvature.
#[derive(Clone, Copy, Debug)]
pub enum Segment {
    Line(LineSeg),
    Cubic(CubicBezier),
}

impl Segment {
    /// Classify the span from `a1` to `a2`. Both facing handles zero
    /// means the segment degenerates to a straight line.
    pub fn between(a1: &Anchor, a2: &Anchor) -> Segment {
        if a1.handle_out.is_zero() && a2.handle_in.is_zero() {
            Segment::Line(LineSeg::new(a1.position, a2.position))
        } else {
            Segment::Cubic(CubicBezier::new(
                a1.position,
                a1.position + a1.handle_out,
                a2.position + a2.handle_in,
                a2.position,
            ))
        }
    }

    pub fn eval(&self, t: f64) -> Vector {
        match self {
            Segment::Line(line) => line.eval(t),
            Segment::Cubic(cubic) => cubic.eval(t),
        }
    }

    pub fn bounds(&self) -> (Vector, Vector) {
        match self {
            Segment::Line(line) => line.bounds(),
            Segment::Cubic(cubic) => cubic.bounds(),
        }
    }
}

/// An ordered anchor chain. A closed path implicitly joins the last
/// anchor back to the first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub anchors: Vec<Anchor>,
    pub closed: bool,
}

impl Path {
    pub fn new() -> Self {
        Path {
            anchors: Vec::new(),
            closed: false,
        }
    }

    pub fn from_anchors(anchors: Vec<Anchor>, closed: bool) -> Self {
        Path { anchors, closed }
    }

    /// Open polyline/polygon through the given points with no curvature.
    pub fn from_points(points: &[Vector], closed: bool) -> Self {
        Path {
            anchors: points.iter().map(|p| Anchor::new(*p)).collect(),
            closed,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.anchors.iter().all(|a| a.is_finite())
    }

    /// Number of segments: one fewer than the anchors for an open path,
    /// equal to the anchors for a closed path. Paths with fewer than two
    /// anchors have none.
    pub fn segment_count(&self) -> usize {
        let n = self.anchors.len();
        if n < 2 {
            0
        } else if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// The segment starting at anchor `index` (wrapping to the first
    /// anchor for a closed path's last segment).
    pub fn segment(&self, index: usize) -> Option<Segment> {
        if index >= self.segment_count() {
            return None;
        }
        let a1 = &self.anchors[index];
        let a2 = &self.anchors[(index + 1) % self.anchors.len()];
        Some(Segment::between(a1, a2))
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.segment_count()).map(move |i| self.segment(i).unwrap())
    }

    /// Conservative bounding box over anchor positions and absolute
    /// handle points. None for an empty path.
    pub fn bounding_box(&self) -> Option<(Vector, Vector)> {
        let mut bounds: Option<(Vector, Vector)> = None;
        for a in &self.anchors {
            for p in [
                a.position,
                a.position + a.handle_in,
                a.position + a.handle_out,
            ] {
                bounds = Some(match bounds {
                    None => (p, p),
                    Some((lo, hi)) => (
                        Vector::new(lo.x.min(p.x), lo.y.min(p.y)),
                        Vector::new(hi.x.max(p.x), hi.y.max(p.y)),
                    ),
                });
            }
        }
        bounds
    }

    /// Reverse the anchor order, swapping in/out handles so the geometry
    /// is unchanged.
    pub fn reverse(&mut self) {
        self.anchors.reverse();
        for a in &mut self.anchors {
            std::mem::swap(&mut a.handle_in, &mut a.handle_out);
        }
    }

    pub fn transform(&mut self, m: &AffineMatrix) {
        for a in &mut self.anchors {
            a.transform(m);
        }
    }
}
