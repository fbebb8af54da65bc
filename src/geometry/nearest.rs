//! Closest point on a cubic Bézier via Bernstein-form root finding.
//!
//! The squared distance from a query point to the curve has its critical
//! points where the curve derivative is perpendicular to the vector from
//! the curve to the point. That dot product is expressed as a degree-5
//! Bézier whose roots are located by recursive de Casteljau bisection.

use crate::geometry::cubic::CubicBezier;
use crate::geometry::tolerance::{MAX_ROOT_DEPTH, ROOT_FLATNESS};
use crate::model::Vector;

/// Result of a closest-point query.
#[derive(Clone, Copy, Debug)]
pub struct Nearest {
    pub t: f64,
    pub position: Vector,
}

const W_DEGREE: usize = 5;

/// Closest position on `curve` to `point`, considering interior critical
/// points and both endpoints. Never fails: degenerate curves fall back to
/// an endpoint. Ties between an interior candidate and an endpoint go to
/// the endpoint.
pub fn nearest_on_cubic(curve: &CubicBezier, point: Vector) -> Nearest {
    let w = to_bezier_form(curve, point);

    let mut roots = Vec::new();
    find_roots(&w, 0, &mut roots);

    // Seed with t=0; interior roots must strictly beat it.
    let mut best_t = 0.0;
    let mut best_d2 = point.distance(curve.p0).powi(2);
    for &t in &roots {
        let d2 = point.distance(curve.eval(t)).powi(2);
        if d2 < best_d2 {
            best_d2 = d2;
            best_t = t;
        }
    }
    // The far endpoint wins on closer-or-equal.
    let end_d2 = point.distance(curve.p3).powi(2);
    if end_d2 <= best_d2 {
        best_t = 1.0;
    }

    Nearest {
        t: best_t,
        position: curve.eval(best_t),
    }
}

/// Build the degree-5 Bézier whose y-values are the dot products of the
/// curve derivative hull with the point-to-control-point vectors. Control
/// x-values are the evenly spaced parameters i/5.
fn to_bezier_form(curve: &CubicBezier, point: Vector) -> [Vector; W_DEGREE + 1] {
    const Z: [[f64; 4]; 3] = [
        [1.0, 0.6, 0.3, 0.1],
        [0.4, 0.6, 0.6, 0.4],
        [0.1, 0.3, 0.6, 1.0],
    ];

    let v = [curve.p0, curve.p1, curve.p2, curve.p3];
    let c: [Vector; 4] = [v[0] - point, v[1] - point, v[2] - point, v[3] - point];
    let d: [Vector; 3] = [
        (v[1] - v[0]) * 3.0,
        (v[2] - v[1]) * 3.0,
        (v[3] - v[2]) * 3.0,
    ];

    let mut cd = [[0.0f64; 4]; 3];
    for (row, dj) in d.iter().enumerate() {
        for (col, ci) in c.iter().enumerate() {
            cd[row][col] = dj.dot(*ci);
        }
    }

    let mut w = [Vector::ZERO; W_DEGREE + 1];
    for (k, p) in w.iter_mut().enumerate() {
        p.x = k as f64 / W_DEGREE as f64;
    }
    for k in 0..=W_DEGREE {
        let lb = k.saturating_sub(2);
        let ub = k.min(3);
        for i in lb..=ub {
            let j = k - i;
            w[k].y += cd[j][i] * Z[j][i];
        }
    }
    w
}

/// Collect parameters where the degree-5 control polygon crosses zero.
/// Branches terminate on 0 crossings (no root), or 1 crossing with a
/// flat-enough polygon (chord intercept). The depth cap guarantees
/// termination for degenerate input.
fn find_roots(w: &[Vector; W_DEGREE + 1], depth: u32, roots: &mut Vec<f64>) {
    match crossing_count(w) {
        0 => return,
        1 => {
            if depth >= MAX_ROOT_DEPTH {
                roots.push(0.5 * (w[0].x + w[W_DEGREE].x));
                return;
            }
            if flat_enough(w) {
                roots.push(x_intercept(w));
                return;
            }
        }
        _ => {
            if depth >= MAX_ROOT_DEPTH {
                roots.push(0.5 * (w[0].x + w[W_DEGREE].x));
                return;
            }
        }
    }

    let (left, right) = subdivide(w);
    find_roots(&left, depth + 1, roots);
    find_roots(&right, depth + 1, roots);
}

/// Number of sign changes along the control polygon's y-values, an upper
/// bound on the number of roots in the interval. Zero takes the positive
/// sign: subdivision can land a control point exactly on a root, and
/// that point must still register the change in the half that crosses.
fn crossing_count(w: &[Vector; W_DEGREE + 1]) -> u32 {
    let mut count = 0;
    let mut prev = sign(w[0].y);
    for p in &w[1..] {
        let s = sign(p.y);
        if s != prev {
            count += 1;
        }
        prev = s;
    }
    count
}

fn sign(y: f64) -> i32 {
    if y < 0.0 {
        -1
    } else {
        1
    }
}

/// The control polygon fits in a band around its chord narrower than the
/// flatness bound.
fn flat_enough(w: &[Vector; W_DEGREE + 1]) -> bool {
    // Implicit line through the first and last control points.
    let a = w[0].y - w[W_DEGREE].y;
    let b = w[W_DEGREE].x - w[0].x;
    let c = w[0].x * w[W_DEGREE].y - w[W_DEGREE].x * w[0].y;

    let mut above = 0.0f64;
    let mut below = 0.0f64;
    for p in &w[1..W_DEGREE] {
        let value = a * p.x + b * p.y + c;
        if value > above {
            above = value;
        } else if value < below {
            below = value;
        }
    }

    // Where the band's edge lines cross y = 0; the spread between the
    // intercepts bounds the root error.
    if a.abs() <= f64::MIN_POSITIVE {
        return false;
    }
    let inv = -1.0 / a;
    let intercept_above = (c - above) * inv;
    let intercept_below = (c - below) * inv;
    let error = 0.5 * (intercept_above.max(intercept_below) - intercept_above.min(intercept_below));
    error < ROOT_FLATNESS
}

/// Where the chord from w[0] to w[5] crosses y = 0.
fn x_intercept(w: &[Vector; W_DEGREE + 1]) -> f64 {
    let d = w[W_DEGREE] - w[0];
    w[0].x - w[0].y * d.x / d.y
}

/// de Casteljau split of the degree-5 polygon at t = 0.5.
fn subdivide(
    w: &[Vector; W_DEGREE + 1],
) -> ([Vector; W_DEGREE + 1], [Vector; W_DEGREE + 1]) {
    let mut tmp = *w;
    let mut left = [Vector::ZERO; W_DEGREE + 1];
    let mut right = [Vector::ZERO; W_DEGREE + 1];
    left[0] = tmp[0];
    right[W_DEGREE] = tmp[W_DEGREE];
    for level in 1..=W_DEGREE {
        for i in 0..=(W_DEGREE - level) {
            tmp[i] = tmp[i].lerp(tmp[i + 1], 0.5);
        }
        left[level] = tmp[0];
        right[W_DEGREE - level] = tmp[W_DEGREE - level];
    }
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }

    fn arch() -> CubicBezier {
        CubicBezier::new(v(0.0, 0.0), v(1.0, 2.0), v(3.0, 2.0), v(4.0, 0.0))
    }

    #[test]
    fn point_on_curve_maps_to_itself() {
        let curve = arch();
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let p = curve.eval(t);
            let n = nearest_on_cubic(&curve, p);
            assert!(
                n.position.distance(p) < 1e-6,
                "t={} drifted to {:?}",
                t,
                n.position
            );
        }
    }

    #[test]
    fn apex_query_lands_at_midpoint() {
        let curve = arch();
        let n = nearest_on_cubic(&curve, v(2.0, 5.0));
        assert!((n.t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn symmetric_query_does_not_fall_back_to_endpoint() {
        // The symmetric polygon puts a control value exactly on zero;
        // the crossing must still be counted or the interior root is
        // lost and an endpoint wins.
        let curve = arch();
        let query = v(2.0, 5.0);
        let n = nearest_on_cubic(&curve, query);
        assert!(n.position.distance(v(2.0, 1.5)) < 1e-6);
        assert!((query.distance(n.position) - 3.5).abs() < 1e-6);
        assert!(query.distance(n.position) < query.distance(curve.p0));
        assert!(query.distance(n.position) < query.distance(curve.p3));
    }

    #[test]
    fn far_left_query_prefers_start() {
        let curve = arch();
        let n = nearest_on_cubic(&curve, v(-10.0, 0.0));
        assert_eq!(n.t, 0.0);
        assert_eq!(n.position, curve.p0);
    }

    #[test]
    fn far_right_query_prefers_end() {
        let curve = arch();
        let n = nearest_on_cubic(&curve, v(14.0, 0.0));
        assert_eq!(n.t, 1.0);
        assert_eq!(n.position, curve.p3);
    }

    #[test]
    fn degenerate_point_cubic_terminates() {
        let p = v(2.0, 3.0);
        let curve = CubicBezier::new(p, p, p, p);
        let n = nearest_on_cubic(&curve, v(0.0, 0.0));
        assert!(n.position.distance(p) < 1e-12);
    }

    #[test]
    fn straight_line_cubic_projects() {
        let curve = CubicBezier::new(v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0), v(3.0, 0.0));
        let n = nearest_on_cubic(&curve, v(1.5, 2.0));
        assert!(n.position.distance(v(1.5, 0.0)) < 1e-6);
    }

    #[test]
    fn nearest_beats_dense_sampling() {
        let curve = CubicBezier::new(v(0.0, 0.0), v(0.0, 10.0), v(10.0, 10.0), v(10.0, 0.0));
        let query = v(3.0, 4.0);
        let n = nearest_on_cubic(&curve, query);
        let best = n.position.distance(query);
        for i in 0..=1000 {
            let t = i as f64 / 1000.0;
            let d = curve.eval(t).distance(query);
            assert!(best <= d + 1e-9, "sampled t={} closer: {} < {}", t, d, best);
        }
    }
}
