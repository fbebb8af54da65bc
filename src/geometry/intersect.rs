//! Segment intersection engine: line/line, line/cubic, and cubic/cubic.
//!
//! Cubic/cubic works by bounded divide-and-conquer over candidate
//! sub-curve pairs; line/cubic by closed-form roots of the signed
//! distance polynomial. All parameters are reported in [0,1] on each
//! primitive.

use crate::geometry::cubic::CubicBezier;
use crate::geometry::nearest::nearest_on_cubic;
use crate::geometry::tolerance::{
    clamp01, near_zero, BOX_ROUNDS, CLIP_ROUNDS, EPS_COINCIDENT, EPS_DENOM, EPS_LEN, EPS_PARAM,
    EPS_POS,
};
use crate::model::{LineSeg, Segment, Vector};

/// Intersection of two line segments via the closed-form 2x2 solve.
/// Parallel lines and out-of-range parameters yield None. Tangencies at
/// endpoints are not special-cased: a touch lands on whichever side the
/// arithmetic puts it.
pub fn line_line(l1: &LineSeg, l2: &LineSeg) -> Option<(f64, f64)> {
    let r = l1.delta();
    let s = l2.delta();
    let denom = r.cross(s);
    if near_zero(denom, EPS_DENOM) {
        return None;
    }
    let qp = l2.a - l1.a;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if t < -EPS_PARAM || t > 1.0 + EPS_PARAM || u < -EPS_PARAM || u > 1.0 + EPS_PARAM {
        return None;
    }
    Some((clamp01(t), clamp01(u)))
}

/// Intersections of a line segment with a cubic, as (line t, cubic t)
/// pairs. Finds where the cubic crosses the infinite line, then
/// back-solves the line parameter by projection; that parameter is
/// accepted when marginally outside [0,1] and clamped, a known precision
/// limitation near segment endpoints.
pub fn line_cubic(line: &LineSeg, cubic: &CubicBezier) -> Vec<(f64, f64)> {
    let d = line.delta();
    let len2 = d.length_sq();
    if len2 <= EPS_LEN * EPS_LEN {
        return Vec::new();
    }
    let n = d.perpendicular();

    // Signed distance (scaled by |d|) of each control point from the
    // infinite line, as a Bernstein cubic; convert to power basis.
    let c0 = (cubic.p0 - line.a).dot(n);
    let c1 = (cubic.p1 - line.a).dot(n);
    let c2 = (cubic.p2 - line.a).dot(n);
    let c3 = (cubic.p3 - line.a).dot(n);

    let a3 = -c0 + 3.0 * c1 - 3.0 * c2 + c3;
    let a2 = 3.0 * c0 - 6.0 * c1 + 3.0 * c2;
    let a1 = -3.0 * c0 + 3.0 * c1;
    let a0 = c0;

    let mut out = Vec::new();
    for root in solve_cubic(a3, a2, a1, a0) {
        if root < -EPS_PARAM || root > 1.0 + EPS_PARAM {
            continue;
        }
        let t = clamp01(root);
        let p = cubic.eval(t);
        let s = (p - line.a).dot(d) / len2;
        if s < -EPS_POS || s > 1.0 + EPS_POS {
            continue;
        }
        let s = clamp01(s);
        if out
            .iter()
            .any(|&(_, prev): &(f64, f64)| (prev - t).abs() <= EPS_PARAM)
        {
            continue;
        }
        out.push((s, t));
    }
    out
}

/// Candidate pair tracked by the cubic/cubic worklist: a sub-curve of
/// each input plus the absolute time range it covers.
#[derive(Clone, Copy)]
struct Candidate {
    range1: (f64, f64),
    sub1: CubicBezier,
    range2: (f64, f64),
    sub2: CubicBezier,
}

/// Intersections between two cubics as (t1, t2) pairs.
///
/// Coincident curves (pointwise identical, forward or reversed) and
/// geometrically overlapping curves report no intersections: a shared
/// span is not a crossing.
pub fn cubic_cubic(c1: &CubicBezier, c2: &CubicBezier) -> Vec<(f64, f64)> {
    if c1.coincident(c2) {
        return Vec::new();
    }
    if !boxes_overlap(c1.bounds(), c2.bounds()) {
        return Vec::new();
    }
    if cubics_overlap(c1, c2) {
        return Vec::new();
    }

    let mut work = vec![Candidate {
        range1: (0.0, 1.0),
        sub1: *c1,
        range2: (0.0, 1.0),
        sub2: *c2,
    }];

    for round in 0..CLIP_ROUNDS {
        let mut next = Vec::new();
        for cand in &work {
            // Early rounds prune by bounding boxes; once the candidates
            // are small, the cheaper chord test takes over.
            let keep = if round < BOX_ROUNDS {
                boxes_overlap(cand.sub1.bounds(), cand.sub2.bounds())
            } else {
                line_line(&cand.sub1.chord(), &cand.sub2.chord()).is_some()
            };
            if !keep {
                continue;
            }

            let mid1 = 0.5 * (cand.range1.0 + cand.range1.1);
            let mid2 = 0.5 * (cand.range2.0 + cand.range2.1);
            let (a1, b1) = cand.sub1.split_at(0.5);
            let (a2, b2) = cand.sub2.split_at(0.5);
            for (r1, s1) in [((cand.range1.0, mid1), a1), ((mid1, cand.range1.1), b1)] {
                for (r2, s2) in [((cand.range2.0, mid2), a2), ((mid2, cand.range2.1), b2)] {
                    next.push(Candidate {
                        range1: r1,
                        sub1: s1,
                        range2: r2,
                        sub2: s2,
                    });
                }
            }
        }
        if next.is_empty() {
            return Vec::new();
        }
        work = next;
    }

    // Survivors cover time ranges of width 2^-20; approximate each by
    // its chords and map the local solution back to absolute time.
    let mut out: Vec<(f64, f64)> = Vec::new();
    for cand in &work {
        if let Some((t, u)) = line_line(&cand.sub1.chord(), &cand.sub2.chord()) {
            let t1 = cand.range1.0 + t * (cand.range1.1 - cand.range1.0);
            let t2 = cand.range2.0 + u * (cand.range2.1 - cand.range2.0);
            if !out
                .iter()
                .any(|&(p1, p2)| (p1 - t1).abs() <= EPS_COINCIDENT && (p2 - t2).abs() <= EPS_COINCIDENT)
            {
                out.push((t1, t2));
            }
        }
    }
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// True when the two cubics share a span: each curve's endpoints are
/// sampled against the other via the closest-point routine, and two or
/// more pairings landing on-curve mark a potential overlap that is then
/// confirmed by trimming both to the shared time range and comparing
/// control points.
pub fn cubics_overlap(c1: &CubicBezier, c2: &CubicBezier) -> bool {
    let mut hits: Vec<(f64, f64)> = Vec::new();
    for (t1, p) in [(0.0, c1.p0), (1.0, c1.p3)] {
        let n = nearest_on_cubic(c2, p);
        if n.position.distance(p) <= EPS_COINCIDENT {
            hits.push((t1, n.t));
        }
    }
    for (t2, p) in [(0.0, c2.p0), (1.0, c2.p3)] {
        let n = nearest_on_cubic(c1, p);
        if n.position.distance(p) <= EPS_COINCIDENT {
            hits.push((n.t, t2));
        }
    }
    if hits.len() < 2 {
        return false;
    }

    hits.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let (s1, s2) = hits[0];
    let (e1, e2) = *hits.last().unwrap();
    if (e1 - s1).abs() <= EPS_PARAM || (e2 - s2).abs() <= EPS_PARAM {
        // Touching at a single point is not a span.
        return false;
    }

    let sub1 = c1.subcurve(s1, e1);
    let mut sub2 = c2.subcurve(s2.min(e2), s2.max(e2));
    if s2 > e2 {
        sub2 = sub2.reversed();
    }
    sub1.approx_eq(&sub2, EPS_COINCIDENT)
}

/// Self-intersections of a single cubic. Unimplemented: always returns
/// an empty list. Callers must not rely on this for self-crossing
/// detection.
pub fn cubic_self_intersections(_cubic: &CubicBezier) -> Vec<(f64, f64)> {
    Vec::new()
}

/// Dispatch over the four segment kind combinations, returning (t1, t2)
/// pairs in the order of the arguments.
pub fn segment_segment(s1: &Segment, s2: &Segment) -> Vec<(f64, f64)> {
    match (s1, s2) {
        (Segment::Line(l1), Segment::Line(l2)) => line_line(l1, l2).into_iter().collect(),
        (Segment::Line(l), Segment::Cubic(c)) => line_cubic(l, c),
        (Segment::Cubic(c), Segment::Line(l)) => line_cubic(l, c)
            .into_iter()
            .map(|(lt, ct)| (ct, lt))
            .collect(),
        (Segment::Cubic(c1), Segment::Cubic(c2)) => cubic_cubic(c1, c2),
    }
}

fn boxes_overlap(a: (Vector, Vector), b: (Vector, Vector)) -> bool {
    a.0.x <= b.1.x + EPS_POS
        && b.0.x <= a.1.x + EPS_POS
        && a.0.y <= b.1.y + EPS_POS
        && b.0.y <= a.1.y + EPS_POS
}

/// Real roots of a*t + b = 0.
fn solve_linear(a: f64, b: f64) -> Vec<f64> {
    if near_zero(a, EPS_DENOM) {
        Vec::new()
    } else {
        vec![-b / a]
    }
}

/// Real roots of a*t^2 + b*t + c = 0.
fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if near_zero(a, EPS_DENOM) {
        return solve_linear(b, c);
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    if near_zero(disc, EPS_DENOM) {
        return vec![-b / (2.0 * a)];
    }
    // Citardauq form for the smaller-magnitude root.
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let mut roots = vec![q / a];
    if !near_zero(q, EPS_DENOM) {
        roots.push(c / q);
    }
    roots
}

/// Real roots of a*t^3 + b*t^2 + c*t + d = 0, by depressed-cubic
/// discriminant with the trigonometric branch for three real roots.
fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    if near_zero(a, EPS_DENOM) {
        return solve_quadratic(b, c, d);
    }
    let b = b / a;
    let c = c / a;
    let d = d / a;

    // t = s - b/3 turns the cubic into s^3 + p*s + q = 0.
    let shift = b / 3.0;
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;
    let disc = q * q / 4.0 + p * p * p / 27.0;

    let mut roots = Vec::with_capacity(3);
    if disc > EPS_DENOM {
        let sq = disc.sqrt();
        let u = cbrt(-q / 2.0 + sq);
        let v = cbrt(-q / 2.0 - sq);
        roots.push(u + v - shift);
    } else if disc >= -EPS_DENOM {
        let u = cbrt(-q / 2.0);
        roots.push(2.0 * u - shift);
        roots.push(-u - shift);
    } else {
        let r = (-p * p * p / 27.0).sqrt();
        let phi = (-q / (2.0 * r)).clamp(-1.0, 1.0).acos();
        let m = 2.0 * (-p / 3.0).sqrt();
        for k in 0..3 {
            roots.push(m * ((phi + 2.0 * std::f64::consts::PI * k as f64) / 3.0).cos() - shift);
        }
    }
    roots
}

fn cbrt(x: f64) -> f64 {
    x.signum() * x.abs().powf(1.0 / 3.0)
}
