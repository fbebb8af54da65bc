//! Path-level intersection queries.
//!
//! Paths are decomposed into their segments and every relevant segment
//! pair is fed through the segment intersection engine. Local parameters
//! come back as path times (`segment index + local t`), joints shared by
//! adjacent segments are deduplicated, and an optional proximity filter
//! restricts results to a disc around a query point.

use crate::geometry::intersect::{cubic_self_intersections, segment_segment};
use crate::geometry::tolerance::EPS_POS;
use crate::model::{Path, Segment, Vector};
use serde::{Deserialize, Serialize};

/// One intersection between two paths (possibly the same path), located
/// by path index and time on each side.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PathIntersection {
    pub path1: usize,
    pub path2: usize,
    pub time1: f64,
    pub time2: f64,
    pub position: Vector,
    /// Distance to the query point when a proximity filter was supplied.
    pub distance: Option<f64>,
}

/// Options for an intersection query.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntersectionQuery {
    /// Keep only intersections within the given radius of the point.
    pub max_distance: Option<(Vector, f64)>,
}

/// All intersections among the paths in one list, including a path
/// crossing itself on distinct segments. Results are ordered by
/// (path1, path2, time1, time2) with `path1 <= path2`.
pub fn path_intersections(paths: &[Path], query: &IntersectionQuery) -> Vec<PathIntersection> {
    let window = query_window(query);
    let triples = segment_triples(paths, window);

    let mut out = Vec::new();
    for (i, (p1, s1, seg1)) in triples.iter().enumerate() {
        // A lone cubic segment can cross itself; the engine currently
        // reports none of those crossings.
        if let Segment::Cubic(c) = seg1 {
            for (ta, tb) in cubic_self_intersections(c) {
                push_hit(&mut out, paths, query, *p1, *p1, *s1, *s1, ta, tb, seg1);
            }
        }
        for (p2, s2, seg2) in triples.iter().skip(i + 1) {
            for (ta, tb) in segment_segment(seg1, seg2) {
                push_hit(&mut out, paths, query, *p1, *p2, *s1, *s2, ta, tb, seg1);
            }
        }
    }
    finish(out)
}

/// All intersections between a path of `list1` and a path of `list2`.
/// `path1` indexes `list1` and `path2` indexes `list2`.
pub fn path_intersections_between(
    list1: &[Path],
    list2: &[Path],
    query: &IntersectionQuery,
) -> Vec<PathIntersection> {
    let window = query_window(query);
    let triples1 = segment_triples(list1, window);
    let triples2 = segment_triples(list2, window);

    let mut out = Vec::new();
    for (p1, s1, seg1) in &triples1 {
        for (p2, s2, seg2) in &triples2 {
            for (ta, tb) in segment_segment(seg1, seg2) {
                let time1 = *s1 as f64 + ta;
                let time2 = *s2 as f64 + tb;
                let position = seg1.eval(ta);
                let distance = match query.max_distance {
                    Some((center, radius)) => {
                        let d = position.distance(center);
                        if d > radius {
                            continue;
                        }
                        Some(d)
                    }
                    None => None,
                };
                out.push(PathIntersection {
                    path1: *p1,
                    path2: *p2,
                    time1,
                    time2,
                    position,
                    distance,
                });
            }
        }
    }
    finish(out)
}

/// Expanded AABB around the proximity filter, used to skip segments that
/// cannot contribute a kept result.
fn query_window(query: &IntersectionQuery) -> Option<(Vector, Vector)> {
    query.max_distance.map(|(center, radius)| {
        let r = radius.abs();
        (
            Vector::new(center.x - r, center.y - r),
            Vector::new(center.x + r, center.y + r),
        )
    })
}

fn window_overlaps(bounds: (Vector, Vector), window: (Vector, Vector)) -> bool {
    bounds.0.x <= window.1.x
        && bounds.1.x >= window.0.x
        && bounds.0.y <= window.1.y
        && bounds.1.y >= window.0.y
}

/// Flatten paths into (path index, segment index, segment) triples,
/// dropping segments outside the query window.
fn segment_triples(
    paths: &[Path],
    window: Option<(Vector, Vector)>,
) -> Vec<(usize, usize, Segment)> {
    let mut triples = Vec::new();
    for (path_index, path) in paths.iter().enumerate() {
        for seg_index in 0..path.segment_count() {
            let seg = match path.segment(seg_index) {
                Some(seg) => seg,
                None => continue,
            };
            if let Some(window) = window {
                if !window_overlaps(seg.bounds(), window) {
                    continue;
                }
            }
            triples.push((path_index, seg_index, seg));
        }
    }
    triples
}

#[allow(clippy::too_many_arguments)]
fn push_hit(
    out: &mut Vec<PathIntersection>,
    paths: &[Path],
    query: &IntersectionQuery,
    path1: usize,
    path2: usize,
    seg1: usize,
    seg2: usize,
    ta: f64,
    tb: f64,
    eval_seg: &Segment,
) {
    let time1 = seg1 as f64 + ta;
    let time2 = seg2 as f64 + tb;

    if path1 == path2 {
        // Adjacent segments meet at their shared anchor; that joint is
        // not a crossing.
        if (time1 - time2).abs() <= EPS_POS {
            return;
        }
        // Same point on a closed path's seam, seen as times 0 and n.
        let end = paths[path1].segment_count() as f64;
        if paths[path1].closed
            && ((time1 <= EPS_POS && (time2 - end).abs() <= EPS_POS)
                || (time2 <= EPS_POS && (time1 - end).abs() <= EPS_POS))
        {
            return;
        }
    }

    let position = eval_seg.eval(ta);
    let distance = match query.max_distance {
        Some((center, radius)) => {
            let d = position.distance(center);
            if d > radius {
                return;
            }
            Some(d)
        }
        None => None,
    };

    out.push(PathIntersection {
        path1,
        path2,
        time1,
        time2,
        position,
        distance,
    });
}

/// Sort deterministically and drop near-identical duplicates, which
/// arise when a crossing lands exactly on an anchor shared by two
/// adjacent segments.
fn finish(mut out: Vec<PathIntersection>) -> Vec<PathIntersection> {
    out.sort_by(|a, b| {
        (a.path1, a.path2)
            .cmp(&(b.path1, b.path2))
            .then(a.time1.partial_cmp(&b.time1).unwrap_or(std::cmp::Ordering::Equal))
            .then(a.time2.partial_cmp(&b.time2).unwrap_or(std::cmp::Ordering::Equal))
    });
    out.dedup_by(|a, b| {
        a.path1 == b.path1
            && a.path2 == b.path2
            && (a.time1 - b.time1).abs() <= EPS_POS
            && (a.time2 - b.time2).abs() <= EPS_POS
    });
    out
}
