//! Corner rounding by offset-polyline self-intersection.
//!
//! The two segments around a corner are offset sideways by the fillet
//! radius; where the offset polyline crosses itself marks the pair of
//! tangency times whose path points sit one radius away from both sides
//! of the corner. The span between them is replaced by a circular-arc
//! cubic and the corner anchor removed.

use crate::geometry::intersect::line_line;
use crate::geometry::tolerance::EPS_PARAM;
use crate::model::{LineSeg, Path, Vector};

const SCAN_STEPS: usize = 100;

impl Path {
    /// Replace the corner at `anchor_index` with a circular-arc fillet of
    /// the given radius. Returns false, leaving the path untouched, when
    /// the corner cannot be rounded: endpoint of an open path, radius too
    /// large for the adjoining segments, or a degenerate tangent.
    ///
    /// On a closed path the anchors may be rotated (a cyclic shift that
    /// preserves geometry) so the corner's neighbors are contiguous.
    pub fn round_corner(&mut self, anchor_index: usize, radius: f64) -> bool {
        let n = self.anchors.len();
        if radius <= 0.0 || n < 3 || anchor_index >= n {
            return false;
        }
        if !self.closed && (anchor_index == 0 || anchor_index == n - 1) {
            return false;
        }
        let mut index = anchor_index;
        if self.closed && index == 0 {
            self.anchors.rotate_right(1);
            index = 1;
        } else if self.closed && index == n - 1 {
            self.anchors.rotate_left(1);
            index = n - 2;
        }

        match self.find_fillet_times(index, radius) {
            Some((t1, t2)) => self.splice_fillet(t1, t2, radius),
            None => false,
        }
    }

    /// Scan the offset polylines on both sides of the corner for their
    /// first self-intersection straddling the corner time, and map it
    /// back to a pair of path times.
    fn find_fillet_times(&self, index: usize, radius: f64) -> Option<(f64, f64)> {
        let corner_time = index as f64;
        let start = corner_time - 1.0;

        for sign in [1.0, -1.0] {
            let mut points = Vec::with_capacity(SCAN_STEPS);
            let mut times = Vec::with_capacity(SCAN_STEPS);
            let mut last_normal = Vector::ZERO;
            for step in 0..SCAN_STEPS {
                let t = start + 2.0 * step as f64 / (SCAN_STEPS - 1) as f64;
                let position = self.position_at_time(t)?;
                let tangent = self.derivative_at_time(t)?.normalized();
                let normal = if tangent.is_zero() {
                    last_normal
                } else {
                    tangent.perpendicular()
                };
                last_normal = normal;
                points.push(position + normal * (sign * radius));
                times.push(t);
            }

            for j in 0..SCAN_STEPS - 1 {
                let seg_j = LineSeg::new(points[j], points[j + 1]);
                for k in j + 2..SCAN_STEPS - 1 {
                    let seg_k = LineSeg::new(points[k], points[k + 1]);
                    let (u, w) = match line_line(&seg_j, &seg_k) {
                        Some(hit) => hit,
                        None => continue,
                    };
                    let t1 = times[j] + u * (times[j + 1] - times[j]);
                    let t2 = times[k] + w * (times[k + 1] - times[k]);
                    if t1 < corner_time && t2 > corner_time {
                        return Some((t1, t2));
                    }
                }
            }
        }
        None
    }

    /// Insert tangency anchors at `t1 < t2`, drop everything between
    /// them, and join the pair with a circular-arc cubic.
    fn splice_fillet(&mut self, t1: f64, t2: f64, radius: f64) -> bool {
        // Integer tangency times would make the inserts no-ops and the
        // index bookkeeping below wrong.
        if t1.fract().abs() <= EPS_PARAM
            || t1.fract() >= 1.0 - EPS_PARAM
            || t2.fract().abs() <= EPS_PARAM
            || t2.fract() >= 1.0 - EPS_PARAM
        {
            return false;
        }

        let d1 = match self.derivative_at_time(t1) {
            Some(d) => d.normalized(),
            None => return false,
        };
        let d2 = match self.derivative_at_time(t2) {
            Some(d) => d.normalized(),
            None => return false,
        };
        if d1.is_zero() || d2.is_zero() {
            return false;
        }
        let theta = d1.dot(d2).clamp(-1.0, 1.0).acos();
        let handle = (4.0 / 3.0) * (theta / 4.0).tan() * radius;

        // Insert at the later time first so the earlier index is stable.
        let j2 = match self.insert_anchor_at_time(t2) {
            Some(j) => j + 1,
            None => return false,
        };
        let j1 = match self.insert_anchor_at_time(t1) {
            Some(j) => j,
            None => return false,
        };

        self.anchors[j1].handle_out = d1 * handle;
        self.anchors[j2].handle_in = d2 * (-handle);
        self.anchors.drain(j1 + 1..j2);
        true
    }
}
