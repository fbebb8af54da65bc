//! Path parameterization: converting between time, arc-length distance,
//! position, and tangent, plus shape-preserving anchor insertion and
//! path splitting.
//!
//! Time is `segment index + local parameter`: the integer part selects a
//! segment, the fraction locates a point on it. Closed paths wrap time
//! modulo the anchor count; open paths clamp to the final time.

use crate::geometry::tolerance::{clamp01, ARC_SAMPLES, EPS_LEN, EPS_PARAM};
use crate::model::{Anchor, Path, Segment, Vector};

impl Path {
    /// Wrap or clamp `time` and decompose it into (segment index, local
    /// parameter). None when the path has no segments.
    pub fn locate_time(&self, time: f64) -> Option<(usize, f64)> {
        let segs = self.segment_count();
        if segs == 0 {
            return None;
        }
        let n = self.anchors.len() as f64;
        let time = if self.closed {
            time.rem_euclid(n)
        } else {
            time.max(0.0).min(n - 1.0)
        };
        let mut index = time.floor() as usize;
        let mut frac = time - index as f64;
        if index >= segs {
            // Open path at its exact final time.
            index = segs - 1;
            frac = 1.0;
        }
        Some((index, frac))
    }

    /// The last valid time: `anchors.len() - 1` for an open path,
    /// `anchors.len()` for a closed one.
    pub fn end_time(&self) -> f64 {
        if self.closed {
            self.anchors.len() as f64
        } else {
            (self.anchors.len().max(1) - 1) as f64
        }
    }

    pub fn position_at_time(&self, time: f64) -> Option<Vector> {
        let (index, frac) = self.locate_time(time)?;
        Some(self.segment(index)?.eval(frac))
    }

    /// Tangent at `time`. Linear segments report their normalized chord;
    /// cubic segments the Bézier derivative. At exact integer times the
    /// tangent falls back to the anchor's non-degenerate handle, borrowing
    /// a neighboring segment's direction when both handles are zero, so
    /// sharp corners still report a defined direction.
    pub fn derivative_at_time(&self, time: f64) -> Option<Vector> {
        let (index, frac) = self.locate_time(time)?;
        if frac <= EPS_PARAM {
            return self.corner_tangent(index);
        }
        if frac >= 1.0 - EPS_PARAM {
            // The far end of a segment is the next anchor's corner; a
            // cubic with a flat incoming handle would otherwise report a
            // zero derivative here.
            return self.corner_tangent((index + 1) % self.anchors.len());
        }
        match self.segment(index)? {
            Segment::Line(line) => Some(line.delta().normalized()),
            Segment::Cubic(cubic) => Some(cubic.derivative(frac)),
        }
    }

    fn corner_tangent(&self, index: usize) -> Option<Vector> {
        let anchor = &self.anchors[index];
        if !anchor.handle_out.is_zero() {
            return Some(anchor.handle_out * 3.0);
        }
        if !anchor.handle_in.is_zero() {
            return Some(-anchor.handle_in * 3.0);
        }
        // Both handles flat: borrow a direction from the adjoining
        // segments' control polygons, outgoing side first.
        if let Some(seg) = self.segment(index) {
            let d = match seg {
                Segment::Line(line) => line.delta(),
                Segment::Cubic(c) => {
                    let d = c.derivative(0.0);
                    if d.is_zero() {
                        c.p2 - c.p0
                    } else {
                        d
                    }
                }
            };
            if !d.is_zero() {
                return Some(d.normalized());
            }
        }
        let n = self.anchors.len();
        let prev = if index > 0 {
            Some(index - 1)
        } else if self.closed {
            Some(n - 1)
        } else {
            None
        };
        if let Some(prev) = prev {
            if let Some(seg) = self.segment(prev) {
                let d = match seg {
                    Segment::Line(line) => line.delta(),
                    Segment::Cubic(c) => {
                        let d = c.derivative(1.0);
                        if d.is_zero() {
                            c.p3 - c.p1
                        } else {
                            d
                        }
                    }
                };
                if !d.is_zero() {
                    return Some(d.normalized());
                }
            }
        }
        Some(Vector::ZERO)
    }

    fn segment_length(&self, index: usize) -> f64 {
        match self.segment(index) {
            Some(Segment::Line(line)) => line.length(),
            Some(Segment::Cubic(cubic)) => cubic.length(),
            None => 0.0,
        }
    }

    /// Total arc length, approximated per cubic segment by the fixed
    /// sample table.
    pub fn length(&self) -> f64 {
        (0..self.segment_count()).map(|i| self.segment_length(i)).sum()
    }

    /// Arc-length distance from the path start to `time`.
    pub fn distance_at_time(&self, time: f64) -> Option<f64> {
        let (index, frac) = self.locate_time(time)?;
        // A closed path's exact end time wraps to 0 but means one full
        // lap, not the start.
        if self.closed && time >= self.end_time() && index == 0 && frac <= EPS_PARAM {
            return Some(self.length());
        }
        let mut total: f64 = (0..index).map(|i| self.segment_length(i)).sum();
        total += match self.segment(index)? {
            Segment::Line(line) => frac * line.length(),
            Segment::Cubic(cubic) => {
                let table = cubic.arc_lengths();
                let pos = clamp01(frac) * ARC_SAMPLES as f64;
                let step = (pos.floor() as usize).min(ARC_SAMPLES - 1);
                let within = pos - step as f64;
                table[step] + within * (table[step + 1] - table[step])
            }
        };
        Some(total)
    }

    /// Time at arc-length `distance` from the path start. Distances are
    /// clamped to [0, length]; linear segments solve proportionally,
    /// cubic segments interpolate inside the sample step that straddles
    /// the target.
    pub fn time_at_distance(&self, distance: f64) -> Option<f64> {
        let segs = self.segment_count();
        if segs == 0 {
            return None;
        }
        let mut remaining = distance.max(0.0);
        for index in 0..segs {
            let seg = self.segment(index)?;
            match seg {
                Segment::Line(line) => {
                    let len = line.length();
                    if remaining <= len {
                        let frac = if len > EPS_LEN { remaining / len } else { 0.0 };
                        return Some(index as f64 + frac);
                    }
                    remaining -= len;
                }
                Segment::Cubic(cubic) => {
                    let table = cubic.arc_lengths();
                    let len = *table.last().unwrap();
                    if remaining <= len {
                        let mut step = 0;
                        while step + 1 < table.len() && table[step + 1] < remaining {
                            step += 1;
                        }
                        let span = table[step + 1] - table[step];
                        let within = if span > EPS_LEN {
                            (remaining - table[step]) / span
                        } else {
                            0.0
                        };
                        let frac = (step as f64 + within) / ARC_SAMPLES as f64;
                        return Some(index as f64 + clamp01(frac));
                    }
                    remaining -= len;
                }
            }
        }
        Some(self.end_time())
    }

    /// Insert an anchor at `time` without moving the curve: the enclosing
    /// segment is split by de Casteljau subdivision and the neighboring
    /// handles are rewritten from the inner control points. Inserting at
    /// an integer time is a no-op returning the existing anchor's index.
    pub fn insert_anchor_at_time(&mut self, time: f64) -> Option<usize> {
        let (index, frac) = self.locate_time(time)?;
        if frac <= EPS_PARAM {
            return Some(index);
        }
        if frac >= 1.0 - EPS_PARAM {
            return Some((index + 1) % self.anchors.len());
        }
        let next = (index + 1) % self.anchors.len();
        match self.segment(index)? {
            Segment::Line(line) => {
                let anchor = Anchor::new(line.eval(frac));
                self.anchors.insert(index + 1, anchor);
            }
            Segment::Cubic(cubic) => {
                let (first, second) = cubic.split_at(frac);
                self.anchors[index].handle_out = first.p1 - first.p0;
                self.anchors[next].handle_in = second.p2 - second.p3;
                let anchor = Anchor::with_handles(
                    first.p3,
                    first.p2 - first.p3,
                    second.p1 - second.p0,
                );
                self.anchors.insert(index + 1, anchor);
            }
        }
        Some(index + 1)
    }

    /// Split at an existing anchor. A closed path is rotated so the split
    /// anchor comes first, its first anchor duplicated at the end, and
    /// reopened, yielding one open path. An open path yields two paths
    /// sharing a duplicated boundary anchor.
    pub fn split_at_anchor(&self, anchor_index: usize) -> Vec<Path> {
        let n = self.anchors.len();
        if anchor_index >= n {
            return vec![self.clone()];
        }
        if self.closed {
            let mut anchors = self.anchors.clone();
            anchors.rotate_left(anchor_index);
            anchors.push(anchors[0]);
            return vec![Path::from_anchors(anchors, false)];
        }
        if anchor_index == 0 || anchor_index == n - 1 {
            return vec![self.clone()];
        }
        let first = Path::from_anchors(self.anchors[..=anchor_index].to_vec(), false);
        let second = Path::from_anchors(self.anchors[anchor_index..].to_vec(), false);
        vec![first, second]
    }

    /// Split at an arbitrary time, inserting an anchor there first when
    /// needed.
    pub fn split_at_time(&mut self, time: f64) -> Vec<Path> {
        match self.insert_anchor_at_time(time) {
            Some(index) => self.split_at_anchor(index),
            None => vec![self.clone()],
        }
    }
}

/// Circular-arc handle factor for quarter arcs.
pub(crate) const KAPPA: f64 = 0.5522847498307936;

impl Path {
    /// Closed 4-cubic approximation of an ellipse.
    pub fn ellipse(center: Vector, rx: f64, ry: f64) -> Path {
        let kx = KAPPA * rx;
        let ky = KAPPA * ry;
        let anchors = vec![
            Anchor::with_handles(
                Vector::new(center.x + rx, center.y),
                Vector::new(0.0, ky),
                Vector::new(0.0, -ky),
            ),
            Anchor::with_handles(
                Vector::new(center.x, center.y - ry),
                Vector::new(kx, 0.0),
                Vector::new(-kx, 0.0),
            ),
            Anchor::with_handles(
                Vector::new(center.x - rx, center.y),
                Vector::new(0.0, -ky),
                Vector::new(0.0, ky),
            ),
            Anchor::with_handles(
                Vector::new(center.x, center.y + ry),
                Vector::new(-kx, 0.0),
                Vector::new(kx, 0.0),
            ),
        ];
        Path::from_anchors(anchors, true)
    }

    /// Closed rectangle with optional rounded corners (kappa quarter
    /// arcs). The radius is clamped to half the shorter side.
    pub fn rectangle(origin: Vector, width: f64, height: f64, radius: f64) -> Path {
        let r = radius.abs().min(width.abs() / 2.0).min(height.abs() / 2.0);
        let (x, y) = (origin.x, origin.y);
        if r <= EPS_LEN {
            return Path::from_points(
                &[
                    Vector::new(x, y),
                    Vector::new(x + width, y),
                    Vector::new(x + width, y + height),
                    Vector::new(x, y + height),
                ],
                true,
            );
        }
        let k = KAPPA * r;
        let anchors = vec![
            // Top side, then clockwise through the four kappa arcs.
            Anchor::with_handles(Vector::new(x + r, y), Vector::new(-k, 0.0), Vector::ZERO),
            Anchor::with_handles(Vector::new(x + width - r, y), Vector::ZERO, Vector::new(k, 0.0)),
            Anchor::with_handles(Vector::new(x + width, y + r), Vector::new(0.0, -k), Vector::ZERO),
            Anchor::with_handles(
                Vector::new(x + width, y + height - r),
                Vector::ZERO,
                Vector::new(0.0, k),
            ),
            Anchor::with_handles(
                Vector::new(x + width - r, y + height),
                Vector::new(k, 0.0),
                Vector::ZERO,
            ),
            Anchor::with_handles(
                Vector::new(x + r, y + height),
                Vector::ZERO,
                Vector::new(-k, 0.0),
            ),
            Anchor::with_handles(Vector::new(x, y + height - r), Vector::new(0.0, k), Vector::ZERO),
            Anchor::with_handles(Vector::new(x, y + r), Vector::ZERO, Vector::new(0.0, -k)),
        ];
        Path::from_anchors(anchors, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }

    fn open_l() -> Path {
        Path::from_points(&[v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0)], false)
    }

    fn closed_square() -> Path {
        Path::from_points(
            &[v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)],
            true,
        )
    }

    #[test]
    fn position_at_integer_and_fractional_times() {
        let p = open_l();
        assert_eq!(p.position_at_time(0.0).unwrap(), v(0.0, 0.0));
        assert_eq!(p.position_at_time(1.0).unwrap(), v(10.0, 0.0));
        assert_eq!(p.position_at_time(0.5).unwrap(), v(5.0, 0.0));
        assert_eq!(p.position_at_time(1.5).unwrap(), v(10.0, 5.0));
    }

    #[test]
    fn open_path_clamps_time() {
        let p = open_l();
        assert_eq!(p.position_at_time(-3.0).unwrap(), v(0.0, 0.0));
        assert_eq!(p.position_at_time(99.0).unwrap(), v(10.0, 10.0));
    }

    #[test]
    fn closed_path_wraps_time() {
        let p = closed_square();
        assert_eq!(p.position_at_time(4.0).unwrap(), v(0.0, 0.0));
        assert_eq!(p.position_at_time(4.5).unwrap(), v(5.0, 0.0));
        assert_eq!(p.position_at_time(-0.5).unwrap(), v(0.0, 5.0));
    }

    #[test]
    fn derivative_on_line_is_normalized_chord() {
        let p = open_l();
        assert!(p.derivative_at_time(0.5).unwrap().distance(v(1.0, 0.0)) < 1e-12);
        assert!(p.derivative_at_time(1.5).unwrap().distance(v(0.0, 1.0)) < 1e-12);
    }

    #[test]
    fn corner_reports_defined_tangent() {
        let p = open_l();
        let d = p.derivative_at_time(1.0).unwrap();
        assert!(!d.is_zero());
    }

    #[test]
    fn corner_borrows_handle_direction() {
        let mut p = open_l();
        p.anchors[1].handle_out = v(0.0, 2.0);
        let d = p.derivative_at_time(1.0).unwrap();
        assert!(d.normalized().distance(v(0.0, 1.0)) < 1e-12);
    }

    #[test]
    fn length_of_square() {
        assert!((closed_square().length() - 40.0).abs() < 1e-9);
        assert!((open_l().length() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn distance_time_round_trip_linear() {
        let p = open_l();
        for i in 0..=20 {
            let d = i as f64;
            let t = p.time_at_distance(d).unwrap();
            let back = p.distance_at_time(t).unwrap();
            assert!((back - d).abs() < 1e-9, "d={} t={} back={}", d, t, back);
        }
    }

    #[test]
    fn distance_time_round_trip_curved() {
        let p = Path::ellipse(v(0.0, 0.0), 10.0, 10.0);
        let total = p.length();
        for i in 0..=10 {
            let d = total * i as f64 / 10.0;
            let t = p.time_at_distance(d).unwrap();
            let back = p.distance_at_time(t).unwrap();
            // Error bound governed by the fixed sample count.
            assert!((back - d).abs() < total / ARC_SAMPLES as f64, "d={} back={}", d, back);
        }
    }

    #[test]
    fn closed_path_end_time_maps_to_full_length() {
        let p = Path::ellipse(v(0.0, 0.0), 10.0, 10.0);
        let total = p.length();
        let end = p.end_time();
        assert!((p.distance_at_time(end).unwrap() - total).abs() < 1e-9);
        // Full round trip through the end time.
        let t = p.time_at_distance(total).unwrap();
        let back = p.distance_at_time(t).unwrap();
        assert!((back - total).abs() < 1e-9, "t={} back={}", t, back);
        // Interior times still wrap.
        assert!((p.distance_at_time(0.0).unwrap()).abs() < 1e-9);
        let half = p.distance_at_time(2.0).unwrap();
        assert!((half - total / 2.0).abs() < total / ARC_SAMPLES as f64);
    }

    #[test]
    fn end_tangent_borrows_across_flat_handle() {
        let mut p = Path::from_points(&[v(0.0, 0.0), v(10.0, 0.0)], false);
        p.anchors[0].handle_out = v(0.0, 5.0);
        // Final anchor's handles are flat; the end tangent must borrow
        // from the incoming control polygon instead of reporting zero.
        let d = p.derivative_at_time(1.0).unwrap();
        assert!(!d.is_zero());
        assert!(d.normalized().distance(v(10.0, -5.0).normalized()) < 1e-9);
    }

    #[test]
    fn time_at_full_distance_is_end_time() {
        let open = open_l();
        assert!((open.time_at_distance(open.length()).unwrap() - 2.0).abs() < 1e-6);
        let closed = closed_square();
        assert!((closed.time_at_distance(closed.length()).unwrap() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn insertion_does_not_move_curve() {
        let mut p = Path::ellipse(v(0.0, 0.0), 8.0, 5.0);
        let before: Vec<Vector> = (0..100)
            .map(|i| p.position_at_time(4.0 * i as f64 / 100.0).unwrap())
            .collect();
        p.insert_anchor_at_time(1.37);
        // Times after the insertion index shift by one segment.
        let after: Vec<Vector> = (0..100)
            .map(|i| {
                let t = 4.0 * i as f64 / 100.0;
                let shifted = if t <= 1.0 {
                    t
                } else if t <= 1.37 {
                    1.0 + (t - 1.0) / 0.37
                } else if t <= 2.0 {
                    2.0 + (t - 1.37) / 0.63
                } else {
                    t + 1.0
                };
                p.position_at_time(shifted).unwrap()
            })
            .collect();
        for (b, a) in before.iter().zip(&after) {
            assert!(b.distance(*a) < 1e-9, "{:?} vs {:?}", b, a);
        }
    }

    #[test]
    fn insertion_at_integer_time_is_noop() {
        let mut p = open_l();
        let count = p.anchors.len();
        assert_eq!(p.insert_anchor_at_time(1.0), Some(1));
        assert_eq!(p.anchors.len(), count);
    }

    #[test]
    fn split_closed_yields_open_with_duplicate() {
        let p = closed_square();
        let parts = p.split_at_anchor(2);
        assert_eq!(parts.len(), 1);
        let open = &parts[0];
        assert!(!open.closed);
        assert_eq!(open.anchors.len(), 5);
        assert_eq!(open.anchors[0].position, v(10.0, 10.0));
        assert_eq!(open.anchors[4].position, v(10.0, 10.0));
        assert!((open.length() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn split_open_yields_two_sharing_anchor() {
        let p = open_l();
        let parts = p.split_at_anchor(1);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].anchors.len(), 2);
        assert_eq!(parts[1].anchors.len(), 2);
        assert_eq!(
            parts[0].anchors.last().unwrap().position,
            parts[1].anchors[0].position
        );
    }

    #[test]
    fn split_at_fractional_time() {
        let mut p = open_l();
        let parts = p.split_at_time(0.5);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].anchors.last().unwrap().position, v(5.0, 0.0));
        assert!((parts[0].length() - 5.0).abs() < 1e-9);
        assert!((parts[1].length() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn ellipse_hits_cardinal_points() {
        let p = Path::ellipse(v(0.0, 0.0), 10.0, 5.0);
        assert_eq!(p.position_at_time(0.0).unwrap(), v(10.0, 0.0));
        assert_eq!(p.position_at_time(1.0).unwrap(), v(0.0, -5.0));
        assert_eq!(p.position_at_time(2.0).unwrap(), v(-10.0, 0.0));
        assert_eq!(p.position_at_time(3.0).unwrap(), v(0.0, 5.0));
        // Quarter-arc midpoint stays close to the true ellipse.
        let mid = p.position_at_time(0.5).unwrap();
        let r = (mid.x / 10.0).powi(2) + (mid.y / 5.0).powi(2);
        assert!((r - 1.0).abs() < 5e-3);
    }

    #[test]
    fn rounded_rectangle_has_eight_anchors() {
        let p = Path::rectangle(v(0.0, 0.0), 20.0, 10.0, 2.0);
        assert_eq!(p.anchors.len(), 8);
        assert!(p.closed);
        let sharp = Path::rectangle(v(0.0, 0.0), 20.0, 10.0, 0.0);
        assert_eq!(sharp.anchors.len(), 4);
        assert!((sharp.length() - 60.0).abs() < 1e-9);
    }
}
