//! curvekit: a planar curve-geometry kernel for anchor-based paths.
//!
//! Paths are chains of anchors whose handles define straight or cubic
//! Bézier segments. On top of that model the crate provides:
//!
//! - intersection queries between and within paths, with joint
//!   deduplication and an optional proximity filter
//! - closest-point root finding on cubics
//! - time/arc-length parameterization, shape-preserving anchor
//!   insertion, and path splitting
//! - corner rounding with circular-arc fillets
//! - a JSON document format with lenient and strict loaders

pub mod model;
pub mod geometry {
    pub mod affine;
    pub mod cubic;
    pub mod intersect;
    pub mod nearest;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod intersections;
    pub mod param;
    pub mod rounding;
}
pub mod json;

pub use algorithms::intersections::{
    path_intersections, path_intersections_between, IntersectionQuery, PathIntersection,
};
pub use geometry::affine::AffineMatrix;
pub use geometry::cubic::CubicBezier;
pub use geometry::intersect::{cubic_cubic, line_cubic, line_line, segment_segment};
pub use geometry::nearest::{nearest_on_cubic, Nearest};
pub use json::{paths_from_json, paths_from_json_strict, paths_to_json};
pub use model::{Anchor, LineSeg, Path, Segment, Vector};
