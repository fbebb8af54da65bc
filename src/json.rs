//! JSON document import/export for path collections.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "version": 1,
//!   "paths": [
//!     { "closed": true,
//!       "anchors": [ { "x": 0.0, "y": 0.0,
//!                      "in": { "x": 0.0, "y": 0.0 },
//!                      "out": { "x": 1.0, "y": 0.0 } } ] }
//!   ]
//! }
//! ```
//!
//! The lenient loader drops malformed or non-finite entries; the strict
//! variant reports an error code and detail instead.

use crate::model::{Anchor, Path, Vector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DOC_VERSION: u32 = 1;

// Ingest caps. Coordinates beyond the bound break tolerance assumptions
// downstream.
const MAX_PATHS: usize = 10_000;
const MAX_ANCHORS_PER_PATH: usize = 100_000;
const COORD_BOUND: f64 = 1.0e7;

fn in_coord_bounds(v: f64) -> bool {
    v.is_finite() && v.abs() <= COORD_BOUND
}

fn anchor_in_bounds(a: &Anchor) -> bool {
    [
        a.position,
        a.handle_in,
        a.handle_out,
    ]
    .iter()
    .all(|p| in_coord_bounds(p.x) && in_coord_bounds(p.y))
}

pub fn paths_to_json(paths: &[Path]) -> Value {
    #[derive(Serialize)]
    struct AnchorSer {
        x: f64,
        y: f64,
        #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
        handle_in: Option<Vector>,
        #[serde(rename = "out", skip_serializing_if = "Option::is_none")]
        handle_out: Option<Vector>,
    }
    #[derive(Serialize)]
    struct PathSer {
        closed: bool,
        anchors: Vec<AnchorSer>,
    }
    #[derive(Serialize)]
    struct Doc {
        version: u32,
        paths: Vec<PathSer>,
    }

    let paths = paths
        .iter()
        .map(|p| PathSer {
            closed: p.closed,
            anchors: p
                .anchors
                .iter()
                .map(|a| AnchorSer {
                    x: a.position.x,
                    y: a.position.y,
                    handle_in: (!a.handle_in.is_zero()).then_some(a.handle_in),
                    handle_out: (!a.handle_out.is_zero()).then_some(a.handle_out),
                })
                .collect(),
        })
        .collect();
    serde_json::to_value(Doc {
        version: DOC_VERSION,
        paths,
    })
    .unwrap_or(Value::Null)
}

#[derive(Deserialize)]
struct AnchorDe {
    x: f64,
    y: f64,
    #[serde(rename = "in")]
    handle_in: Option<Vector>,
    #[serde(rename = "out")]
    handle_out: Option<Vector>,
}

#[derive(Deserialize)]
struct PathDe {
    closed: Option<bool>,
    // Each anchor is re-parsed individually so the lenient loader can
    // drop a malformed one without losing the rest of the path.
    anchors: Vec<Value>,
}

#[derive(Deserialize)]
struct DocDe {
    version: Option<u32>,
    paths: Vec<PathDe>,
}

fn build_anchor(a: AnchorDe) -> Anchor {
    Anchor::with_handles(
        Vector::new(a.x, a.y),
        a.handle_in.unwrap_or(Vector::ZERO),
        a.handle_out.unwrap_or(Vector::ZERO),
    )
}

/// Lenient loader: malformed documents yield an empty list, malformed or
/// out-of-bounds anchors are skipped.
pub fn paths_from_json(v: &Value) -> Vec<Path> {
    let doc: DocDe = match serde_json::from_value(v.clone()) {
        Ok(doc) => doc,
        Err(_) => return Vec::new(),
    };
    let mut out = Vec::new();
    for p in doc.paths.into_iter().take(MAX_PATHS) {
        let mut anchors = Vec::new();
        for a in p.anchors.into_iter().take(MAX_ANCHORS_PER_PATH) {
            let a: AnchorDe = match serde_json::from_value(a) {
                Ok(a) => a,
                Err(_) => continue,
            };
            let anchor = build_anchor(a);
            if anchor_in_bounds(&anchor) {
                anchors.push(anchor);
            }
        }
        out.push(Path::from_anchors(anchors, p.closed.unwrap_or(false)));
    }
    out
}

/// Strict loader: the first problem aborts with an error code and a
/// human-readable detail.
pub fn paths_from_json_strict(v: &Value) -> Result<Vec<Path>, (&'static str, String)> {
    let doc: DocDe =
        serde_json::from_value(v.clone()).map_err(|e| ("json_parse", format!("{}", e)))?;
    if let Some(version) = doc.version {
        if version > DOC_VERSION {
            return Err(("unsupported_version", format!("{}", version)));
        }
    }
    if doc.paths.len() > MAX_PATHS {
        return Err(("caps_exceeded", format!("paths>{}", MAX_PATHS)));
    }
    let mut out = Vec::new();
    for (i, p) in doc.paths.into_iter().enumerate() {
        if p.anchors.len() > MAX_ANCHORS_PER_PATH {
            return Err((
                "caps_exceeded",
                format!("path {} anchors>{}", i, MAX_ANCHORS_PER_PATH),
            ));
        }
        let mut anchors = Vec::with_capacity(p.anchors.len());
        for (j, a) in p.anchors.into_iter().enumerate() {
            let a: AnchorDe = serde_json::from_value(a)
                .map_err(|e| ("json_parse", format!("path {} anchor {}: {}", i, j, e)))?;
            let anchor = build_anchor(a);
            if !anchor_in_bounds(&anchor) {
                return Err(("out_of_bounds", format!("path {} anchor {}", i, j)));
            }
            anchors.push(anchor);
        }
        out.push(Path::from_anchors(anchors, p.closed.unwrap_or(false)));
    }
    Ok(out)
}
