// Centralized tolerances and iteration caps for robust geometry

pub const EPS_POS: f64 = 1e-6;            // point coincidence threshold (px)
pub const EPS_LEN: f64 = 1e-9;            // zero-length vector threshold
pub const EPS_DENOM: f64 = 1e-12;         // denominator guard for solves/ratios
pub const EPS_PARAM: f64 = 1e-7;          // slack for parameters marginally outside [0,1]
pub const EPS_COINCIDENT: f64 = 1e-4;     // control-point coincidence for curve identity/overlap

// Root finder (closest point on cubic)
pub const MAX_ROOT_DEPTH: u32 = 64;
// Flatness bound for the degree-5 control polygon: 2^(-MAX_ROOT_DEPTH - 1)
pub const ROOT_FLATNESS: f64 = 1.0 / ((1u128 << 65) as f64);

// Cubic/cubic subdivision engine
pub const CLIP_ROUNDS: u32 = 20;          // total worklist rounds
pub const BOX_ROUNDS: u32 = 10;           // rounds using bbox pruning before chord pruning

// Arc-length lookup resolution per cubic segment
pub const ARC_SAMPLES: usize = 100;

#[inline] pub fn clamp01(x: f64) -> f64 { x.max(0.0).min(1.0) }
#[inline] pub fn near_zero(x: f64, eps: f64) -> bool { x.abs() <= eps }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }
