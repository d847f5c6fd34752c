/// Tolerance for coordinate comparisons (degrees).
pub const COORD_EPSILON: f64 = 1e-6;

/// Tolerance for zoom and pitch comparisons.
pub const ZOOM_EPSILON: f64 = 1e-3;

/// Canonicalize a floating-point value.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (canonical_f64(a) - canonical_f64(b)).abs() <= eps
}

/// Clamp that maps NaN to `min` instead of propagating it.
pub fn clamp_finite(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() { min } else { v.clamp(min, max) }
}
