use crate::math::{Point2, Real, DEFAULT_EPSILON};

/// Computes where the segment `p0 → p1` crosses the segment `a → b`.
///
/// Returns the parameter `t ∈ [0, 1]` along `p0 → p1` of the crossing point. Parallel and
/// collinear segments are reported as not intersecting: a sight line grazing along a wall does
/// not cross it.
pub fn segment_intersection_toi(
    p0: &Point2,
    p1: &Point2,
    a: &Point2,
    b: &Point2,
) -> Option<Real> {
    let r = p1 - p0;
    let s = b - a;
    let denom = r.perp(&s);

    if denom.abs() < DEFAULT_EPSILON || ulps_eq!(denom, 0.0) {
        return None;
    }

    let qp = a - p0;
    let t = qp.perp(&s) / denom;
    let u = qp.perp(&r) / denom;

    if 0.0 > t || t > 1.0 || 0.0 > u || u > 1.0 {
        None
    } else {
        Some(t)
    }
}

/// Do the segments `p0 → p1` and `a → b` cross?
#[inline]
pub fn segments_intersect(p0: &Point2, p1: &Point2, a: &Point2, b: &Point2) -> bool {
    segment_intersection_toi(p0, p1, a, b).is_some()
}
