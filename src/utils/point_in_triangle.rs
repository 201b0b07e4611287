//! Orientation predicates and barycentric coordinates.

use crate::math::{Point, Point2, Real, DEFAULT_EPSILON};

/// The winding of three points in the plane.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum Orientation {
    /// Counter-clockwise: the third point lies to the left of the first two.
    Ccw,
    /// Clockwise: the third point lies to the right of the first two.
    Cw,
    /// The three points are (nearly) aligned.
    Collinear,
}

/// Twice the signed area of the triangle `a, b, c`.
///
/// Positive if `c` lies to the left of the oriented line `a → b`.
#[inline]
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> Real {
    (b - a).perp(&(c - a))
}

/// The orientation of `a, b, c`, treating `|orient2d| <= epsilon` as collinear.
pub fn orientation(a: &Point2, b: &Point2, c: &Point2, epsilon: Real) -> Orientation {
    let det = orient2d(a, b, c);

    if det > epsilon {
        Orientation::Ccw
    } else if det < -epsilon {
        Orientation::Cw
    } else {
        Orientation::Collinear
    }
}

/// Barycentric coordinates of a point with respect to a triangle `a, b, c`.
///
/// The point is `u * a + v * b + w * c`, with `u + v + w = 1`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Barycentric {
    /// Weight of the first vertex.
    pub u: Real,
    /// Weight of the second vertex.
    pub v: Real,
    /// Weight of the third vertex.
    pub w: Real,
}

impl Barycentric {
    /// Are all three weights in `[0, 1]`?
    #[inline]
    pub fn is_inside(&self) -> bool {
        self.v >= 0.0 && self.w >= 0.0 && self.v + self.w <= 1.0
    }
}

/// Computes the barycentric coordinates of `p` with respect to the triangle `a, b, c`.
///
/// The point is projected onto the triangle's plane (this is only relevant in 3D).
/// Returns `None` if the triangle is degenerate.
pub fn barycentric<const D: usize>(
    p: &Point<D>,
    a: &Point<D>,
    b: &Point<D>,
    c: &Point<D>,
) -> Option<Barycentric> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);
    let denom = d00 * d11 - d01 * d01;

    if denom.abs() < DEFAULT_EPSILON {
        return None;
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    Some(Barycentric {
        u: 1.0 - v - w,
        v,
        w,
    })
}

/// Tests if `p` lies inside the triangle `a, b, c` (boundary included).
///
/// Degenerate triangles contain no point.
#[inline]
pub fn point_in_triangle<const D: usize>(
    p: &Point<D>,
    a: &Point<D>,
    b: &Point<D>,
    c: &Point<D>,
) -> bool {
    barycentric(p, a, b, c).is_some_and(|bcoords| bcoords.is_inside())
}
